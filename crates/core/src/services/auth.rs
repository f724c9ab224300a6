//! Account registration, login and bearer-token sessions.

#![allow(missing_docs)]

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;
use yellowshield_common::{AppError, AppResult, IdGenerator, config::AdminSeedConfig};
use yellowshield_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};

/// Department stored for accounts that do not give one.
const DEFAULT_DEPARTMENT: &str = "General";

/// Input for registering an account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub full_name: Option<String>,

    #[validate(length(max = 128))]
    pub department: Option<String>,

    pub role: Option<String>,
}

/// Input for changing a password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// A user together with the bearer token that authenticates them.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub user: user::Model,
    pub token: String,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account and start a session for it.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthenticatedUser> {
        input.validate()?;

        let role = match input.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => UserRole::Student,
            Some(label) => match UserRole::parse(label) {
                Some(UserRole::Admin) => {
                    return Err(AppError::Validation(
                        "Admin role cannot be self-assigned".to_string(),
                    ));
                }
                Some(role) => role,
                None => return Err(AppError::Validation(format!("Invalid role: {label}"))),
            },
        };

        let email = normalize_email(&input.email);
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();
        let full_name = input
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&input.username)
            .to_string();
        let department = input
            .department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DEPARTMENT)
            .to_string();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            email: Set(email),
            password: Set(password_hash),
            token: Set(Some(token.clone())),
            full_name: Set(full_name),
            department: Set(department),
            role: Set(role),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, role = user.role.as_str(), "User registered");

        Ok(AuthenticatedUser { user, token })
    }

    /// Log in with email and password.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::InvalidCredentials);
        }

        match user.token.clone() {
            Some(token) => Ok(AuthenticatedUser { user, token }),
            None => self.issue_token(user).await,
        }
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// End the current session by rotating the account's token.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.issue_token(user).await?;
        info!(user_id = %user_id, "User logged out");

        Ok(())
    }

    /// Change a password after checking the current one. Other sessions are
    /// invalidated.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<AuthenticatedUser> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if !verify_password(&input.current_password, &user.password)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.password = Set(hash_password(&input.new_password)?);
        active.token = Set(Some(token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        info!(user_id = %user.id, "Password changed");

        Ok(AuthenticatedUser { user, token })
    }

    /// Create the configured admin account, or reset its password if it
    /// already exists.
    pub async fn ensure_admin(&self, seed: &AdminSeedConfig) -> AppResult<user::Model> {
        let email = normalize_email(&seed.email);
        let password_hash = hash_password(&seed.password)?;

        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            if !existing.is_admin() {
                warn!(user_id = %existing.id, "Promoting seeded account to admin");
            }

            let mut active: user::ActiveModel = existing.into();
            active.password = Set(password_hash);
            active.role = Set(UserRole::Admin);
            active.updated_at = Set(Some(Utc::now().into()));

            let admin = self.user_repo.update(active).await?;
            info!(user_id = %admin.id, "Admin password reset");
            return Ok(admin);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(seed.username.clone()),
            email: Set(email),
            password: Set(password_hash),
            token: Set(None),
            full_name: Set(seed.full_name.clone()),
            department: Set(seed.department.clone()),
            role: Set(UserRole::Admin),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let admin = self.user_repo.create(model).await?;
        info!(user_id = %admin.id, "Admin account created");

        Ok(admin)
    }

    async fn issue_token(&self, user: user::Model) -> AppResult<AuthenticatedUser> {
        let token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        Ok(AuthenticatedUser { user, token })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
