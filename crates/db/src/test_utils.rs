//! Test utilities for database operations.
//!
//! Provides a migrated throwaway database for integration tests. By default
//! this is an in-memory `SQLite` database; set `TEST_DATABASE_URL` to run the
//! same tests against another backend.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing::info;

use crate::migrations::Migrator;

/// In-memory `SQLite` URL.
pub const MEMORY_URL: &str = "sqlite::memory:";

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Connection URL.
    pub url: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| MEMORY_URL.to_string()),
        }
    }
}

impl TestDbConfig {
    /// Whether this points at a private in-memory database.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:")
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Create a fresh in-memory database with all migrations applied.
    pub async fn in_memory() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig {
            url: MEMORY_URL.to_string(),
        })
        .await
    }

    /// Create a test database from the environment.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect with a custom configuration and run migrations.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(&config.url);
        if config.is_memory() {
            // Every pooled connection would otherwise get its own empty database.
            opt.max_connections(1).min_connections(1);
        }
        opt.sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!(url = %config.url, "Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Get a shareable handle for repositories.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Delete all rows from every application table.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        for table in ["complaints", "users"] {
            self.conn
                .execute(Statement::from_string(
                    backend,
                    format!("DELETE FROM {table}"),
                ))
                .await?;
        }

        info!("Cleaned up test database");
        Ok(())
    }
}
