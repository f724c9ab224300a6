//! Typed wrapper over the REST API.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};
use crate::models::{
    ClearedHistory, Complaint, ListFilter, NewAccount, NewComplaint, Stats, TicketStatus, User,
};
use crate::session::Session;

/// REST API client.
///
/// Cloning is cheap; clones share the connection pool but not the token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:5000`.
    ///
    /// A path prefix on `base_url` is kept, so the API may live under a
    /// sub-path of a reverse proxy.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let invalid = || ClientError::InvalidUrl(base_url.to_string());
        let parsed = Url::parse(base_url.trim()).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("yellowshield-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
        })
    }

    /// Authenticate subsequent calls as `session`.
    pub fn use_session(&mut self, session: &Session) {
        self.token = Some(session.token.clone());
    }

    /// Drop the bearer token.
    pub fn sign_out_locally(&mut self) {
        self.token = None;
    }

    /// Whether a bearer token is set.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Restore the session persisted at `path` and check it with the server.
    ///
    /// A token the server no longer accepts clears the file and yields `None`.
    pub async fn resume(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> ClientResult<Option<Session>> {
        let path = path.as_ref();
        let Some(stored) = Session::restore(path).await? else {
            return Ok(None);
        };

        self.use_session(&stored);
        match self.me().await {
            Ok(user) => {
                let session = Session {
                    user,
                    token: stored.token,
                };
                session.persist(path).await?;
                Ok(Some(session))
            }
            Err(e) if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED) => {
                info!("Stored session rejected, clearing it");
                self.sign_out_locally();
                Session::clear(path).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether the server answers its banner route.
    pub async fn health(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Server unreachable");
                false
            }
        }
    }

    /// Categories a complaint may be filed under.
    pub async fn categories(&self) -> ClientResult<Vec<String>> {
        Self::send(self.request(Method::GET, &["api", "complaints", "categories"])?).await
    }

    /// File a complaint. The returned ID is the ticket to track it with.
    pub async fn submit(&self, complaint: &NewComplaint) -> ClientResult<Complaint> {
        let request = self
            .request(Method::POST, &["api", "complaints"])?
            .json(complaint);
        let created: Complaint = Self::send(request).await?;
        info!(id = %created.id, "Complaint submitted");
        Ok(created)
    }

    /// Status of a ticket by full ID or unique suffix.
    pub async fn status(&self, ticket: &str) -> ClientResult<TicketStatus> {
        let ticket = ticket_segment(ticket)?;
        Self::send(self.request(Method::GET, &["api", "complaints", "public", "status", ticket])?)
            .await
    }

    /// Complaints filed by `user_id`.
    pub async fn history(&self, user_id: &str) -> ClientResult<Vec<Complaint>> {
        Self::send(
            self.request(Method::GET, &["api", "complaints", "my-history"])?
                .query(&[("userId", user_id)]),
        )
        .await
    }

    /// Delete every complaint filed by `user_id`.
    pub async fn clear_history(&self, user_id: &str) -> ClientResult<ClearedHistory> {
        Self::send(
            self.request(Method::DELETE, &["api", "complaints", "my-history", "clear"])?
                .json(&json!({ "userId": user_id })),
        )
        .await
    }

    /// Register and sign in.
    pub async fn register(&mut self, account: &NewAccount) -> ClientResult<Session> {
        let request = self
            .request(Method::POST, &["api", "auth", "register"])?
            .json(account);
        let session: Session = Self::send(request).await?;
        self.use_session(&session);
        Ok(session)
    }

    /// Sign in with email and password.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<Session> {
        let request = self
            .request(Method::POST, &["api", "auth", "login"])?
            .json(&json!({ "email": email, "password": password }));
        let session: Session = Self::send(request).await?;
        self.use_session(&session);
        Ok(session)
    }

    /// The signed-in account.
    pub async fn me(&self) -> ClientResult<User> {
        self.require_token()?;
        Self::send(self.request(Method::GET, &["api", "auth", "me"])?).await
    }

    /// End the session on the server and drop the token.
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.require_token()?;
        let _: IgnoredAny =
            Self::send(self.request(Method::POST, &["api", "auth", "logout"])?).await?;
        self.sign_out_locally();
        Ok(())
    }

    /// Change the password. The returned session carries the new token.
    pub async fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> ClientResult<Session> {
        self.require_token()?;
        let request = self
            .request(Method::POST, &["api", "auth", "change-password"])?
            .json(&json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            }));
        let session: Session = Self::send(request).await?;
        self.use_session(&session);
        Ok(session)
    }

    /// List complaints, newest first.
    pub async fn list(&self, filter: &ListFilter) -> ClientResult<Vec<Complaint>> {
        Self::send(self.request(Method::GET, &["api", "complaints"])?.query(filter)).await
    }

    /// Respond to a complaint, closing it.
    pub async fn respond(&self, id: &str, response: &str) -> ClientResult<Complaint> {
        let id = ticket_segment(id)?;
        Self::send(
            self.request(Method::PATCH, &["api", "complaints", id, "respond"])?
                .json(&json!({ "adminResponse": response })),
        )
        .await
    }

    /// Close a complaint without responding.
    pub async fn close(&self, id: &str) -> ClientResult<Complaint> {
        let id = ticket_segment(id)?;
        Self::send(self.request(Method::PATCH, &["api", "complaints", id, "close"])?).await
    }

    /// Delete a complaint.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let id = ticket_segment(id)?;
        let _: IgnoredAny =
            Self::send(self.request(Method::DELETE, &["api", "complaints", id])?).await?;
        Ok(())
    }

    /// Dashboard counts.
    pub async fn stats(&self) -> ClientResult<Stats> {
        Self::send(self.request(Method::GET, &["api", "complaints", "stats"])?).await
    }

    /// CSV export of the filtered list.
    pub async fn export_csv(&self, filter: &ListFilter) -> ClientResult<String> {
        let response = self
            .request(Method::GET, &["api", "complaints", "export"])?
            .query(filter)
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }

    /// `base_url` with `segments` appended, each percent-encoded as a
    /// single path segment.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let builder = self.client.request(method, self.endpoint(segments)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn require_token(&self) -> ClientResult<()> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(ClientError::NotSignedIn)
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_body(status, &body);
        debug!(status = %status, error = %err, "API call failed");
        Err(err)
    }
}

/// A ticket or complaint ID as a path segment.
fn ticket_segment(ticket: &str) -> ClientResult<&str> {
    let ticket = ticket.trim();
    if matches!(ticket, "" | "." | "..") {
        return Err(ClientError::InvalidTicket(ticket.to_string()));
    }
    Ok(ticket)
}
