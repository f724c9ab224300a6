//! Signed-in user state.
//!
//! A [`Session`] is created by login or registration, written to disk with
//! [`Session::persist`], loaded again on start-up with [`Session::restore`]
//! and removed with [`Session::clear`] on logout.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::models::User;

/// An authenticated user and the bearer token that proves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    /// Load a persisted session.
    ///
    /// Returns `None` when nothing was stored or the file is unreadable as a
    /// session. The token is not checked against the server here; see
    /// [`crate::ApiClient::resume`].
    pub async fn restore(path: impl AsRef<Path>) -> ClientResult<Option<Self>> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => {
                debug!(path = %path.display(), "Session restored");
                Ok(Some(session))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    /// Write the session to `path`, creating parent directories.
    pub async fn persist(&self, path: impl AsRef<Path>) -> ClientResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await?;
        debug!(path = %path.display(), user_id = %self.user.id, "Session persisted");
        Ok(())
    }

    /// Remove a persisted session. Missing files are fine.
    pub async fn clear(path: impl AsRef<Path>) -> ClientResult<()> {
        match tokio::fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the signed-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}
