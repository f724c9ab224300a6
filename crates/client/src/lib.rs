//! HTTP client for the YellowShield REST API.
//!
//! [`ApiClient`] wraps the complaint and account endpoints. [`Session`] holds
//! the signed-in user and can be persisted between runs; [`LocalHistory`]
//! remembers ticket IDs filed without an account.

pub mod client;
pub mod error;
pub mod history;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use history::{HistoryEntry, LocalHistory};
pub use models::*;
pub use session::Session;
