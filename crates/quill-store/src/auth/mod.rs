//! Auth boundary
//!
//! Session lookup, password sign-in, sign-out and a stream of
//! [`AuthEvent`]s. The stores never see credentials beyond passing them
//! through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::BackendResult;

pub mod memory;

pub use memory::MemoryAuth;

/// Auth state transitions pushed by the auth service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}

/// Identity attached to a session (not the profile row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Hosted auth client
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Current session, if any
    async fn session(&self) -> BackendResult<Option<Session>>;

    /// Password sign-in; `Ok(None)` means the service accepted the call but
    /// returned no session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Option<Session>>;

    async fn sign_out(&self) -> BackendResult<()>;

    /// Subscribe to auth state changes
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
