// File: src/auth/memory.rs
// Purpose: In-memory auth client for tests, demos and local development

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{AuthClient, AuthEvent, AuthUser, Session};
use crate::error::{BackendError, BackendResult};

/// Message returned for an unknown email or wrong password
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

const EVENT_CAPACITY: usize = 16;
const SESSION_HOURS: i64 = 1;

#[derive(Debug, Clone)]
struct Account {
    user: AuthUser,
    password: String,
}

/// In-memory auth client
///
/// Accounts are registered up front with [`MemoryAuth::add_user`]. Sign-in
/// and sign-out broadcast [`AuthEvent`]s to every subscriber.
#[derive(Clone)]
pub struct MemoryAuth {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    session: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Register an account; email is the login key
    pub async fn add_user(&self, id: impl Into<String>, email: impl Into<String>, password: impl Into<String>) {
        let email = email.into();
        let account = Account {
            user: AuthUser {
                id: id.into(),
                email: email.clone(),
            },
            password: password.into(),
        };
        self.accounts.write().await.insert(email, account);
    }

    fn emit(&self, event: AuthEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl AuthClient for MemoryAuth {
    async fn session(&self) -> BackendResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Option<Session>> {
        let account = self
            .accounts
            .read()
            .await
            .get(email)
            .filter(|account| account.password == password)
            .cloned()
            .ok_or_else(|| BackendError::new(INVALID_CREDENTIALS))?;

        let session = Session {
            user: account.user,
            access_token: Uuid::new_v4().to_string(),
            expires_at: Some(Utc::now() + Duration::hours(SESSION_HOURS)),
        };

        *self.session.write().await = Some(session.clone());
        tracing::debug!("signed in {}", email);
        self.emit(AuthEvent::SignedIn);

        Ok(Some(session))
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let previous = self.session.write().await.take();
        if previous.is_some() {
            self.emit(AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
