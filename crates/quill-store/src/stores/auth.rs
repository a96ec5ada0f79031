// File: src/stores/auth.rs
// Purpose: Signed-in profile cache driven by the auth service

use std::sync::Arc;

use quill_forms::BusyFlag;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::auth::{AuthClient, AuthEvent};
use crate::backend::{from_row, Backend, Query, Table};
use crate::error::{StorageResult, StoreError};
use crate::models::Profile;
use crate::storage::Storage;

/// Storage key for the persisted profile
pub const PERSIST_KEY: &str = "auth.user";

/// Message when sign-in returns without a session
pub const NO_SESSION_MESSAGE: &str = "Sign-in failed: no session returned";

/// Signed-in user state
///
/// `user` is the profile row of the session owner. It is `None` whenever
/// there is no session or the profile could not be loaded.
pub struct AuthStore {
    backend: Arc<dyn Backend>,
    auth: Arc<dyn AuthClient>,
    user: Option<Profile>,
    busy: BusyFlag,
    error: Option<String>,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn Backend>, auth: Arc<dyn AuthClient>) -> Self {
        Self {
            backend,
            auth,
            user: None,
            busy: BusyFlag::new(),
            error: None,
        }
    }

    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(Profile::is_admin).unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Load the profile for the current session
    ///
    /// No session clears the user without recording an error.
    pub async fn fetch_user(&mut self) -> Option<Profile> {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.try_fetch_user().await {
            Ok(user) => {
                self.user = user.clone();
                user
            }
            Err(err) => {
                tracing::warn!("fetch_user failed: {}", err);
                self.error = Some(err.to_string());
                self.user = None;
                None
            }
        }
    }

    /// Sign in and require the admin role
    ///
    /// A non-admin is signed out again. Failures are recorded in the error
    /// slot and also returned.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Profile, StoreError> {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.try_login(email, password).await {
            Ok(profile) => {
                tracing::info!("admin {} signed in", profile.email);
                self.user = Some(profile.clone());
                Ok(profile)
            }
            Err(err) => {
                tracing::warn!("login failed for {}: {}", email, err);
                self.error = Some(err.to_string());
                self.user = None;
                Err(err)
            }
        }
    }

    /// Sign out and forget the user
    pub async fn logout(&mut self) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.auth.sign_out().await {
            Ok(()) => {
                tracing::info!("signed out");
                self.user = None;
                true
            }
            Err(err) => {
                tracing::warn!("logout failed: {}", err);
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Refresh the user from the session; errors only reach the logs
    pub async fn check_auth(&mut self) -> bool {
        self.fetch_user().await;
        if let Some(err) = self.error.take() {
            tracing::error!("auth check failed: {}", err);
        }
        self.is_authenticated()
    }

    pub async fn handle_auth_event(&mut self, event: AuthEvent) {
        tracing::debug!("auth event {:?}", event);
        match event {
            AuthEvent::SignedIn => {
                self.fetch_user().await;
            }
            AuthEvent::SignedOut => {
                self.user = None;
            }
        }
    }

    /// Subscribe to the auth service's event stream
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.auth.subscribe()
    }

    /// Apply every event already queued on `events` and return how many ran
    ///
    /// Never waits, so it suits receivers whose sender lives as long as the
    /// auth client.
    pub async fn drain_events(&mut self, events: &mut broadcast::Receiver<AuthEvent>) -> usize {
        let mut applied = 0;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle_auth_event(event).await;
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("auth listener lagged, skipped {} event(s)", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Apply events until the channel closes
    ///
    /// Holds the store for as long as the sender lives; use `drain_events`
    /// with the auth client's own subscription.
    pub async fn listen(&mut self, mut events: broadcast::Receiver<AuthEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_auth_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("auth listener lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Save the cached profile (or its absence)
    pub async fn persist(&self, storage: &Storage) -> StorageResult<()> {
        match &self.user {
            Some(user) => storage.set(PERSIST_KEY, user).await,
            None => storage.remove(PERSIST_KEY).await,
        }
    }

    /// Load a previously persisted profile; returns whether one was found
    pub async fn restore(&mut self, storage: &Storage) -> StorageResult<bool> {
        let user: Option<Profile> = storage.get(PERSIST_KEY).await?;
        let found = user.is_some();
        if found {
            self.user = user;
        }
        Ok(found)
    }

    async fn load_profile(&self, user_id: &str) -> Result<Profile, StoreError> {
        let row = self
            .backend
            .select_single(&Query::from(Table::Profiles).eq("id", user_id))
            .await?;
        from_row(row)
    }

    async fn try_fetch_user(&self) -> Result<Option<Profile>, StoreError> {
        match self.auth.session().await? {
            Some(session) => Ok(Some(self.load_profile(&session.user.id).await?)),
            None => Ok(None),
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<Profile, StoreError> {
        let session = self
            .auth
            .sign_in_with_password(email, password)
            .await?
            .ok_or_else(|| StoreError::Auth(NO_SESSION_MESSAGE.to_string()))?;

        let profile = self.load_profile(&session.user.id).await?;
        if !profile.is_admin() {
            self.auth.sign_out().await?;
            return Err(StoreError::Forbidden);
        }

        Ok(profile)
    }
}
