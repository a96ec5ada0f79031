//! View-binding adapters
//!
//! A view wraps one store and turns its commands into an [`Outcome`]: did it
//! succeed, and where (if anywhere) should the UI go next. Navigation is
//! decided by the [`NavigationPolicy`], never by the store.

use crate::error::StoreError;
use crate::models::{Comment, Post, PostPatch, Profile};
use crate::navigation::{NavigationPolicy, Navigator, Redirect};
use crate::stores::{AuthStore, CommentStore, PostStore};

/// Result of a view command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub ok: bool,
    pub redirect: Option<Redirect>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            ok: true,
            redirect: None,
        }
    }

    pub fn failure() -> Self {
        Self::default()
    }

    pub fn redirect(redirect: Redirect) -> Self {
        Self {
            ok: true,
            redirect: Some(redirect),
        }
    }

    fn from_ok(ok: bool) -> Self {
        if ok {
            Self::success()
        } else {
            Self::failure()
        }
    }

    /// Hand the redirect (if any) to a navigator
    pub fn apply(&self, navigator: &mut dyn Navigator) {
        if let Some(redirect) = &self.redirect {
            navigator.navigate(redirect);
        }
    }
}

// ============================================================================
// POSTS
// ============================================================================

pub struct PostView {
    store: PostStore,
    policy: NavigationPolicy,
}

impl PostView {
    pub fn new(store: PostStore, policy: NavigationPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PostStore {
        &mut self.store
    }

    pub fn posts(&self) -> &[Post] {
        self.store.posts()
    }

    pub fn current(&self) -> Option<&Post> {
        self.store.current()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    pub async fn load(&mut self) -> Outcome {
        Outcome::from_ok(self.store.fetch_posts().await)
    }

    pub async fn open(&mut self, id: &str) -> Outcome {
        Outcome::from_ok(self.store.fetch_post(id).await)
    }

    /// Create a post and go to its edit page
    pub async fn create(&mut self, title: &str, content: &str, author_id: &str) -> Outcome {
        match self.store.create_post(title, content, author_id).await {
            Some(post) => Outcome::redirect(self.policy.after_create_post(&post)),
            None => Outcome::failure(),
        }
    }

    pub async fn update(&mut self, id: &str, patch: PostPatch) -> Outcome {
        Outcome::from_ok(self.store.update_post(id, patch).await)
    }

    /// Delete a post and go back to the list
    pub async fn delete(&mut self, id: &str) -> Outcome {
        if self.store.delete_post(id).await {
            Outcome::redirect(self.policy.after_delete_post())
        } else {
            Outcome::failure()
        }
    }

    pub async fn toggle_publish(&mut self, id: &str) -> Outcome {
        Outcome::from_ok(self.store.toggle_publish(id).await)
    }
}

// ============================================================================
// COMMENTS
// ============================================================================

pub struct CommentView {
    store: CommentStore,
}

impl CommentView {
    pub fn new(store: CommentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CommentStore {
        &self.store
    }

    pub fn comments_for(&self, post_id: &str) -> Vec<&Comment> {
        self.store.post_comments(post_id)
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    pub async fn load(&mut self, post_id: &str) -> Outcome {
        Outcome::from_ok(self.store.fetch_comments(post_id).await)
    }

    pub async fn add(&mut self, content: &str, post_id: &str, author_id: &str) -> Outcome {
        Outcome::from_ok(self.store.add_comment(content, post_id, author_id).await.is_some())
    }

    pub async fn edit(&mut self, id: &str, content: &str) -> Outcome {
        Outcome::from_ok(self.store.update_comment(id, content).await)
    }

    pub async fn remove(&mut self, id: &str) -> Outcome {
        Outcome::from_ok(self.store.delete_comment(id).await)
    }
}

// ============================================================================
// AUTH
// ============================================================================

pub struct AuthView {
    store: AuthStore,
    policy: NavigationPolicy,
}

impl AuthView {
    pub fn new(store: AuthStore, policy: NavigationPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AuthStore {
        &mut self.store
    }

    pub fn user(&self) -> Option<&Profile> {
        self.store.user()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    /// Sign in; on success go to the admin area
    ///
    /// The store error is passed through so the caller can show it inline.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Outcome, StoreError> {
        self.store.login(email, password).await?;
        Ok(Outcome::redirect(self.policy.after_login()))
    }

    /// Sign out; on success go home
    pub async fn logout(&mut self) -> Outcome {
        if self.store.logout().await {
            Outcome::redirect(self.policy.after_logout())
        } else {
            Outcome::failure()
        }
    }
}
