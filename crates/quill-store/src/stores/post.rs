// File: src/stores/post.rs
// Purpose: Post collection cache with CRUD operations over the backend

use std::sync::Arc;

use quill_forms::BusyFlag;

use crate::backend::{from_row, from_rows, to_row, Backend, Query, Table};
use crate::error::StoreError;
use crate::models::{NewPost, Post, PostPatch};

/// Cached posts plus the request state of the last operation
///
/// Every operation sets the busy flag for its duration, clears the error
/// slot on entry and records a stringified error on failure. The collection
/// is only written after the backend call succeeded.
pub struct PostStore {
    backend: Arc<dyn Backend>,
    posts: Vec<Post>,
    current: Option<Post>,
    busy: BusyFlag,
    error: Option<String>,
}

impl PostStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            posts: Vec::new(),
            current: None,
            busy: BusyFlag::new(),
            error: None,
        }
    }

    // ===== Getters =====

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn current(&self) -> Option<&Post> {
        self.current.as_ref()
    }

    pub fn published_posts(&self) -> Vec<&Post> {
        self.posts.iter().filter(|post| post.published).collect()
    }

    pub fn draft_posts(&self) -> Vec<&Post> {
        self.posts.iter().filter(|post| !post.published).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ===== Operations =====

    /// Load every post, newest first
    pub async fn fetch_posts(&mut self) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;
        tracing::debug!("fetching posts from {}", self.backend.name());

        match self.try_fetch_posts().await {
            Ok(posts) => {
                self.posts = posts;
                true
            }
            Err(err) => self.fail("fetch_posts", err),
        }
    }

    /// Load one post into `current`
    pub async fn fetch_post(&mut self, id: &str) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.try_fetch_post(id).await {
            Ok(post) => {
                self.current = Some(post);
                true
            }
            Err(err) => self.fail("fetch_post", err),
        }
    }

    /// Create an unpublished post, prepend it and make it current
    pub async fn create_post(&mut self, title: &str, content: &str, author_id: &str) -> Option<Post> {
        self.create(NewPost::draft(title, content, author_id)).await
    }

    /// Create a post from a full payload, prepend it and make it current
    pub async fn create(&mut self, new_post: NewPost) -> Option<Post> {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.try_create(&new_post).await {
            Ok(post) => {
                tracing::debug!("created post {}", post.id);
                self.posts.insert(0, post.clone());
                self.current = Some(post.clone());
                Some(post)
            }
            Err(err) => {
                self.fail("create_post", err);
                None
            }
        }
    }

    /// Apply a partial update; replaces the cached copy and sets it current
    pub async fn update_post(&mut self, id: &str, patch: PostPatch) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.try_update(id, &patch).await {
            Ok(post) => {
                if let Some(slot) = self.posts.iter_mut().find(|p| p.id == post.id) {
                    *slot = post.clone();
                }
                self.current = Some(post);
                true
            }
            Err(err) => self.fail("update_post", err),
        }
    }

    pub async fn delete_post(&mut self, id: &str) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.backend.delete(Table::Posts, id).await {
            Ok(()) => {
                self.posts.retain(|post| post.id != id);
                if self.current.as_ref().map(|post| post.id == id).unwrap_or(false) {
                    self.current = None;
                }
                true
            }
            Err(err) => self.fail("delete_post", err.into()),
        }
    }

    /// Flip `published` on a cached post
    ///
    /// An id missing from the collection is reported locally without a
    /// backend call.
    pub async fn toggle_publish(&mut self, id: &str) -> bool {
        let Some(published) = self.find(id).map(|post| post.published) else {
            return self.fail("toggle_publish", StoreError::NotFound("Post"));
        };

        self.update_post(id, PostPatch::published(!published)).await
    }

    // ===== Backend calls =====

    async fn try_fetch_posts(&self) -> Result<Vec<Post>, StoreError> {
        let rows = self
            .backend
            .select(&Query::from(Table::Posts).order("created_at", false))
            .await?;
        from_rows(rows)
    }

    async fn try_fetch_post(&self, id: &str) -> Result<Post, StoreError> {
        let row = self
            .backend
            .select_single(&Query::from(Table::Posts).eq("id", id))
            .await?;
        from_row(row)
    }

    async fn try_create(&self, new_post: &NewPost) -> Result<Post, StoreError> {
        let row = self.backend.insert(Table::Posts, to_row(new_post)?).await?;
        from_row(row)
    }

    async fn try_update(&self, id: &str, patch: &PostPatch) -> Result<Post, StoreError> {
        let row = self.backend.update(Table::Posts, id, to_row(patch)?).await?;
        from_row(row)
    }

    fn fail(&mut self, op: &str, err: StoreError) -> bool {
        tracing::warn!("{} failed: {}", op, err);
        self.error = Some(err.to_string());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Row};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    async fn seeded() -> (MemoryBackend, PostStore) {
        let backend = MemoryBackend::new();
        backend
            .seed(
                Table::Posts,
                vec![
                    row(json!({ "id": "1", "title": "Old", "content": "x", "author_id": "u1",
                                "published": true, "created_at": "2024-01-01T00:00:00Z" })),
                    row(json!({ "id": "2", "title": "New", "content": "y", "author_id": "u1",
                                "published": false, "created_at": "2024-02-01T00:00:00Z" })),
                ],
            )
            .await;
        let store = PostStore::new(Arc::new(backend.clone()));
        (backend, store)
    }

    #[tokio::test]
    async fn test_fetch_posts_newest_first() {
        let (_, mut store) = seeded().await;
        assert!(store.fetch_posts().await);

        let ids: Vec<_> = store.posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(store.published_posts().len(), 1);
        assert_eq!(store.draft_posts()[0].id, "2");
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_collection() {
        let (backend, mut store) = seeded().await;
        store.fetch_posts().await;

        backend.fail_with("network down").await;
        assert!(!store.fetch_posts().await);
        assert_eq!(store.error(), Some("network down"));
        assert_eq!(store.posts().len(), 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_post_sets_current() {
        let (_, mut store) = seeded().await;
        assert!(store.fetch_post("1").await);
        assert_eq!(store.current().map(|p| p.title.as_str()), Some("Old"));

        assert!(!store.fetch_post("missing").await);
        assert!(store.error().is_some());
        assert_eq!(store.current().map(|p| p.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn test_create_post_prepends_and_sets_current() {
        let (_, mut store) = seeded().await;
        store.fetch_posts().await;

        let created = store.create_post("A", "B", "u1").await.unwrap();
        assert_eq!(created.title, "A");
        assert!(!created.published);
        assert_eq!(store.posts().len(), 3);
        assert_eq!(store.posts()[0], created);
        assert_eq!(store.current(), Some(&created));
    }

    #[tokio::test]
    async fn test_update_post_replaces_cached_copy() {
        let (_, mut store) = seeded().await;
        store.fetch_posts().await;

        let patch = PostPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(store.update_post("1", patch).await);
        assert_eq!(store.find("1").map(|p| p.title.as_str()), Some("Renamed"));
        assert_eq!(store.current().map(|p| p.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn test_delete_post_clears_current() {
        let (_, mut store) = seeded().await;
        store.fetch_posts().await;
        store.fetch_post("2").await;

        assert!(store.delete_post("2").await);
        assert!(store.find("2").is_none());
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn test_toggle_publish_flips_flag() {
        let (_, mut store) = seeded().await;
        store.fetch_posts().await;

        assert!(store.toggle_publish("2").await);
        assert!(store.find("2").unwrap().published);
        assert!(store.toggle_publish("2").await);
        assert!(!store.find("2").unwrap().published);
    }

    #[tokio::test]
    async fn test_toggle_publish_unknown_id_skips_backend() {
        let (backend, mut store) = seeded().await;
        backend.fail_with("must not be called").await;

        assert!(!store.toggle_publish("nope").await);
        assert_eq!(store.error(), Some("Post not found"));
    }

    #[tokio::test]
    async fn test_numeric_id_row_loads_and_toggles() {
        let backend = MemoryBackend::new();
        backend
            .seed(Table::Posts, vec![row(json!({ "id": 1, "published": false }))])
            .await;
        let mut store = PostStore::new(Arc::new(backend.clone()));

        assert!(store.fetch_posts().await);
        assert_eq!(store.posts()[0].id, "1");

        assert!(store.toggle_publish("1").await);
        assert!(store.posts()[0].published);
        assert_eq!(backend.rows(Table::Posts).await[0]["published"], true);
    }

    #[tokio::test]
    async fn test_null_columns_do_not_fail_fetch() {
        let backend = MemoryBackend::new();
        backend
            .seed(
                Table::Posts,
                vec![row(json!({ "id": "1", "title": "A", "content": "B", "author_id": "u1",
                                 "excerpt": null, "tags": null, "category_id": null }))],
            )
            .await;
        let mut store = PostStore::new(Arc::new(backend));

        assert!(store.fetch_posts().await);
        assert_eq!(store.error(), None);
        assert_eq!(store.posts()[0].excerpt, "");
        assert!(store.posts()[0].tags.is_empty());
    }
}
