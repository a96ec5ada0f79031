// File: src/stores/comment.rs
// Purpose: Comment cache for the post being viewed

use std::sync::Arc;

use chrono::Utc;
use quill_forms::BusyFlag;

use crate::backend::{from_row, from_rows, to_row, Backend, Query, Table};
use crate::error::StoreError;
use crate::models::{Comment, CommentPatch, NewComment};

pub struct CommentStore {
    backend: Arc<dyn Backend>,
    comments: Vec<Comment>,
    busy: BusyFlag,
    error: Option<String>,
}

impl CommentStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            comments: Vec::new(),
            busy: BusyFlag::new(),
            error: None,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Cached comments belonging to one post
    pub fn post_comments(&self, post_id: &str) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the cache with a post's comments, oldest first
    pub async fn fetch_comments(&mut self, post_id: &str) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.try_fetch(post_id).await {
            Ok(comments) => {
                self.comments = comments;
                true
            }
            Err(err) => self.fail("fetch_comments", err),
        }
    }

    /// Insert a comment and append it to the cache
    pub async fn add_comment(&mut self, content: &str, post_id: &str, author_id: &str) -> Option<Comment> {
        let _busy = self.busy.acquire();
        self.error = None;

        let new_comment = NewComment {
            content: content.to_string(),
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
        };

        match self.try_insert(&new_comment).await {
            Ok(comment) => {
                self.comments.push(comment.clone());
                Some(comment)
            }
            Err(err) => {
                self.fail("add_comment", err);
                None
            }
        }
    }

    /// Replace a comment's content and stamp `updated_at`
    pub async fn update_comment(&mut self, id: &str, content: &str) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        let patch = CommentPatch {
            content: content.to_string(),
            updated_at: Utc::now(),
        };

        match self.try_update(id, &patch).await {
            Ok(comment) => {
                if let Some(slot) = self.comments.iter_mut().find(|c| c.id == comment.id) {
                    *slot = comment;
                }
                true
            }
            Err(err) => self.fail("update_comment", err),
        }
    }

    pub async fn delete_comment(&mut self, id: &str) -> bool {
        let _busy = self.busy.acquire();
        self.error = None;

        match self.backend.delete(Table::Comments, id).await {
            Ok(()) => {
                self.comments.retain(|comment| comment.id != id);
                true
            }
            Err(err) => self.fail("delete_comment", err.into()),
        }
    }

    async fn try_fetch(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        let query = Query::from(Table::Comments)
            .eq("post_id", post_id)
            .order("created_at", true);
        from_rows(self.backend.select(&query).await?)
    }

    async fn try_insert(&self, new_comment: &NewComment) -> Result<Comment, StoreError> {
        from_row(self.backend.insert(Table::Comments, to_row(new_comment)?).await?)
    }

    async fn try_update(&self, id: &str, patch: &CommentPatch) -> Result<Comment, StoreError> {
        from_row(self.backend.update(Table::Comments, id, to_row(patch)?).await?)
    }

    fn fail(&mut self, op: &str, err: StoreError) -> bool {
        tracing::warn!("{} failed: {}", op, err);
        self.error = Some(err.to_string());
        false
    }
}
