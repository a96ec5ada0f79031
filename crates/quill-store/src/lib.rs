// Quill Store
// Resource stores (posts, comments, auth) over a backend-as-a-service boundary,
// with view adapters, route guards and namespaced local persistence

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod navigation;
pub mod storage;
pub mod stores;
pub mod views;

pub use auth::{AuthClient, AuthEvent, AuthUser, MemoryAuth, Session};
pub use backend::{Backend, MemoryBackend, Query, Row, Table};
pub use config::Config;
pub use error::{BackendError, BackendResult, StorageError, StorageResult, StoreError};
pub use guard::{admin_guard, auth_guard, AuthState};
pub use models::{Comment, NewComment, NewPost, Post, PostPatch, Profile, Role};
pub use navigation::{NavigationPolicy, Navigator, RecordingNavigator, Redirect};
pub use storage::{FilesystemDriver, MemoryDriver, Storage, StorageDriver};
pub use stores::{AuthStore, CommentStore, PostStore};
pub use views::{AuthView, CommentView, Outcome, PostView};
