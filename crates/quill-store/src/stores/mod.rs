//! Resource stores
//!
//! Each store caches one collection (or the signed-in user) and runs every
//! operation as idle → loading → success | failure. A failed call leaves the
//! cached data exactly as it was.

pub mod auth;
pub mod comment;
pub mod post;

pub use auth::AuthStore;
pub use comment::CommentStore;
pub use post::PostStore;
