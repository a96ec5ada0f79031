//! # Quill Kit
//!
//! UI-agnostic helpers shared by Quill front ends:
//!
//! - [`debounce`]: trailing/leading-edge debouncer and a throttle
//! - [`markdown`]: sanitized markdown rendering, excerpts, reading time
//! - [`dates`]: human date formatting and calendar-day checks
//! - [`text`]: `truncate` and `slugify`
//! - [`toast`]: notification queue with expiry
//! - [`loading`]: busy-flag wrapper for fallible futures

pub mod dates;
pub mod debounce;
pub mod loading;
pub mod markdown;
pub mod text;
pub mod toast;

pub use debounce::{Debouncer, Throttle};
pub use loading::with_loading;
pub use text::{slugify, truncate};
pub use toast::{Toast, ToastKind, ToastQueue};
