// File: src/toast.rs
// Purpose: Transient notification queue with per-toast expiry

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display time
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

/// One notification
///
/// A zero `duration` means the toast stays until removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_sticky(&self) -> bool {
        self.duration.is_zero()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        !self.is_sticky() && now.saturating_duration_since(self.shown_at) >= self.duration
    }
}

/// Ordered toasts, oldest first
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    default_duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl ToastQueue {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            default_duration,
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Queue a toast; `None` uses the default duration. Returns its id.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, duration: Option<Duration>) -> String {
        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        self.toasts.push(Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            duration: duration.unwrap_or(self.default_duration),
            shown_at: Instant::now(),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Success, None)
    }

    pub fn error(&mut self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Error, None)
    }

    pub fn info(&mut self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Info, None)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Warning, None)
    }

    pub fn remove(&mut self, id: &str) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Drop expired toasts; returns how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now));
        before - self.toasts.len()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_remove() {
        let mut queue = ToastQueue::default();
        let saved = queue.success("Post saved");
        let failed = queue.error("Could not delete");

        assert_eq!(queue.len(), 2);
        assert_ne!(saved, failed);
        assert_eq!(queue.toasts()[0].kind, ToastKind::Success);
        assert_eq!(queue.toasts()[1].duration, DEFAULT_DURATION);

        queue.remove(&saved);
        assert_eq!(queue.toasts()[0].message, "Could not delete");
    }

    #[test]
    fn test_prune_respects_duration_and_sticky() {
        let mut queue = ToastQueue::new(Duration::from_secs(3));
        queue.info("short");
        queue.show("pinned", ToastKind::Warning, Some(Duration::ZERO));
        queue.show("long", ToastKind::Info, Some(Duration::from_secs(10)));

        assert_eq!(queue.prune(Instant::now()), 0);
        assert_eq!(queue.prune(Instant::now() + Duration::from_secs(5)), 1);

        let left: Vec<_> = queue.toasts().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(left, vec!["pinned", "long"]);

        queue.prune(Instant::now() + Duration::from_secs(3600));
        assert_eq!(queue.len(), 1);
        assert!(queue.toasts()[0].is_sticky());
    }
}
