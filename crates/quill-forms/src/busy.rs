// File: src/busy.rs
// Purpose: Busy flag with scope-guarded clearing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Boolean "operation in flight" indicator for loading UI
///
/// Not a lock: two overlapping [`BusyGuard`]s both set the flag and the first
/// one dropped clears it. Callers must not fire duplicate concurrent
/// operations if they rely on the flag being accurate.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// Set the flag until the returned guard is dropped
    pub fn acquire(&self) -> BusyGuard {
        self.inner.store(true, Ordering::SeqCst);
        BusyGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Force the flag off without a guard
    pub fn clear(&self) {
        self.inner.store(false, Ordering::SeqCst);
    }
}

/// Clears its [`BusyFlag`] on drop, on every exit path
#[derive(Debug)]
#[must_use = "the busy flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard {
    inner: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clears_on_drop() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        {
            let _guard = flag.acquire();
            assert!(flag.is_busy());
        }

        assert!(!flag.is_busy());
    }

    #[test]
    fn test_guard_clears_on_early_return() {
        fn work(flag: &BusyFlag, fail: bool) -> Result<(), &'static str> {
            let _guard = flag.acquire();
            if fail {
                return Err("boom");
            }
            Ok(())
        }

        let flag = BusyFlag::new();
        assert!(work(&flag, true).is_err());
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_overlapping_guards_are_not_counted() {
        let flag = BusyFlag::new();
        let first = flag.acquire();
        let second = flag.acquire();

        drop(first);
        // The flag carries no request identity, so the first drop wins.
        assert!(!flag.is_busy());
        drop(second);
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = BusyFlag::new();
        let observer = flag.clone();
        let _guard = flag.acquire();
        assert!(observer.is_busy());
    }
}
