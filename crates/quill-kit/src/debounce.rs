// File: src/debounce.rs
// Purpose: Debounce and throttle for callbacks driven by user input

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

/// Default quiet period
pub const DEFAULT_WAIT: Duration = Duration::from_millis(300);

/// Delays a callback until calls stop arriving for `wait`
///
/// Trailing mode (default): every call replaces the pending one, the last
/// callback runs once the quiet period elapses.
///
/// Immediate mode: the first call of a burst runs right away, later calls
/// in the same burst only extend the quiet period.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    immediate: bool,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT)
    }
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            immediate: false,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Fire on the leading edge instead of the trailing one
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let wait = self.wait;
        let mut pending = self.slot();

        let idle = pending.as_ref().map(JoinHandle::is_finished).unwrap_or(true);
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        if self.immediate {
            *pending = Some(tokio::spawn(tokio::time::sleep(wait)));
            drop(pending);
            if idle {
                f();
            }
        } else {
            *pending = Some(tokio::spawn(async move {
                tokio::time::sleep(wait).await;
                f();
            }));
        }
    }

    /// Drop the pending call, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }

    /// True while a quiet period is running
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

/// Runs a callback at most once per `limit` window
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self { limit, last: None }
    }

    /// Run `f` unless it already ran within the window; returns whether it ran
    pub fn try_call<F: FnOnce()>(&mut self, f: F) -> bool {
        self.try_call_at(Instant::now(), f)
    }

    pub fn try_call_at<F: FnOnce()>(&mut self, now: Instant, f: F) -> bool {
        let open = self
            .last
            .map(|last| now.duration_since(last) >= self.limit)
            .unwrap_or(true);

        if open {
            self.last = Some(now);
            f();
        }
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WAIT: Duration = Duration::from_millis(30);

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let make = move || {
            let c = Arc::clone(&c);
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (count, make)
    }

    #[tokio::test]
    async fn test_trailing_runs_last_call_once() {
        let debouncer = Debouncer::new(WAIT);
        let (count, make) = counter();

        for _ in 0..5 {
            debouncer.call(make());
        }
        assert!(debouncer.is_pending());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(WAIT * 4).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_immediate_runs_leading_edge_only() {
        let debouncer = Debouncer::new(WAIT).immediate(true);
        let (count, make) = counter();

        debouncer.call(make());
        debouncer.call(make());
        debouncer.call(make());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(WAIT * 4).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        debouncer.call(make());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancel() {
        let debouncer = Debouncer::new(WAIT);
        let (count, make) = counter();

        debouncer.call(make());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(WAIT * 4).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_wait() {
        assert_eq!(Debouncer::default().wait(), Duration::from_millis(300));
    }

    #[test]
    fn test_throttle_window() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let start = Instant::now();
        let mut runs = 0;

        assert!(throttle.try_call_at(start, || runs += 1));
        assert!(!throttle.try_call_at(start + Duration::from_millis(50), || runs += 1));
        assert!(throttle.try_call_at(start + Duration::from_millis(100), || runs += 1));
        assert_eq!(runs, 2);
    }
}
