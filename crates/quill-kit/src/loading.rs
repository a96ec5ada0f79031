// File: src/loading.rs
// Purpose: Run a fallible future with a busy flag and an error slot

use std::fmt::Display;
use std::future::Future;

use quill_forms::BusyFlag;

/// Recorded when an error stringifies to nothing
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Await `fut` with `busy` set, clearing `error` first
///
/// On failure the error message lands in `error` and `None` is returned.
pub async fn with_loading<T, E, Fut>(busy: &BusyFlag, error: &mut Option<String>, fut: Fut) -> Option<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let _busy = busy.acquire();
    *error = None;

    match fut.await {
        Ok(value) => Some(value),
        Err(err) => {
            let message = err.to_string();
            tracing::error!("operation failed: {}", message);
            *error = Some(if message.is_empty() {
                DEFAULT_ERROR_MESSAGE.to_string()
            } else {
                message
            });
            None
        }
    }
}
