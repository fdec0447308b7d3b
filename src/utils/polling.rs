use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How a polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The check produced a value.
    Ready(T),
    /// `max_wait` elapsed without the check producing a value.
    TimedOut { waited: Duration },
    /// The cancellation token fired before the check produced a value.
    Cancelled,
}

/// Sleeps for `duration` unless `cancel` fires first.
///
/// Returns `false` when the sleep was interrupted by cancellation.
pub async fn sleep_unless_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Polls `check` until it yields a value, `max_wait` elapses, or `cancel` fires.
///
/// # Arguments
/// * `check` - Returns `Ok(Some(value))` when done, `Ok(None)` to keep polling
/// * `max_wait` - Maximum time to wait before giving up
/// * `poll_interval` - Time to sleep between polls
/// * `cancel` - Checked before every poll and raced against every sleep
/// * `operation_name` - Name of the operation for logging
///
/// Errors returned by `check` are logged and treated like `Ok(None)`. The last
/// sleep is shortened so the loop never overshoots `max_wait` by a full interval.
pub async fn poll_until<T, E, F, Fut>(
    mut check: F,
    max_wait: Duration,
    poll_interval: Duration,
    cancel: &CancellationToken,
    operation_name: &str,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: Display,
{
    let start = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            debug!("{} cancelled", operation_name);
            return PollOutcome::Cancelled;
        }

        attempt += 1;
        match check().await {
            Ok(Some(value)) => {
                debug!(attempt, "{} completed", operation_name);
                return PollOutcome::Ready(value);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, attempt, "error checking {} status while waiting", operation_name);
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= max_wait {
            warn!(
                waited_ms = elapsed.as_millis() as u64,
                "timed out waiting for {}", operation_name
            );
            return PollOutcome::TimedOut { waited: elapsed };
        }

        let delay = poll_interval.min(max_wait - elapsed);
        if !sleep_unless_cancelled(delay, cancel).await {
            debug!("{} cancelled while waiting", operation_name);
            return PollOutcome::Cancelled;
        }
    }
}
