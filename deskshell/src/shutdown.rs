//! Termination triggers and the bounded-time cleanup sequence.
//!
//! The shell moves through four lifecycle states: idle (listening and
//! serving), shutting down (cleanup in progress, under deadline), then either
//! terminated (normal exit) or timed out (fatal exit). The idle-to-shutdown
//! transition fires exactly once, on the first termination trigger; later
//! triggers are ignored.
//!
//! Cleanup itself is not cancellable: the deadline is a race against
//! completion, not a signal propagated into the cleanup action. Any real
//! teardown step added to [`cleanup_action`] must either finish before the
//! race resolves or accept being abandoned when the process exits.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ShutdownConfig;
use crate::errors::Error;

/// Single-fire termination notification owned by the lifecycle controller.
///
/// Triggers are handed out to whatever may end the process (the OS signal
/// listener, the presentation surface's close notification) and are buffered:
/// a trigger fired before [`wait`](TerminationSource::wait) begins is not
/// lost.
pub struct TerminationSource {
    token: CancellationToken,
}

/// Handle that fires the termination notification once. Firing after the
/// source has already triggered is a no-op.
pub struct TerminationTrigger {
    token: CancellationToken,
}

impl TerminationSource {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn trigger(&self) -> TerminationTrigger {
        TerminationTrigger {
            token: self.token.clone(),
        }
    }

    /// Suspends until the first trigger fires
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }
}

impl Default for TerminationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminationTrigger {
    pub fn fire(self) {
        self.token.cancel();
    }
}

/// Run the cleanup action, racing it against the configured deadline.
///
/// Completion within the deadline logs success and returns `Ok`; a deadline
/// overrun returns [`Error::CleanupTimeout`], which the binary treats as a
/// fatal process exit.
pub async fn run_cleanup(shutdown: &ShutdownConfig) -> Result<(), Error> {
    tracing::info!("Cleaning up...");

    let started = tokio::time::Instant::now();
    match tokio::time::timeout(shutdown.deadline, cleanup_action(shutdown.grace)).await {
        Ok(()) => {
            let spare = shutdown.deadline.saturating_sub(started.elapsed());
            tracing::debug!(
                "Clean-up finished {} before the deadline",
                humantime::format_duration(Duration::from_secs(spare.as_secs()))
            );
            tracing::info!("Clean-up finished. Closing...");
            Ok(())
        }
        Err(_) => Err(Error::CleanupTimeout {
            deadline: shutdown.deadline,
        }),
    }
}

/// The cleanup action proper. Currently a fixed pause standing in for real
/// teardown (this is where in-flight state would be flushed).
async fn cleanup_action(grace: Duration) {
    tokio::time::sleep(grace).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[tokio::test(start_paused = true)]
    async fn cleanup_within_deadline_succeeds() {
        let shutdown = ShutdownConfig {
            grace: Duration::from_secs(2),
            deadline: Duration::from_secs(10),
        };

        run_cleanup(&shutdown).await.expect("cleanup should beat the deadline");
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_past_deadline_is_a_timeout_error() {
        let shutdown = ShutdownConfig {
            grace: Duration::from_secs(12),
            deadline: Duration::from_secs(10),
        };

        let err = run_cleanup(&shutdown).await.unwrap_err();
        assert!(matches!(err, Error::CleanupTimeout { .. }));
        assert_eq!(err.to_string(), "Clean-up timeout. Not finished within 10s.");
    }

    #[tokio::test(start_paused = true)]
    async fn instant_cleanup_still_logs_and_returns_ok() {
        let shutdown = ShutdownConfig {
            grace: Duration::ZERO,
            deadline: Duration::from_secs(10),
        };

        run_cleanup(&shutdown).await.unwrap();
    }

    #[test]
    fn wait_resolves_on_first_trigger_only() {
        let source = TerminationSource::new();
        let mut wait = task::spawn(source.wait());

        assert_pending!(wait.poll());

        source.trigger().fire();
        assert!(wait.is_woken());
        assert_ready!(wait.poll());

        // Later triggers are no-ops against an already-fired source
        source.trigger().fire();
    }

    #[test]
    fn trigger_fired_before_wait_is_not_lost() {
        let source = TerminationSource::new();
        source.trigger().fire();

        let mut wait = task::spawn(source.wait());
        assert_ready!(wait.poll());
    }
}
