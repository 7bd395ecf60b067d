//! Wait Mechanisms
//!
//! Polling-based synchronization with an explicit [`WaitPolicy`]. Every
//! interaction primitive receives its policy instead of relying on a
//! library default, so a run behaves the same wherever it executes.
//!
//! Probes are retried until they report success or the policy's timeout
//! elapses. Transient driver errors (see [`E2eError::is_transient`]) are
//! retried as well; any other error aborts the wait immediately.

use crate::result::{E2eError, E2eResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element waits and assertions (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default timeout for page navigation (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// WAIT POLICY
// =============================================================================

/// How long to keep polling, and how often
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Give up after this long
    pub timeout: Duration,
    /// Pause between attempts
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS)
    }
}

impl WaitPolicy {
    /// Create a policy from durations
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Create a policy from milliseconds
    #[must_use]
    pub const fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(poll_interval_ms),
        )
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Timeout in whole milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// WAIT STATE
// =============================================================================

/// Element state to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitState {
    /// At least one matching element is in the DOM
    Attached,
    /// The first matching element is rendered and visible
    #[default]
    Visible,
}

impl std::fmt::Display for WaitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attached => f.write_str("attached"),
            Self::Visible => f.write_str("visible"),
        }
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Outcome of one probe attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    /// Condition met
    Done(T),
    /// Not yet; `observed` describes what was seen instead
    Retry {
        /// Last observed value, if any
        observed: Option<String>,
    },
}

/// A wait that ran out of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stalled {
    /// Last value the probe reported
    pub observed: Option<String>,
    /// Time spent waiting
    pub elapsed: Duration,
}

/// Poll `probe` under `policy`.
///
/// Returns `Ok(Ok(value))` when the probe succeeds, `Ok(Err(Stalled))` when
/// the timeout elapses first.
///
/// # Errors
///
/// Returns the probe's error immediately unless it is transient.
pub async fn poll<T, F, Fut>(policy: WaitPolicy, mut probe: F) -> E2eResult<Result<T, Stalled>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Attempt<T>>>,
{
    let start = Instant::now();
    let deadline = start + policy.timeout;

    loop {
        let observed = match probe().await {
            Ok(Attempt::Done(value)) => return Ok(Ok(value)),
            Ok(Attempt::Retry { observed }) => observed,
            Err(e) if e.is_transient() => {
                tracing::trace!(error = %e, "transient error while polling");
                Some(e.to_string())
            }
            Err(e) => return Err(e),
        };

        let now = Instant::now();
        if now >= deadline {
            return Ok(Err(Stalled {
                observed,
                elapsed: now - start,
            }));
        }
        tokio::time::sleep(policy.poll_interval.min(deadline - now)).await;
    }
}

/// Poll until the probe yields `Some`, failing with [`E2eError::Timeout`].
///
/// # Errors
///
/// Returns [`E2eError::Timeout`] naming `waited_for` if the policy's timeout
/// elapses, or the probe's own non-transient error.
pub async fn poll_until<T, F, Fut>(policy: WaitPolicy, waited_for: &str, mut probe: F) -> E2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Option<T>>>,
{
    let outcome = poll(policy, || {
        let attempt = probe();
        async move {
            Ok(match attempt.await? {
                Some(value) => Attempt::Done(value),
                None => Attempt::Retry { observed: None },
            })
        }
    })
    .await?;

    outcome.map_err(|_| E2eError::Timeout {
        waited_for: waited_for.to_string(),
        timeout_ms: policy.timeout_ms(),
    })
}
