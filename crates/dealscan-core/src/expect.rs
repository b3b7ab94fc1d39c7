//! Polling assertions over a [`Session`].
//!
//! Every check re-queries the page until it holds or the expect timeout
//! elapses. Whether a failed check aborts the scenario is decided by the
//! caller: hard checks propagate the error, soft checks hand it to
//! [`crate::context::ScenarioContext::record_soft`] as a
//! [`Severity::Recoverable`] failure.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::AppError;
use crate::locator::Locator;
use crate::traits::Session;

/// Timing for polling assertions.
#[derive(Debug, Clone)]
pub struct ExpectConfig {
    /// How long a check keeps polling before it fails.
    pub timeout: Duration,
    /// Delay between two polls.
    pub poll_interval: Duration,
}

impl ExpectConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for ExpectConfig {
    /// 5 s timeout polled every 100 ms.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Whether a failure stops the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recorded; the scenario keeps running and fails at the end.
    Recoverable,
    /// Stops the scenario immediately.
    Fatal,
}

/// A failure recorded while running a scenario.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Failure {
    pub severity: Severity,
    /// Step that was running when the failure happened.
    pub step: String,
    pub message: String,
}

impl Failure {
    pub fn recoverable(step: impl Into<String>, error: &AppError) -> Self {
        Self {
            severity: Severity::Recoverable,
            step: step.into(),
            message: error.to_string(),
        }
    }

    pub fn fatal(step: impl Into<String>, error: &AppError) -> Self {
        Self {
            severity: Severity::Fatal,
            step: step.into(),
            message: error.to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

/// Poll until `probe` yields true or the timeout elapses.
///
/// Returns `Ok(false)` on timeout; probe errors propagate at once.
async fn poll_until<F, Fut>(config: &ExpectConfig, mut probe: F) -> Result<bool, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool, AppError>>,
{
    let deadline = Instant::now() + config.timeout;
    loop {
        if probe().await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}

/// Wait for the first match of `locator` to be visible.
pub async fn to_be_visible<S: Session>(
    session: &S,
    locator: &Locator,
    what: &str,
    config: &ExpectConfig,
) -> Result<(), AppError> {
    if poll_until(config, || session.is_visible(locator)).await? {
        Ok(())
    } else {
        Err(AppError::VisibilityTimeout {
            what: what.to_string(),
            locator: locator.to_string(),
            timeout_ms: config.timeout.as_millis() as u64,
        })
    }
}

/// Wait for the first match of `locator` to report checked.
pub async fn to_be_checked<S: Session>(
    session: &S,
    locator: &Locator,
    what: &str,
    config: &ExpectConfig,
) -> Result<(), AppError> {
    if poll_until(config, || session.is_checked(locator)).await? {
        Ok(())
    } else {
        Err(AppError::NotChecked {
            what: what.to_string(),
            locator: locator.to_string(),
            timeout_ms: config.timeout.as_millis() as u64,
        })
    }
}
