//! Deadline applied to every service call that reaches a driven port.
//!
//! Expiry drops the in-flight future. Adapters perform each write as one
//! statement or one transaction, so a dropped future never leaves a partial
//! row behind.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::domain::Error;

/// Upper bound on how long a single port call may take.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use loyalty_backend::domain::OperationTimeout;
///
/// assert_eq!(OperationTimeout::default().duration(), Duration::from_secs(10));
/// assert_eq!(OperationTimeout::from_millis(5).duration(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimeout(Duration);

impl OperationTimeout {
    const DEFAULT_MILLIS: u64 = 10_000;
    const MIN_MILLIS: u64 = 100;
    const MAX_MILLIS: u64 = 120_000;

    /// Build from milliseconds, clamped to a sane range.
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(
            millis.clamp(Self::MIN_MILLIS, Self::MAX_MILLIS),
        ))
    }

    /// Build from an exact duration without clamping (for tests).
    pub fn exactly(duration: Duration) -> Self {
        Self(duration)
    }

    /// The configured deadline.
    pub fn duration(self) -> Duration {
        self.0
    }

    /// Await `fut`, failing with [`crate::domain::ErrorCode::Timeout`] once
    /// the deadline passes.
    pub async fn run<F>(self, operation: &'static str, fut: F) -> Result<F::Output, Error>
    where
        F: Future,
    {
        tokio::time::timeout(self.0, fut).await.map_err(|_| {
            warn!(
                operation,
                timeout = ?self.0,
                "operation deadline exceeded"
            );
            Error::timeout(format!("{operation} timed out"))
        })
    }
}

impl Default for OperationTimeout {
    fn default() -> Self {
        Self(Duration::from_millis(Self::DEFAULT_MILLIS))
    }
}
