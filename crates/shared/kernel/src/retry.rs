//! Explicit retry policy for calls to remote collaborators.
//!
//! The policy is plain data (attempts, delay schedule, per-attempt timeout) handed to whoever
//! performs the call. [`RetryPolicy::run`] executes an async operation under it and reports
//! either the value or why the last attempt failed.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use vaudit_domain::config::{BackoffKind, RetryConfig};

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles after each failed attempt, capped at `max`.
    Exponential { max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    backoff: Backoff,
    timeout: Duration,
}

impl Default for RetryPolicy {
    /// Four attempts, one second apart, ten seconds each.
    fn default() -> Self {
        Self::fixed(4, Duration::from_secs(1), Duration::from_secs(10))
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn fixed(max_attempts: u32, delay: Duration, timeout: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), delay, backoff: Backoff::Fixed, timeout }
    }

    #[must_use]
    pub fn exponential(max_attempts: u32, initial: Duration, max: Duration, timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: initial,
            backoff: Backoff::Exponential { max },
            timeout,
        }
    }

    /// Exactly one attempt.
    #[must_use]
    pub fn once(timeout: Duration) -> Self {
        Self::fixed(1, Duration::ZERO, timeout)
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Delay before attempt `next` (2-based: the first retry is attempt 2).
    #[must_use]
    pub fn delay_before(&self, next: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { max } => {
                let exponent = next.saturating_sub(2).min(31);
                self.delay.saturating_mul(1 << exponent).min(max)
            },
        }
    }

    /// Runs `op` until it succeeds, attempts are exhausted, or a failure is not retryable.
    ///
    /// # Errors
    /// [`RetryError`] describing the last failed attempt.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.run_if(operation, op, |_| true).await
    }

    /// Like [`run`](Self::run), but gives up immediately on errors for which `retryable`
    /// returns `false`. Timeouts are always retryable.
    ///
    /// # Errors
    /// [`RetryError`] describing the last failed attempt.
    pub async fn run_if<T, E, F, Fut, P>(
        &self,
        operation: &str,
        mut op: F,
        retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
        P: Fn(&E) -> bool,
    {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > 1 {
                debug!(operation, attempt, "Retrying remote call");
            }

            let failure = match tokio::time::timeout(self.timeout, op()).await {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        debug!(operation, attempt, elapsed_ms = started.elapsed().as_millis(), "Remote call succeeded after retry");
                    }
                    return Ok(value);
                },
                Ok(Err(err)) if !retryable(&err) => {
                    warn!(operation, attempt, error = %err, "Remote call failed permanently");
                    return Err(RetryError { attempts: attempt, cause: AttemptFailure::Failed(err) });
                },
                Ok(Err(err)) => AttemptFailure::Failed(err),
                Err(_) => AttemptFailure::TimedOut(self.timeout),
            };

            if attempt >= self.max_attempts {
                warn!(operation, attempt, error = %failure, "Remote call failed, attempts exhausted");
                return Err(RetryError { attempts: attempt, cause: failure });
            }

            let delay = self.delay_before(attempt + 1);
            warn!(
                operation,
                attempt,
                delay_ms = delay.as_millis(),
                error = %failure,
                "Remote call failed, will retry"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        let delay = Duration::from_millis(cfg.delay_ms);
        let timeout = Duration::from_millis(cfg.timeout_ms);
        match cfg.backoff {
            BackoffKind::Fixed => Self::fixed(cfg.max_attempts, delay, timeout),
            BackoffKind::Exponential => Self::exponential(
                cfg.max_attempts,
                delay,
                Duration::from_millis(cfg.max_delay_ms),
                timeout,
            ),
        }
    }
}

/// Why a single attempt failed.
#[derive(Debug)]
pub enum AttemptFailure<E> {
    TimedOut(Duration),
    Failed(E),
}

impl<E: fmt::Display> fmt::Display for AttemptFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut(after) => write!(f, "timed out after {} ms", after.as_millis()),
            Self::Failed(err) => err.fmt(f),
        }
    }
}

/// Final failure of [`RetryPolicy::run`].
#[derive(Debug)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub cause: AttemptFailure<E>,
}

impl<E> RetryError<E> {
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self.cause, AttemptFailure::TimedOut(_))
    }

    /// The operation's own error, if the last attempt did not time out.
    pub fn into_inner(self) -> Option<E> {
        match self.cause {
            AttemptFailure::Failed(err) => Some(err),
            AttemptFailure::TimedOut(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gave up after {} attempt(s): {}", self.attempts, self.cause)
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}
