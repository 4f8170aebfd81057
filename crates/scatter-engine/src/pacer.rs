/*!
# Paced Retry Execution

Every remote call the engine makes goes through one [`PacedExecutor`]: a
[`Pacer`] that enforces a minimum interval between the start of consecutive
calls, and a [`RetryPolicy`] that retries failures with capped, jittered
exponential backoff. Only the attempt count is bounded; total elapsed retry
time is not.
*/

use crate::config::SubmitConfig;
use crate::endpoint::{classify, EndpointError};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Explicit rate limiter: the last call timestamp plus the configured
/// minimum interval between call starts.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Option<Duration>,
    last_call_at: Option<Instant>,
}

impl Pacer {
    /// Zero or absent interval disables pacing.
    pub fn new(min_interval: Option<Duration>) -> Self {
        Self {
            min_interval: min_interval.filter(|interval| !interval.is_zero()),
            last_call_at: None,
        }
    }

    /// Wait until the minimum interval since the previous call start has
    /// elapsed, then stamp the current call.
    pub async fn wait(&mut self) {
        if let (Some(interval), Some(last)) = (self.min_interval, self.last_call_at) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        self.last_call_at = Some(Instant::now());
    }
}

/// Exponential backoff parameters for failed remote calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based): base doubled per
    /// attempt, capped at `max_delay`.
    fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_delay)
    }
}

/// Up to 20% positive jitter, so simultaneous retriers spread out instead of
/// resubmitting in lockstep.
fn with_jitter(delay: Duration) -> Duration {
    let factor = rand::thread_rng().gen_range(0.0..=0.2);
    delay + delay.mul_f64(factor)
}

/// Pacing plus retry around a single remote operation.
///
/// One executor instance is shared across an entire run so the pacing window
/// spans every remote call the process makes, not just calls of one kind.
#[derive(Debug)]
pub struct PacedExecutor {
    pacer: Pacer,
    policy: RetryPolicy,
}

impl PacedExecutor {
    pub fn new(config: &SubmitConfig) -> Self {
        Self {
            pacer: Pacer::new(config.pacing_interval),
            policy: RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                base_delay: config.base_backoff,
                max_delay: config.max_backoff,
            },
        }
    }

    /// Run `op` until it succeeds or the attempt ceiling is reached.
    ///
    /// Rate-limit-like and other failures currently share the same ceiling;
    /// classification is logged for observability. Exhausting attempts
    /// re-raises the final underlying error unchanged.
    pub async fn execute<T, F, Fut>(&mut self, label: &str, mut op: F) -> Result<T, EndpointError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EndpointError>>,
    {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.pacer.wait().await;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(label, attempt, "remote call succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let class = classify(&error);
                    if attempt >= max_attempts {
                        warn!(
                            label,
                            attempt,
                            ?class,
                            error = %error,
                            "remote call failed; attempt ceiling reached"
                        );
                        return Err(error);
                    }

                    let delay = with_jitter(self.policy.delay_after(attempt));
                    warn!(
                        label,
                        attempt,
                        ?class,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "remote call failed; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(max_attempts: u32) -> SubmitConfig {
        SubmitConfig {
            pacing_interval: None,
            max_attempts,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            ..SubmitConfig::default()
        }
    }

    fn rate_limited() -> EndpointError {
        EndpointError::new(Some(429), "too many requests")
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_final_attempt() {
        // Rate-limit error on the first 4 attempts, success on the 5th.
        let mut executor = PacedExecutor::new(&config(5));
        let calls = AtomicU32::new(0);

        let result = executor
            .execute("op", || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 5 {
                        Err(rate_limited())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reraises_underlying_error() {
        // Same failure pattern but a ceiling of 4: the 4th error comes back
        // unchanged.
        let mut executor = PacedExecutor::new(&config(4));
        let calls = AtomicU32::new(0);

        let result: Result<u32, EndpointError> = executor
            .execute("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(rate_limited()) }
            })
            .await;

        assert_eq!(result.unwrap_err(), rate_limited());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_try_success_makes_one_call() {
        let mut executor = PacedExecutor::new(&config(5));
        let calls = AtomicU32::new(0);

        let result = executor
            .execute("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42u32) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacer_spaces_call_starts() {
        let interval = Duration::from_millis(200);
        let mut pacer = Pacer::new(Some(interval));

        let start = Instant::now();
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        pacer.wait().await;
        assert!(start.elapsed() >= interval);

        pacer.wait().await;
        assert!(start.elapsed() >= interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_disables_pacing() {
        let mut pacer = Pacer::new(Some(Duration::ZERO));

        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        };

        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_secs(1));
        assert_eq!(policy.delay_after(3), Duration::from_secs(2));
        assert_eq!(policy.delay_after(7), Duration::from_secs(30)); // capped at 32s -> 30s
        assert_eq!(policy.delay_after(20), Duration::from_secs(30));
    }

    #[test]
    fn test_jitter_is_bounded_and_positive() {
        let base = Duration::from_millis(1000);
        for _ in 0..100 {
            let jittered = with_jitter(base);
            assert!(jittered >= base);
            assert!(jittered <= base + base.mul_f64(0.2));
        }
    }
}
