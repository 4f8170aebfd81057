use crate::error::{EngineError, EngineResult};
use std::time::Duration;

/// Per-execution resource budget.
///
/// The ceiling is whatever the endpoint meters (gas, fee units, serialized
/// bytes); the prober only compares estimates against `usable()`.
#[derive(Debug, Clone, Copy)]
pub struct CostBudget {
    /// Hard resource ceiling for one execution
    pub ceiling: u64,
    /// Fraction of the ceiling the prober is allowed to fill, 0 < f <= 1
    pub safety_fraction: f64,
}

impl CostBudget {
    pub fn new(ceiling: u64, safety_fraction: f64) -> EngineResult<Self> {
        if !(safety_fraction > 0.0 && safety_fraction <= 1.0) {
            return Err(EngineError::InvalidSafetyFraction(safety_fraction));
        }
        Ok(Self {
            ceiling,
            safety_fraction,
        })
    }

    /// Usable budget: `floor(ceiling * safety_fraction)`.
    pub fn usable(&self) -> u64 {
        (self.ceiling as f64 * self.safety_fraction).floor() as u64
    }
}

/// Configuration for pacing, retries, and inter-chunk pauses.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Minimum interval between the start of consecutive remote calls,
    /// process-wide. `None` or zero disables pacing.
    pub pacing_interval: Option<Duration>,

    /// Maximum attempts per remote call before the underlying error is
    /// re-raised
    pub max_attempts: u32,

    /// First retry delay; doubles each attempt
    pub base_backoff: Duration,

    /// Cap on the retry delay
    pub max_backoff: Duration,

    /// Pause after each confirmed chunk before the next submission
    pub inter_chunk_pause: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            pacing_interval: None,
            max_attempts: 5,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            inter_chunk_pause: Duration::from_secs(1),
        }
    }
}

/// Convert a requests-per-second rate into a pacing interval.
///
/// Non-positive rates disable pacing.
pub fn interval_from_rate(requests_per_second: f64) -> Option<Duration> {
    if requests_per_second > 0.0 {
        Some(Duration::from_secs_f64(1.0 / requests_per_second))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_budget_floors() {
        let budget = CostBudget::new(1232, 0.95).unwrap();
        assert_eq!(budget.usable(), 1170); // floor(1232 * 0.95) = floor(1170.4)

        let full = CostBudget::new(100, 1.0).unwrap();
        assert_eq!(full.usable(), 100);
    }

    #[test]
    fn test_safety_fraction_bounds() {
        assert!(CostBudget::new(100, 0.0).is_err());
        assert!(CostBudget::new(100, -0.5).is_err());
        assert!(CostBudget::new(100, 1.01).is_err());
        assert!(CostBudget::new(100, f64::NAN).is_err());
        assert!(CostBudget::new(100, 0.5).is_ok());
    }

    #[test]
    fn test_interval_from_rate() {
        assert_eq!(interval_from_rate(4.0), Some(Duration::from_millis(250)));
        assert_eq!(interval_from_rate(0.0), None);
        assert_eq!(interval_from_rate(-1.0), None);
    }

    #[test]
    fn test_default_config() {
        let config = SubmitConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_backoff, Duration::from_millis(500));
        assert_eq!(config.max_backoff, Duration::from_secs(30));
        assert!(config.pacing_interval.is_none());
    }
}
