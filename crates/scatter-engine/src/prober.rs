/*!
# Capacity Probing

Discovers, once per run, the largest prefix length whose estimated cost
stays strictly below the usable budget: exponential doubling to bracket the
limit, then binary refinement of the open interval. O(log n) estimates,
fully deterministic.

Known approximation: the probe estimates against the *first* n entries and
the result is applied to every later chunk. Entries with unusually expensive
cost characteristics deeper in the list could push a later chunk past the
budget even though the probe succeeded.
*/

use crate::config::CostBudget;
use crate::endpoint::Endpoint;
use crate::pacer::PacedExecutor;
use scatter_recipients::Entry;
use tracing::{debug, info, warn};

/// Fixed exploration ceiling for the doubling phase.
pub const PROBE_CEILING: usize = 512;

/// Find the largest safe chunk size for `entries` under `budget`.
///
/// Returns at least 1 and, for non-empty sets, at most the working-set size:
/// even when no estimate comes back safe (or available), a single-entry
/// chunk is still attempted so the run makes forward progress instead of
/// stalling. An empty working set yields 1 without any remote calls.
pub async fn probe_chunk_size<E: Endpoint + ?Sized>(
    endpoint: &E,
    executor: &mut PacedExecutor,
    entries: &[Entry],
    budget: &CostBudget,
) -> usize {
    // An empty working set has nothing to estimate against; size 1 keeps the
    // answer in the documented [1, set size] range without touching the
    // endpoint.
    if entries.is_empty() {
        return 1;
    }

    let usable = budget.usable();
    let cap = entries.len().min(PROBE_CEILING);

    let mut best = 0usize;
    let mut low = 1usize;
    let mut high = cap + 1;

    // Doubling phase: bracket the first unsafe size.
    let mut test = 1usize;
    loop {
        if is_safe(endpoint, executor, &entries[..test], usable).await {
            best = test;
            low = test;
            if test == cap {
                info!(chunk_size = cap, "probe reached exploration cap safely");
                return cap;
            }
            test = (test * 2).min(cap);
        } else {
            high = test;
            break;
        }
    }

    // Binary refinement of the open interval (low, high).
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if is_safe(endpoint, executor, &entries[..mid], usable).await {
            best = mid;
            low = mid;
        } else {
            high = mid;
        }
    }

    let chunk_size = best.max(1);
    if best == 0 {
        warn!("no safe chunk size discoverable; degrading to single-entry chunks");
    }
    info!(chunk_size, usable_budget = usable, "capacity probe complete");
    chunk_size
}

/// One paced, retried estimate. Unavailable estimates count as unsafe.
async fn is_safe<E: Endpoint + ?Sized>(
    endpoint: &E,
    executor: &mut PacedExecutor,
    prefix: &[Entry],
    usable: u64,
) -> bool {
    match executor
        .execute("estimate_cost", || endpoint.estimate_cost(prefix))
        .await
    {
        Ok(cost) => {
            debug!(n = prefix.len(), cost, usable, "cost estimate");
            cost < usable
        }
        Err(error) => {
            warn!(n = prefix.len(), error = %error, "cost estimate unavailable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubmitConfig;
    use crate::endpoint::{EndpointError, SubmitReceipt};
    use async_trait::async_trait;
    use solana_sdk::pubkey::Pubkey;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Linear cost model with an optional size at which estimation starts
    /// failing outright.
    struct LinearEstimator {
        base_cost: u64,
        per_entry: u64,
        unavailable_at: Option<usize>,
        estimates: AtomicUsize,
    }

    impl LinearEstimator {
        fn new(base_cost: u64, per_entry: u64) -> Self {
            Self {
                base_cost,
                per_entry,
                unavailable_at: None,
                estimates: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Endpoint for LinearEstimator {
        async fn estimate_cost(&self, entries: &[Entry]) -> Result<u64, EndpointError> {
            self.estimates.fetch_add(1, Ordering::SeqCst);
            if let Some(threshold) = self.unavailable_at {
                if entries.len() >= threshold {
                    return Err(EndpointError::from_message("estimator unavailable"));
                }
            }
            Ok(self.base_cost + self.per_entry * entries.len() as u64)
        }

        async fn ensure_authorization(&self, _total_required: u64) -> Result<(), EndpointError> {
            Ok(())
        }

        async fn submit_chunk(
            &self,
            _entries: &[Entry],
            _attached_value: Option<u64>,
        ) -> Result<SubmitReceipt, EndpointError> {
            Err(EndpointError::from_message("not a submitter"))
        }
    }

    fn entries(count: usize) -> Vec<Entry> {
        (0..count)
            .map(|i| Entry {
                address: Pubkey::new_unique(),
                amount_units: 1,
                amount_display: i.to_string(),
            })
            .collect()
    }

    fn executor() -> PacedExecutor {
        PacedExecutor::new(&SubmitConfig {
            max_attempts: 1,
            ..SubmitConfig::default()
        })
    }

    #[tokio::test]
    async fn test_finds_exact_boundary() {
        // cost(n) = 100 + 10n, usable = 1000 -> safe iff n <= 89
        let endpoint = LinearEstimator::new(100, 10);
        let budget = CostBudget::new(1000, 1.0).unwrap();
        let entries = entries(200);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, 89);
    }

    #[tokio::test]
    async fn test_clamped_to_working_set_size() {
        let endpoint = LinearEstimator::new(0, 1);
        let budget = CostBudget::new(1_000_000, 1.0).unwrap();
        let entries = entries(7);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, 7);
    }

    #[tokio::test]
    async fn test_never_exceeds_exploration_cap() {
        let endpoint = LinearEstimator::new(0, 1);
        let budget = CostBudget::new(u64::MAX, 1.0).unwrap();
        let entries = entries(2000);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, PROBE_CEILING);
    }

    #[tokio::test]
    async fn test_degrades_to_one_when_nothing_is_safe() {
        // Even size 1 estimates over budget; the run must still move.
        let endpoint = LinearEstimator::new(5000, 1000);
        let budget = CostBudget::new(1000, 1.0).unwrap();
        let entries = entries(50);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, 1);
    }

    #[tokio::test]
    async fn test_estimator_unavailable_above_one_degrades_to_one() {
        // Estimation fails for every probed size >= 2.
        let mut endpoint = LinearEstimator::new(10, 10);
        endpoint.unavailable_at = Some(2);
        let budget = CostBudget::new(1000, 1.0).unwrap();
        let entries = entries(50);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, 1);
    }

    #[tokio::test]
    async fn test_probe_call_count_is_logarithmic() {
        let endpoint = LinearEstimator::new(0, 10);
        let budget = CostBudget::new(3000, 1.0).unwrap(); // safe iff n <= 299
        let entries = entries(512);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, 299);
        // Doubling to 512 is 10 estimates; refinement adds at most another 9.
        assert!(endpoint.estimates.load(Ordering::SeqCst) <= 20);
    }

    #[tokio::test]
    async fn test_empty_working_set_makes_no_estimates() {
        let endpoint = LinearEstimator::new(0, 10);
        let budget = CostBudget::new(1000, 1.0).unwrap();

        let size = probe_chunk_size(&endpoint, &mut executor(), &[], &budget).await;
        assert_eq!(size, 1);
        assert_eq!(endpoint.estimates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_entry_working_set() {
        let endpoint = LinearEstimator::new(0, 10);
        let budget = CostBudget::new(1000, 1.0).unwrap();
        let entries = entries(1);

        let size = probe_chunk_size(&endpoint, &mut executor(), &entries, &budget).await;
        assert_eq!(size, 1);
    }
}
