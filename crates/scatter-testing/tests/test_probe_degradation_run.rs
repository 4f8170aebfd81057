//! When estimation is unavailable for every size >= 2, the run degrades to
//! one entry per chunk instead of stalling.

use scatter_checkpoint::CheckpointStore;
use scatter_engine::{execute_batch, CostBudget, SubmitConfig};
use scatter_recipients::{validate_recipients, Asset, RecipientRow, ValidationMode};
use scatter_testing::SimEndpoint;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

#[tokio::test]
async fn test_unavailable_estimates_degrade_to_single_entry_chunks() {
    let rows: Vec<RecipientRow> = (1..=4)
        .map(|i| RecipientRow {
            recipient: Pubkey::new_unique().to_string(),
            amount: i.to_string(),
        })
        .collect();
    let entries = validate_recipients(&rows, 9, ValidationMode::Strict)
        .unwrap()
        .entries;

    let endpoint = SimEndpoint::new(10, 10).with_estimates_unavailable_at(2);
    let budget = CostBudget::new(1000, 0.95).unwrap();
    let config = SubmitConfig {
        pacing_interval: None,
        max_attempts: 1,
        base_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(1),
        inter_chunk_pause: Duration::ZERO,
    };

    let mut checkpoint = CheckpointStore::disabled();
    let report = execute_batch(
        &endpoint,
        &entries,
        &Asset::Native,
        &budget,
        &config,
        &mut checkpoint,
        "session-degraded",
    )
    .await
    .unwrap();

    assert_eq!(report.chunk_size, 1);
    assert_eq!(report.chunks_confirmed, 4);
    assert_eq!(report.entries_confirmed, 4);

    for chunk in endpoint.confirmed_chunks() {
        assert_eq!(chunk.addresses.len(), 1);
    }
}
