//! Re-running a completed session filters out everything before any remote
//! call is made.

use scatter_recipients::{
    filter_confirmed, validate_recipients, RecipientError, RecipientRow, ValidationMode,
};
use scatter_testing::SimEndpoint;
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeSet;

#[tokio::test]
async fn test_completed_session_short_circuits_with_zero_remote_calls() {
    let rows: Vec<RecipientRow> = ["100", "50.5", "25"]
        .iter()
        .map(|amount| RecipientRow {
            recipient: Pubkey::new_unique().to_string(),
            amount: amount.to_string(),
        })
        .collect();
    let entries = validate_recipients(&rows, 9, ValidationMode::Strict)
        .unwrap()
        .entries;

    // Checkpoint already contains every entry key for this session.
    let confirmed: BTreeSet<String> = entries.iter().map(|entry| entry.key()).collect();

    let endpoint = SimEndpoint::new(10, 45);
    let err = filter_confirmed(entries, &confirmed).unwrap_err();

    assert!(matches!(err, RecipientError::NoRemainingEntries));
    assert_eq!(endpoint.total_remote_calls(), 0);
}
