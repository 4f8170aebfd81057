/*!
# Scatter Recipient Lists

This crate is the **single source of truth** for recipient input handling in
scatter. It owns:

- **CSV schema** for recipient lists (`recipient,amount` with validated headers)
- **Entry validation**: address canonicalization, amount parsing and scaling
  to base units, duplicate detection
- **Resumption filtering**: removing entries already confirmed in a previous
  run of the same session
- **Session identity**: the deterministic fingerprint that scopes checkpoint
  state to one logical batch-sending intent

## Usage

```rust
use scatter_recipients::{
    filter_confirmed, session_fingerprint, validate_recipients, Asset, RecipientRow,
    ValidationMode,
};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeSet;

fn example() -> scatter_recipients::RecipientResult<()> {
    let rows = vec![RecipientRow {
        recipient: "11111111111111111111111111111112".to_string(),
        amount: "100.5".to_string(),
    }];

    let validated = validate_recipients(&rows, 9, ValidationMode::Strict)?;
    let filtered = filter_confirmed(validated.entries, &BTreeSet::new())?;

    let session = session_fingerprint(
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
        &Asset::Native,
        "recipients.csv",
    );
    println!("session {}: {} entries to send", session, filtered.entries.len());
    Ok(())
}
```
*/

pub mod entries;
pub mod errors;
pub mod schemas;
pub mod session;
pub mod validation;

// Re-export main types for convenience
pub use entries::{Asset, Entry};
pub use errors::{RecipientError, RecipientResult};
pub use schemas::{RecipientRow, RECIPIENTS_CSV_HEADERS};
pub use session::session_fingerprint;
pub use validation::{
    filter_confirmed, read_recipients_csv, validate_recipients, write_recipients_csv, FilteredSet,
    ValidatedSet, ValidationMode,
};
