/*!
# Recipient CSV Schema

Authoritative schema for recipient list files. The CSV is the contract
between whatever produced the list (exports, spreadsheets, scripts) and the
`validate`/`send` commands, so headers are validated in exact order and rows
are kept as raw strings until [`crate::validation`] canonicalizes them.
*/

use serde::{Deserialize, Serialize};

/// Expected headers for a recipients CSV in exact order
pub const RECIPIENTS_CSV_HEADERS: &[&str] = &["recipient", "amount"];

/// Row structure for a recipients CSV
///
/// **File**: `recipients.csv`
/// **Purpose**: One transfer instruction per row
/// **Consumers**: `validate`, `plan`, and `send` commands
///
/// Both fields are kept as raw strings: the address may carry surrounding
/// whitespace and the amount may carry currency symbols or grouping
/// separators. Canonicalization happens in validation, not deserialization,
/// so a malformed row can be reported (or tolerated) per row instead of
/// failing the whole file at parse time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipientRow {
    /// Recipient account address in base58 format
    pub recipient: String,

    /// Decimal amount string, e.g. "100", "50.5", "$1,000.25"
    pub amount: String,
}
