/*!
# Recipient Validation & CSV I/O

Validation turns raw CSV rows into the immutable working set the engine
submits: addresses are trimmed and canonicalized, amounts are cleaned of
currency symbols and grouping separators, parsed as unsigned decimals, and
scaled to base units. Duplicate canonical addresses fail the entire run;
they are a user-input error, not something to silently merge.

The resumption filter lives here too: it subtracts already-confirmed entry
keys from the working set so a restarted run never re-sends what a previous
run confirmed.
*/

use crate::{
    entries::Entry,
    errors::{RecipientError, RecipientResult},
    schemas::{RecipientRow, RECIPIENTS_CSV_HEADERS},
};
use csv::{Reader, Writer};
use rust_decimal::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Maximum supported mint decimals when using u64 for base units
///
/// Matches the practical ceiling for u64 token amounts: SOL (9) and USDC (6)
/// are comfortably inside it, 19+ decimals would leave fewer than two whole
/// tokens of headroom.
pub const MAX_SUPPORTED_DECIMALS: u8 = 18;

/// How validation treats rows it cannot canonicalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Surface the first malformed address or amount as an error.
    Strict,
    /// Count and skip malformed rows; only duplicates remain fatal.
    Tolerant,
}

/// Validated working set plus skip counters for observability.
#[derive(Debug, Clone)]
pub struct ValidatedSet {
    /// Entries in original input order
    pub entries: Vec<Entry>,
    /// Rows whose address failed canonicalization (tolerant mode only)
    pub invalid_addresses: usize,
    /// Rows whose amount failed parsing or scaling (tolerant mode only)
    pub invalid_amounts: usize,
    /// Rows with a zero or negative amount (always skipped, never fatal)
    pub skipped_non_positive: usize,
}

/// Result of the resumption filter.
#[derive(Debug, Clone)]
pub struct FilteredSet {
    /// Entries still awaiting submission, original order preserved
    pub entries: Vec<Entry>,
    /// Entries dropped because their key was already confirmed
    pub already_sent: usize,
}

// ================================================================================================
// Entry Validation
// ================================================================================================

/// Validate raw rows into the working set.
///
/// Duplicate canonical addresses across the whole input fail the run with
/// every duplicate listed, regardless of mode. Zero and negative amounts are
/// counted and skipped in both modes.
pub fn validate_recipients(
    rows: &[RecipientRow],
    decimals: u8,
    mode: ValidationMode,
) -> RecipientResult<ValidatedSet> {
    if decimals > MAX_SUPPORTED_DECIMALS {
        return Err(RecipientError::UnsupportedDecimals(decimals));
    }

    let mut entries = Vec::new();
    let mut invalid_addresses = 0usize;
    let mut invalid_amounts = 0usize;
    let mut skipped_non_positive = 0usize;
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        let raw_address = row.recipient.trim();
        let address = match solana_sdk::pubkey::Pubkey::from_str(raw_address) {
            Ok(address) => address,
            Err(_) => match mode {
                ValidationMode::Strict => {
                    return Err(RecipientError::InvalidAddress(raw_address.to_string()))
                }
                ValidationMode::Tolerant => {
                    invalid_addresses += 1;
                    continue;
                }
            },
        };

        let cleaned = clean_amount(&row.amount);

        // Negative amounts are skipped, not fatal, in both modes.
        if let Some(rest) = cleaned.strip_prefix('-') {
            if is_unsigned_decimal(rest) {
                skipped_non_positive += 1;
                continue;
            }
        }

        let units = match parse_amount_units(&cleaned, decimals) {
            Ok(units) => units,
            Err(()) => match mode {
                ValidationMode::Strict => {
                    return Err(RecipientError::InvalidAmount {
                        recipient: raw_address.to_string(),
                        amount: row.amount.clone(),
                    })
                }
                ValidationMode::Tolerant => {
                    invalid_amounts += 1;
                    continue;
                }
            },
        };

        if units == 0 {
            skipped_non_positive += 1;
            continue;
        }

        *seen.entry(address.to_string()).or_insert(0) += 1;
        entries.push(Entry {
            address,
            amount_units: units,
            amount_display: cleaned,
        });
    }

    let duplicates: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(address, _)| address)
        .collect();
    if !duplicates.is_empty() {
        return Err(RecipientError::DuplicateAddress(duplicates));
    }

    Ok(ValidatedSet {
        entries,
        invalid_addresses,
        invalid_amounts,
        skipped_non_positive,
    })
}

/// Strip currency symbols, grouping separators, and whitespace.
fn clean_amount(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
        .collect()
}

/// True for `123` or `123.456` (optional fractional part, no sign, no exponent).
fn is_unsigned_decimal(text: &str) -> bool {
    let mut parts = text.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match parts.next() {
        Some(frac) => all_digits(whole) && all_digits(frac),
        None => all_digits(whole),
    }
}

/// Parse a cleaned unsigned decimal string and scale it to base units.
///
/// Fails on pattern mismatch, fractional residue finer than `decimals`, or
/// overflow past u64.
fn parse_amount_units(cleaned: &str, decimals: u8) -> Result<u64, ()> {
    if !is_unsigned_decimal(cleaned) {
        return Err(());
    }

    let amount = Decimal::from_str(cleaned).map_err(|_| ())?;
    let scale = Decimal::from(10u64.pow(u32::from(decimals)));
    let scaled = amount.checked_mul(scale).ok_or(())?;

    if !scaled.fract().is_zero() {
        return Err(());
    }

    scaled.to_u64().ok_or(())
}

// ================================================================================================
// Resumption Filter
// ================================================================================================

/// Remove entries whose key is already confirmed for this session.
///
/// Pure: the same entries and confirmed set always yield the same filtered
/// set. Fails only when nothing remains, since submitting zero entries is
/// meaningless.
pub fn filter_confirmed(
    entries: Vec<Entry>,
    confirmed: &BTreeSet<String>,
) -> RecipientResult<FilteredSet> {
    let total = entries.len();
    let remaining: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| !confirmed.contains(&entry.key()))
        .collect();
    let already_sent = total - remaining.len();

    if remaining.is_empty() {
        return Err(RecipientError::NoRemainingEntries);
    }

    Ok(FilteredSet {
        entries: remaining,
        already_sent,
    })
}

// ================================================================================================
// CSV Reading with Validation
// ================================================================================================

/// Read a recipients CSV, validating headers before any row is consumed.
pub fn read_recipients_csv<P: AsRef<Path>>(path: P) -> RecipientResult<Vec<RecipientRow>> {
    let file = File::open(path)?;
    let mut rdr = Reader::from_reader(file);

    let headers = rdr.headers()?;
    validate_headers(headers.iter(), RECIPIENTS_CSV_HEADERS, "recipients.csv")?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RecipientRow = result?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(RecipientError::SchemaValidation(
            "Recipients CSV file is empty".to_string(),
        ));
    }

    Ok(rows)
}

/// Write a recipients CSV with proper headers.
pub fn write_recipients_csv<P: AsRef<Path>>(path: P, rows: &[RecipientRow]) -> RecipientResult<()> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn validate_headers<'a, I>(actual: I, expected: &[&str], file_type: &str) -> RecipientResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let actual_headers: Vec<&str> = actual.collect();

    if actual_headers.len() != expected.len() {
        return Err(RecipientError::SchemaValidation(format!(
            "{}: expected {} headers, found {}",
            file_type,
            expected.len(),
            actual_headers.len()
        )));
    }

    for (i, (actual, expected)) in actual_headers.iter().zip(expected.iter()).enumerate() {
        if actual != expected {
            return Err(RecipientError::SchemaValidation(format!(
                "{}: header {} should be '{}', found '{}'",
                file_type,
                i + 1,
                expected,
                actual
            )));
        }
    }

    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================
