use crate::error::CliResult;
use scatter_recipients::{read_recipients_csv, validate_recipients, ValidationMode};
use std::path::PathBuf;

pub fn execute(input: PathBuf, decimals: u8, strict: bool) -> CliResult<()> {
    println!("🔍 Validating recipient list...");
    println!("Input: {}", input.display());
    println!(
        "Mode: {}",
        if strict { "strict" } else { "tolerant" }
    );

    let rows = read_recipients_csv(&input)?;
    println!("✅ Read {} rows", rows.len());

    let mode = if strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Tolerant
    };
    let validated = validate_recipients(&rows, decimals, mode)?;

    println!("\n📊 Summary:");
    println!("  - {} valid entries", validated.entries.len());
    println!("  - {} invalid addresses skipped", validated.invalid_addresses);
    println!("  - {} invalid amounts skipped", validated.invalid_amounts);
    println!(
        "  - {} zero/negative amounts skipped",
        validated.skipped_non_positive
    );

    let total_units: u128 = validated
        .entries
        .iter()
        .map(|entry| u128::from(entry.amount_units))
        .sum();
    println!("  - {} total base units across all entries", total_units);

    Ok(())
}
