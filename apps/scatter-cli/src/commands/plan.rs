use crate::error::{CliError, CliResult};
use scatter_engine::plan_chunks;
use scatter_recipients::{read_recipients_csv, validate_recipients, ValidationMode};
use std::path::PathBuf;

pub fn execute(input: PathBuf, chunk_size: usize, decimals: u8) -> CliResult<()> {
    if chunk_size == 0 {
        return Err(CliError::InvalidConfig(
            "chunk size must be at least 1".to_string(),
        ));
    }

    println!("🧮 Planning chunks...");
    println!("Input: {}", input.display());

    let rows = read_recipients_csv(&input)?;
    let validated = validate_recipients(&rows, decimals, ValidationMode::Tolerant)?;
    println!("✅ {} valid entries", validated.entries.len());

    let plan = plan_chunks(&validated.entries, chunk_size);
    println!(
        "\n📦 {} chunks of up to {} entries:",
        plan.len(),
        chunk_size
    );

    for (index, chunk) in plan.iter().enumerate() {
        let units: u128 = chunk.iter().map(|e| u128::from(e.amount_units)).sum();
        println!(
            "  chunk {:>3}: {} entries, {} base units ({} .. {})",
            index + 1,
            chunk.len(),
            units,
            chunk[0].address,
            chunk[chunk.len() - 1].address
        );
    }

    Ok(())
}
