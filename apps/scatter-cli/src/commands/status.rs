use crate::error::{CliError, CliResult};
use scatter_checkpoint::CheckpointStore;
use scatter_recipients::{
    read_recipients_csv, session_fingerprint, validate_recipients, Asset, ValidationMode,
};
use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use std::str::FromStr;

pub fn execute(
    input: PathBuf,
    sender: String,
    mint: Option<String>,
    checkpoint: PathBuf,
    decimals: u8,
) -> CliResult<()> {
    let sender = Pubkey::from_str(sender.trim())
        .map_err(|e| CliError::InvalidConfig(format!("Invalid sender pubkey: {}", e)))?;
    let (asset, program) = resolve_asset(mint.as_deref())?;

    let input_source = input.display().to_string();
    let session = session_fingerprint(&sender, &program, &asset, &input_source);

    println!("📒 Checkpoint status");
    println!("Session: {}", session);
    println!("Checkpoint file: {}", checkpoint.display());

    let rows = read_recipients_csv(&input)?;
    let validated = validate_recipients(&rows, decimals, ValidationMode::Tolerant)?;
    let store = CheckpointStore::load(&checkpoint)?;
    let confirmed = store.confirmed(&session);

    let sent = validated
        .entries
        .iter()
        .filter(|entry| confirmed.contains(&entry.key()))
        .count();

    println!("\n📊 Summary:");
    println!("  - {} entries in input", validated.entries.len());
    println!("  - {} already confirmed", sent);
    println!("  - {} remaining", validated.entries.len() - sent);

    if sent == validated.entries.len() {
        println!("\n🎉 Session is complete; a re-run would send nothing.");
    }

    Ok(())
}

pub(crate) fn resolve_asset(mint: Option<&str>) -> CliResult<(Asset, Pubkey)> {
    match mint {
        Some(mint) => {
            let mint = Pubkey::from_str(mint.trim())
                .map_err(|e| CliError::InvalidConfig(format!("Invalid mint pubkey: {}", e)))?;
            Ok((Asset::Token { mint }, spl_token::id()))
        }
        None => Ok((Asset::Native, solana_sdk::system_program::id())),
    }
}
