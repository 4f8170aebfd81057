use crate::commands::status::resolve_asset;
use crate::error::{CliError, CliResult};
use crate::rpc_endpoint::{RpcEndpoint, TRANSACTION_SIZE_CEILING};
use scatter_checkpoint::CheckpointStore;
use scatter_engine::{
    execute_batch, interval_from_rate, plan_chunks, probe_chunk_size, CostBudget, PacedExecutor,
    SubmitConfig,
};
use scatter_recipients::{
    filter_confirmed, read_recipients_csv, session_fingerprint, validate_recipients,
    ValidationMode,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Signer},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct SendArgs {
    pub input: PathBuf,
    pub keypair: PathBuf,
    pub mint: Option<String>,
    pub rpc_url: String,
    pub decimals: u8,
    pub safety_fraction: f64,
    pub rps: f64,
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub pause_ms: u64,
    pub checkpoint: PathBuf,
    pub no_checkpoint: bool,
    pub strict: bool,
    pub dry_run: bool,
}

pub async fn execute(args: SendArgs) -> CliResult<()> {
    println!("🚀 Scatter batch send");
    println!("Input: {}", args.input.display());
    println!("RPC URL: {}", args.rpc_url);

    // Step 1: Sender identity
    let payer = read_keypair_file(&args.keypair)
        .map_err(|e| CliError::InvalidConfig(format!("Failed to read keypair: {}", e)))?;
    let sender = payer.pubkey();
    println!("✅ Sender: {}", sender);

    // Step 2: Asset and session
    let (asset, program) = resolve_asset(args.mint.as_deref())?;
    let input_source = args.input.display().to_string();
    let session = session_fingerprint(&sender, &program, &asset, &input_source);
    println!("✅ Session: {}", session);

    // Step 3: Validate the recipient list
    let rows = read_recipients_csv(&args.input)?;
    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Tolerant
    };
    let validated = validate_recipients(&rows, args.decimals, mode)?;
    let skipped =
        validated.invalid_addresses + validated.invalid_amounts + validated.skipped_non_positive;
    if skipped > 0 {
        println!("⚠️  Skipped {} rows during validation", skipped);
    }
    println!("✅ {} valid entries", validated.entries.len());

    // Step 4: Resume from the checkpoint
    let mut checkpoint = if args.no_checkpoint {
        println!("⚠️  Checkpoint disabled; this run cannot be resumed after a crash");
        CheckpointStore::disabled()
    } else {
        CheckpointStore::load(&args.checkpoint)?
    };

    let filtered = filter_confirmed(validated.entries, &checkpoint.confirmed(&session))?;
    if filtered.already_sent > 0 {
        println!(
            "⏩ Resuming: {} entries already confirmed in a previous run",
            filtered.already_sent
        );
    }
    println!("📬 {} entries to send", filtered.entries.len());

    // Step 5: Engine configuration
    let budget = CostBudget::new(TRANSACTION_SIZE_CEILING, args.safety_fraction)?;
    let config = SubmitConfig {
        pacing_interval: interval_from_rate(args.rps),
        max_attempts: args.max_attempts,
        base_backoff: Duration::from_millis(args.base_backoff_ms),
        max_backoff: Duration::from_millis(args.max_backoff_ms),
        inter_chunk_pause: Duration::from_millis(args.pause_ms),
    };

    let rpc_client = Arc::new(RpcClient::new_with_commitment(
        args.rpc_url.clone(),
        CommitmentConfig::confirmed(),
    ));
    let endpoint = RpcEndpoint::new(rpc_client, payer, asset);

    // Step 6: Probe only, or the full run
    if args.dry_run {
        println!("\n🧪 Dry run: probing capacity without submitting...");
        let mut executor = PacedExecutor::new(&config);
        let chunk_size =
            probe_chunk_size(&endpoint, &mut executor, &filtered.entries, &budget).await;
        let plan = plan_chunks(&filtered.entries, chunk_size);
        println!(
            "📦 Probed chunk size {} -> {} transactions for {} entries",
            chunk_size,
            plan.len(),
            filtered.entries.len()
        );
        return Ok(());
    }

    let report = execute_batch(
        &endpoint,
        &filtered.entries,
        &asset,
        &budget,
        &config,
        &mut checkpoint,
        &session,
    )
    .await?;

    println!("\n🎉 Batch send completed");
    println!("📊 Summary:");
    println!("  - chunk size {}", report.chunk_size);
    println!("  - {} chunks confirmed", report.chunks_confirmed);
    println!("  - {} entries confirmed", report.entries_confirmed);
    println!("  - {} base units sent", report.total_units_sent);
    println!("  - {} total resource cost", report.total_cost);

    Ok(())
}
