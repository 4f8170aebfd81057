use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod error;
mod rpc_endpoint;

use error::CliResult;

#[derive(Parser)]
#[command(name = "scatter")]
#[command(about = "Scatter CLI - Batched token and SOL payouts with resumable checkpoints")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a recipients CSV without sending anything
    Validate {
        /// Recipients CSV file (headers: recipient,amount)
        input: PathBuf,

        /// Decimals of the asset being sent (9 for SOL)
        #[arg(short, long, default_value = "9")]
        decimals: u8,

        /// Fail on the first malformed row instead of counting and skipping
        #[arg(long)]
        strict: bool,
    },

    /// Show the chunk plan for a given chunk size (offline)
    Plan {
        /// Recipients CSV file
        input: PathBuf,

        /// Chunk size to plan with
        #[arg(short, long)]
        chunk_size: usize,

        /// Decimals of the asset being sent
        #[arg(short, long, default_value = "9")]
        decimals: u8,
    },

    /// Show checkpoint status for a session
    Status {
        /// Recipients CSV file
        input: PathBuf,

        /// Sender public key (base58)
        #[arg(short, long)]
        sender: String,

        /// SPL token mint; omit for native SOL
        #[arg(short, long)]
        mint: Option<String>,

        /// Checkpoint file location
        #[arg(long, default_value = "scatter-checkpoint.json")]
        checkpoint: PathBuf,

        /// Decimals of the asset being sent
        #[arg(short, long, default_value = "9")]
        decimals: u8,
    },

    /// Send the batch, resuming from the checkpoint if one exists
    Send {
        /// Recipients CSV file
        input: PathBuf,

        /// Payer/sender keypair file
        #[arg(short, long)]
        keypair: PathBuf,

        /// SPL token mint; omit for native SOL
        #[arg(short, long)]
        mint: Option<String>,

        /// Solana RPC URL
        #[arg(short, long, default_value = "https://api.mainnet-beta.solana.com")]
        rpc_url: String,

        /// Decimals of the asset being sent
        #[arg(short, long, default_value = "9")]
        decimals: u8,

        /// Fraction of the transaction size ceiling the probe may fill
        #[arg(long, default_value = "0.95")]
        safety_fraction: f64,

        /// Remote calls per second; 0 disables pacing
        #[arg(long, default_value = "4.0")]
        rps: f64,

        /// Attempts per remote call before giving up
        #[arg(long, default_value = "5")]
        max_attempts: u32,

        /// First retry delay in milliseconds (doubles per attempt)
        #[arg(long, default_value = "500")]
        base_backoff_ms: u64,

        /// Retry delay cap in milliseconds
        #[arg(long, default_value = "30000")]
        max_backoff_ms: u64,

        /// Pause between confirmed chunks in milliseconds
        #[arg(long, default_value = "1000")]
        pause_ms: u64,

        /// Checkpoint file location
        #[arg(long, default_value = "scatter-checkpoint.json")]
        checkpoint: PathBuf,

        /// Disable the durable checkpoint entirely
        #[arg(long)]
        no_checkpoint: bool,

        /// Fail on the first malformed row instead of counting and skipping
        #[arg(long)]
        strict: bool,

        /// Probe capacity and print the plan without submitting
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            input,
            decimals,
            strict,
        } => commands::validate::execute(input, decimals, strict),

        Commands::Plan {
            input,
            chunk_size,
            decimals,
        } => commands::plan::execute(input, chunk_size, decimals),

        Commands::Status {
            input,
            sender,
            mint,
            checkpoint,
            decimals,
        } => commands::status::execute(input, sender, mint, checkpoint, decimals),

        Commands::Send {
            input,
            keypair,
            mint,
            rpc_url,
            decimals,
            safety_fraction,
            rps,
            max_attempts,
            base_backoff_ms,
            max_backoff_ms,
            pause_ms,
            checkpoint,
            no_checkpoint,
            strict,
            dry_run,
        } => {
            commands::send::execute(commands::send::SendArgs {
                input,
                keypair,
                mint,
                rpc_url,
                decimals,
                safety_fraction,
                rps,
                max_attempts,
                base_backoff_ms,
                max_backoff_ms,
                pause_ms,
                checkpoint,
                no_checkpoint,
                strict,
                dry_run,
            })
            .await
        }
    }
}
