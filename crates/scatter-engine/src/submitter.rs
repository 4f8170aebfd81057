/*!
# Chunk Submission

Drives a filtered working set to completion: partitions it in original order
at the probed chunk size, submits one chunk at a time, and records every
confirmed entry in the checkpoint before touching the next chunk.

Delivery semantics: a crash between a chunk's confirmation and its
checkpoint write causes that chunk to be resubmitted on the next run. That
is safe because the remote execution is all-or-nothing per chunk, so the
engine provides at-least-once delivery at chunk granularity, and the
entry-key bookkeeping provides exactly-once semantics across subsequent
runs. The confirm-then-persist ordering is a strict invariant; persisting
first would let a crash silently lose an in-flight send's accounting.
*/

use crate::config::{CostBudget, SubmitConfig};
use crate::endpoint::Endpoint;
use crate::error::{EngineError, EngineResult};
use crate::pacer::PacedExecutor;
use crate::prober::probe_chunk_size;
use scatter_checkpoint::CheckpointStore;
use scatter_recipients::{Asset, Entry};
use std::time::Duration;
use tracing::{info, warn};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Probed chunk size applied to every chunk
    pub chunk_size: usize,
    pub chunks_confirmed: usize,
    pub entries_confirmed: usize,
    /// Base units transferred across all confirmed chunks
    pub total_units_sent: u64,
    /// Sum of endpoint-reported confirmed costs
    pub total_cost: u64,
}

/// Partition `entries` into ordered chunks no longer than `chunk_size`,
/// covering the working set exactly once and preserving relative order.
pub fn plan_chunks(entries: &[Entry], chunk_size: usize) -> Vec<&[Entry]> {
    entries.chunks(chunk_size.max(1)).collect()
}

/// Probe capacity, then submit the whole working set.
///
/// One executor is shared between the probe and the submission loop so the
/// pacing window spans every remote call of the run.
pub async fn execute_batch<E: Endpoint + ?Sized>(
    endpoint: &E,
    entries: &[Entry],
    asset: &Asset,
    budget: &CostBudget,
    config: &SubmitConfig,
    checkpoint: &mut CheckpointStore,
    session_id: &str,
) -> EngineResult<RunReport> {
    let mut executor = PacedExecutor::new(config);
    let chunk_size = probe_chunk_size(endpoint, &mut executor, entries, budget).await;

    submit_chunks(
        endpoint,
        &mut executor,
        entries,
        asset,
        chunk_size,
        config.inter_chunk_pause,
        checkpoint,
        session_id,
    )
    .await
}

/// Submit `entries` in order as chunks of at most `chunk_size`.
///
/// Token-style assets get a single up-front authorization covering the total
/// remaining amount for the whole run, not one per chunk. Native sends
/// attach each chunk's aggregate as transferred value. Any remote failure
/// that survives the retry ceiling aborts the run immediately;
/// already-confirmed chunks stay checkpointed, so the next run resumes past
/// them.
#[allow(clippy::too_many_arguments)]
pub async fn submit_chunks<E: Endpoint + ?Sized>(
    endpoint: &E,
    executor: &mut PacedExecutor,
    entries: &[Entry],
    asset: &Asset,
    chunk_size: usize,
    inter_chunk_pause: Duration,
    checkpoint: &mut CheckpointStore,
    session_id: &str,
) -> EngineResult<RunReport> {
    let total_required = aggregate_units(entries)?;

    if !asset.is_native() {
        info!(total_required, "ensuring authorization for the full run");
        executor
            .execute("ensure_authorization", || {
                endpoint.ensure_authorization(total_required)
            })
            .await?;
    }

    let chunks = plan_chunks(entries, chunk_size);
    let total_chunks = chunks.len();
    let mut report = RunReport {
        chunk_size: chunk_size.max(1),
        chunks_confirmed: 0,
        entries_confirmed: 0,
        total_units_sent: 0,
        total_cost: 0,
    };

    for (index, chunk) in chunks.iter().enumerate() {
        // Aggregate cannot overflow: the run total was checked above.
        let chunk_units: u64 = chunk.iter().map(|entry| entry.amount_units).sum();
        let attached_value = asset.is_native().then_some(chunk_units);

        info!(
            chunk = index + 1,
            total_chunks,
            entries = chunk.len(),
            chunk_units,
            "submitting chunk"
        );

        let receipt = executor
            .execute("submit_chunk", || {
                endpoint.submit_chunk(chunk, attached_value)
            })
            .await?;

        // Confirm first, persist second. A write failure is a warning, not a
        // fatal condition: submission progress outranks bookkeeping, at the
        // price of a possible resubmission of this chunk next run.
        let keys = chunk.iter().map(Entry::key);
        if let Err(error) = checkpoint.record(session_id, keys) {
            warn!(
                chunk = index + 1,
                error = %error,
                "checkpoint write failed; this chunk will not survive a restart"
            );
        }

        report.chunks_confirmed += 1;
        report.entries_confirmed += chunk.len();
        report.total_units_sent += chunk_units;
        report.total_cost = report.total_cost.saturating_add(receipt.confirmed_cost);

        info!(
            chunk = index + 1,
            total_chunks,
            handle = %receipt.handle,
            confirmed_cost = receipt.confirmed_cost,
            "chunk confirmed"
        );

        if index + 1 < total_chunks && !inter_chunk_pause.is_zero() {
            tokio::time::sleep(inter_chunk_pause).await;
        }
    }

    Ok(report)
}

fn aggregate_units(entries: &[Entry]) -> EngineResult<u64> {
    entries
        .iter()
        .try_fold(0u64, |acc, entry| acc.checked_add(entry.amount_units))
        .ok_or(EngineError::AmountOverflow(entries.len()))
}
