/*!
# Scatter Batch Submission Engine

Submits many (recipient, amount) transfers in as few remote executions as
possible while staying under a per-execution resource budget, tolerating an
unreliable, rate-limited endpoint, and surviving restarts without
double-spending.

The engine is deliberately sequential: one remote call is in flight at a
time, so pacing and rate-limit handling stay correct and checkpoint updates
are trivially race-free. The only suspension points are remote calls and the
explicit pacing/backoff sleeps.

## Quick Start

```rust,ignore
use scatter_checkpoint::CheckpointStore;
use scatter_engine::{execute_batch, CostBudget, SubmitConfig};
use scatter_recipients::Asset;

# async fn example(endpoint: &impl scatter_engine::Endpoint) -> Result<(), Box<dyn std::error::Error>> {
let entries = vec![/* validated + resumption-filtered entries */];
let budget = CostBudget::new(1232, 0.95)?;
let config = SubmitConfig::default();
let mut checkpoint = CheckpointStore::load("checkpoint.json")?;

let report = execute_batch(
    endpoint,
    &entries,
    &Asset::Native,
    &budget,
    &config,
    &mut checkpoint,
    "session-fingerprint",
)
.await?;
println!(
    "confirmed {} entries in {} chunks of ≤{}",
    report.entries_confirmed, report.chunks_confirmed, report.chunk_size
);
# Ok(())
# }
```

## Pipeline

1. **Capacity probe** — exponential search plus binary refinement over
   `estimate_cost` calls finds the largest chunk size that fits the budget.
2. **Chunk submission** — the working set is partitioned in order at that
   size; each chunk is submitted, confirmed, checkpointed, then the engine
   pauses before the next one.
3. **Paced retries** — every remote call goes through one shared
   [`PacedExecutor`], which enforces a process-wide minimum call interval and
   retries failures with capped, jittered exponential backoff.
*/

mod config;
mod endpoint;
mod error;
mod pacer;
mod prober;
mod submitter;

pub use config::{interval_from_rate, CostBudget, SubmitConfig};
pub use endpoint::{classify, Endpoint, EndpointError, ErrorClass, SubmitReceipt};
pub use error::{EngineError, EngineResult};
pub use pacer::{PacedExecutor, Pacer, RetryPolicy};
pub use prober::{probe_chunk_size, PROBE_CEILING};
pub use submitter::{execute_batch, plan_chunks, submit_chunks, RunReport};
