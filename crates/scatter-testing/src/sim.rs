use async_trait::async_trait;
use scatter_engine::{Endpoint, EndpointError, SubmitReceipt};
use scatter_recipients::Entry;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One chunk the simulated endpoint confirmed, as it saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedChunk {
    pub addresses: Vec<String>,
    pub attached_value: Option<u64>,
    pub units: u64,
}

#[derive(Debug, Default)]
struct SimState {
    estimate_calls: usize,
    authorization_calls: Vec<u64>,
    submit_attempts: usize,
    submit_script: VecDeque<Result<(), EndpointError>>,
    authorization_failure: Option<EndpointError>,
    confirmed: Vec<ConfirmedChunk>,
}

/// Simulated remote endpoint with a linear cost model.
///
/// `estimate_cost(n)` returns `base_cost + per_entry_cost * n`; submissions
/// consume one scripted outcome per attempt (an empty script always
/// succeeds) and confirmed chunks are logged in order.
#[derive(Debug)]
pub struct SimEndpoint {
    base_cost: u64,
    per_entry_cost: u64,
    estimate_unavailable_at: Option<usize>,
    state: Mutex<SimState>,
}

impl SimEndpoint {
    pub fn new(base_cost: u64, per_entry_cost: u64) -> Self {
        Self {
            base_cost,
            per_entry_cost,
            estimate_unavailable_at: None,
            state: Mutex::new(SimState::default()),
        }
    }

    /// Make every estimate for `threshold` or more entries fail outright.
    pub fn with_estimates_unavailable_at(mut self, threshold: usize) -> Self {
        self.estimate_unavailable_at = Some(threshold);
        self
    }

    /// Script per-attempt submission outcomes, consumed front to back. Once
    /// the script is exhausted, submissions succeed.
    pub fn script_submit_outcomes(&self, outcomes: Vec<Result<(), EndpointError>>) {
        self.state.lock().unwrap().submit_script = outcomes.into();
    }

    /// Make the next authorization call fail with `error`.
    pub fn fail_authorization(&self, error: EndpointError) {
        self.state.lock().unwrap().authorization_failure = Some(error);
    }

    pub fn estimate_calls(&self) -> usize {
        self.state.lock().unwrap().estimate_calls
    }

    /// Totals passed to `ensure_authorization`, in call order.
    pub fn authorization_calls(&self) -> Vec<u64> {
        self.state.lock().unwrap().authorization_calls.clone()
    }

    pub fn submit_attempts(&self) -> usize {
        self.state.lock().unwrap().submit_attempts
    }

    pub fn confirmed_chunks(&self) -> Vec<ConfirmedChunk> {
        self.state.lock().unwrap().confirmed.clone()
    }

    pub fn total_remote_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.estimate_calls + state.authorization_calls.len() + state.submit_attempts
    }
}

#[async_trait]
impl Endpoint for SimEndpoint {
    async fn estimate_cost(&self, entries: &[Entry]) -> Result<u64, EndpointError> {
        self.state.lock().unwrap().estimate_calls += 1;

        if let Some(threshold) = self.estimate_unavailable_at {
            if entries.len() >= threshold {
                return Err(EndpointError::from_message("estimator unavailable"));
            }
        }
        Ok(self.base_cost + self.per_entry_cost * entries.len() as u64)
    }

    async fn ensure_authorization(&self, total_required: u64) -> Result<(), EndpointError> {
        let mut state = self.state.lock().unwrap();
        state.authorization_calls.push(total_required);

        match state.authorization_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn submit_chunk(
        &self,
        entries: &[Entry],
        attached_value: Option<u64>,
    ) -> Result<SubmitReceipt, EndpointError> {
        let mut state = self.state.lock().unwrap();
        state.submit_attempts += 1;

        if let Some(outcome) = state.submit_script.pop_front() {
            outcome?;
        }

        let units = entries.iter().map(|entry| entry.amount_units).sum();
        state.confirmed.push(ConfirmedChunk {
            addresses: entries.iter().map(|e| e.address.to_string()).collect(),
            attached_value,
            units,
        });

        let handle = format!("sim-{}", state.confirmed.len());
        Ok(SubmitReceipt {
            handle,
            confirmed_cost: self.base_cost + self.per_entry_cost * entries.len() as u64,
        })
    }
}
