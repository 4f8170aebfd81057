use async_trait::async_trait;
use scatter_recipients::Entry;
use thiserror::Error;

/// HTTP status conventionally returned by rate-limiting endpoints.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Message fragments that mark an error as rate-limit-like even when the
/// endpoint did not surface a status code.
const RATE_LIMIT_PHRASES: &[&str] = &["rate limit", "too many requests", "429", "slow down"];

/// Structured failure from a remote call.
///
/// Classification operates on the explicit status code and message rather
/// than on any transport library's error shape, so adapters for different
/// endpoints all feed the same retry logic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EndpointError {
    /// Status code reported by the endpoint, when one exists
    pub status: Option<u16>,
    /// Human-readable failure description from the endpoint
    pub message: String,
}

impl EndpointError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

/// Retry-relevant classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Explicit rate-limit status or a known rate-limiting phrase. Retried.
    /// Kept distinct from `Other` for future policy differences, though both
    /// currently share the same attempt ceiling.
    RateLimited,
    /// Anything else. Also retried up to the attempt ceiling.
    Other,
}

/// Classify a remote failure for retry handling.
pub fn classify(error: &EndpointError) -> ErrorClass {
    if error.status == Some(STATUS_TOO_MANY_REQUESTS) {
        return ErrorClass::RateLimited;
    }

    let message = error.message.to_ascii_lowercase();
    if RATE_LIMIT_PHRASES.iter().any(|p| message.contains(p)) {
        ErrorClass::RateLimited
    } else {
        ErrorClass::Other
    }
}

/// Outcome of a confirmed chunk submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Opaque submission handle (e.g. a transaction signature)
    pub handle: String,
    /// Resource cost the endpoint reported for the confirmed execution
    pub confirmed_cost: u64,
}

/// The remote execution endpoint, abstracted.
///
/// The engine never signs, encodes, or transports anything itself; it only
/// sequences these three operations. Each chunk submission is all-or-nothing
/// on the remote side, which is what makes at-least-once resubmission of an
/// unrecorded chunk safe.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Estimate the resource cost of submitting `entries` as one chunk.
    /// Idempotent and side-effect-free.
    async fn estimate_cost(&self, entries: &[Entry]) -> Result<u64, EndpointError>;

    /// Ensure a pre-authorization covering `total_required` base units
    /// exists, requesting one and waiting for confirmation if necessary.
    async fn ensure_authorization(&self, total_required: u64) -> Result<(), EndpointError>;

    /// Execute the chunk's transfers, attaching `attached_value` base units
    /// for native-currency sends. Waits for the terminal outcome.
    async fn submit_chunk(
        &self,
        entries: &[Entry],
        attached_value: Option<u64>,
    ) -> Result<SubmitReceipt, EndpointError>;
}
