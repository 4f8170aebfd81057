use crate::endpoint::EndpointError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Final underlying remote error, re-raised unchanged once the retry
    /// ceiling is exhausted.
    #[error(transparent)]
    Remote(#[from] EndpointError),

    #[error("Aggregate amount overflows u64 across {0} entries")]
    AmountOverflow(usize),

    #[error("Invalid safety fraction {0} (must be in (0, 1])")]
    InvalidSafetyFraction(f64),
}
