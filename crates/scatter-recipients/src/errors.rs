use thiserror::Error;

pub type RecipientResult<T> = Result<T, RecipientError>;

#[derive(Error, Debug)]
pub enum RecipientError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Invalid recipient address: '{0}'")]
    InvalidAddress(String),

    #[error("Invalid amount '{amount}' for recipient '{recipient}'")]
    InvalidAmount { recipient: String, amount: String },

    #[error("Duplicate recipient addresses in input: {}", .0.join(", "))]
    DuplicateAddress(Vec<String>),

    #[error("Unsupported mint decimals: {0} (max {max})", max = crate::validation::MAX_SUPPORTED_DECIMALS)]
    UnsupportedDecimals(u8),

    #[error("No remaining entries to submit")]
    NoRemainingEntries,
}
