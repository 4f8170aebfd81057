use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recipient list error: {0}")]
    Recipients(#[from] scatter_recipients::RecipientError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] scatter_checkpoint::CheckpointError),

    #[error("Submission failed: {0}")]
    Engine(#[from] scatter_engine::EngineError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
