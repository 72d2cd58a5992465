use alloy_primitives::hex::FromHexError;
use erc7656::{ContextError, EvmHostError, FactoryError, KeyError, ServiceError};

/// Error types for the erc7656 commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Failed to read or write a file
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// A key field is malformed
    #[error("Invalid key: {0}")]
    Key(#[from] KeyError),

    /// The code is not a service image
    #[error("Invalid service image: {0}")]
    Context(#[from] ContextError),

    /// The simulated deployment failed
    #[error("Deployment failed: {0}")]
    Deployment(#[from] FactoryError<EvmHostError>),

    /// The deployed service could not be read back
    #[error("Service inspection failed: {0}")]
    Service(#[from] ServiceError<EvmHostError>),

    /// The simulated chain failed
    #[error("EVM error: {0}")]
    Host(#[from] EvmHostError),

    /// Failed to encode JSON output
    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for the erc7656 commands
pub type Result<T> = std::result::Result<T, CliError>;
