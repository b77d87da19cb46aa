use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Error type for client operations.
///
/// A record that does not exist yet is not an error: readers return `None`
/// for it and the composer turns that into a create-operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("program settings not found; initialize the program first")]
    NotInitialized,
    #[error("no user state for {0}; deposit first")]
    UserStateMissing(Pubkey),
    #[error("failed to decode {record} at {address}: {reason}")]
    Decode {
        record: &'static str,
        address: Pubkey,
        reason: String,
    },
    #[error("no off-curve bump found for seeds under program {program_id}")]
    DerivationExhausted { program_id: Pubkey },
    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),
    #[error("record {address} already exists (created concurrently); re-read and retry")]
    DuplicateCreate { address: Pubkey },
    #[error("operation set rejected: {reason}")]
    RemoteRejected {
        /// Index of the failing instruction, when the cluster reported one.
        instruction: Option<usize>,
        reason: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// True when the failure cannot have changed remote state and a re-read
    /// followed by a fresh composition is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::DuplicateCreate { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
