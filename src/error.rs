use thiserror::Error;

/// Errors surfaced by the engine. Per-line parse failures during dictionary
/// loading are recovered (skipped and logged), never returned through here.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected configuration at construction or loader setup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A lookup asked for a larger edit distance than the dictionary was
    /// built for.
    #[error("max_edit_distance {max_edit_distance} is larger than max_dictionary_edit_distance {limit}")]
    DistanceTooLarge { max_edit_distance: i64, limit: i64 },

    /// Misuse of a helper, e.g. case transfer between texts of unequal
    /// length in matching mode.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted state snapshot was written by an incompatible version.
    #[error("data version mismatch: expected {expected}, found {found}")]
    DataVersionMismatch { expected: u32, found: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state serialization error: {0}")]
    Serialize(#[from] bincode::Error),
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
