use thiserror::Error;

/// Errors raised by intensity-set operations.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The operation needs crystal symmetry but none is attached.
    #[error("unknown space group")]
    MissingSymmetry,

    /// The operation is undefined on a set without reflections.
    #[error("{operation} requires at least one reflection")]
    EmptySet { operation: &'static str },
}

pub type Result<T> = std::result::Result<T, MergeError>;
