//! Error types for symmetry lookups.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymmetryError {
    /// A coordinate triplet could not be parsed.
    #[error("invalid symmetry operation '{triplet}': {message}")]
    InvalidTriplet { triplet: String, message: String },

    /// No space group matches the given name or number.
    #[error("unknown space group: {name}")]
    UnknownSpaceGroup { name: String },
}

impl SymmetryError {
    pub fn invalid_triplet(triplet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTriplet {
            triplet: triplet.into(),
            message: message.into(),
        }
    }

    pub fn unknown_spacegroup(name: impl Into<String>) -> Self {
        Self::UnknownSpaceGroup { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, SymmetryError>;
