//! Error types for MAYO operations.

use thiserror::Error;

/// Errors that can occur during MAYO key generation, signing or decoding.
///
/// Verification never returns an error for a well-formed but invalid
/// signature; that outcome is reported as `-1` (or `false`) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MayoError {
    /// The requested parameter set is invalid or unsupported.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// Description of why the configuration was rejected.
        reason: &'static str,
    },

    /// The randomness source failed to produce bytes.
    #[error("randomness source failed: {0}")]
    Randomness(String),

    /// Every signing attempt produced a rank-deficient linear system.
    #[error("signing failed after {attempts} attempts")]
    SolverExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// A serialized key, signature or signed message has the wrong size.
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Which object was being decoded.
        what: &'static str,
        /// Size required by the parameter set.
        expected: usize,
        /// Size actually supplied.
        actual: usize,
    },
}

impl From<rand::Error> for MayoError {
    fn from(err: rand::Error) -> Self {
        MayoError::Randomness(err.to_string())
    }
}

/// Result type alias for MAYO operations.
pub type Result<T> = std::result::Result<T, MayoError>;

/// Fails with [`MayoError::InvalidLength`] unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(MayoError::InvalidLength {
            what,
            expected,
            actual,
        })
    }
}
