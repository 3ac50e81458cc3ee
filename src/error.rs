//! Error types for the signature crate.

/// Errors surfaced by key generation and the slice-level API.
///
/// A failed verification is never an error: `verify` is total over
/// attacker-supplied bytes and reports `false` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A fixed-size input had the wrong length. Raised before any
    /// computation touches the buffer.
    #[error("invalid {context} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A byte string did not decode to a valid curve point.
    #[error("invalid point encoding")]
    InvalidEncoding,

    /// The operating system entropy source failed. Fatal for the call;
    /// there is deliberately no fallback to a weaker source.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

pub type Result<T> = core::result::Result<T, Error>;
