//! Shared error-code contract.
//!
//! Every error enum in the crate maps to a stable, machine-readable code so
//! notifications and logs can be correlated without string matching.

/// Stable code for an error variant.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same call could plausibly succeed.
    fn retryable(&self) -> bool {
        false
    }
}
