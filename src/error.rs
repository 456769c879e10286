//! Error types for quadrant.
//!
//! All fallible library operations return [`QuadrantError`]. The binary edge
//! wraps this in `anyhow` for display.

use thiserror::Error;

/// Errors produced by quadrant operations.
#[derive(Debug, Error)]
pub enum QuadrantError {
    /// The persistent store (database or key-value backend) failed.
    ///
    /// Storage failures are never retried: a queue that cannot persist
    /// cannot guarantee durability, so the error surfaces immediately.
    #[error("storage error: {0}")]
    Storage(String),

    /// A queue operation was invalid (unknown entry, bad transition).
    #[error("queue error: {0}")]
    Queue(String),

    /// Configuration could not be loaded, parsed, or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The remote task repository rejected an operation.
    #[error("repository error: {0}")]
    Repository(String),

    /// An intent callback supplied by the host failed.
    #[error("intent handler error: {0}")]
    Intent(String),

    /// Terminal setup or event handling failed.
    #[error("terminal error: {0}")]
    Terminal(String),
}
