//! Error types for readiness polling

use std::time::Duration;
use thiserror::Error;

/// Unified error type for the readiness helpers
#[derive(Error, Debug)]
pub enum Error {
    /// Target refused the connection, or never produced an SSH banner,
    /// within the wait budget
    #[error("connection refused by {host}:{port} after waiting {waited:?}")]
    ConnectionRefused {
        /// The hostname or IP address that was polled
        host: String,
        /// The port that was polled
        port: u16,
        /// Total time spent sleeping between attempts before giving up
        waited: Duration,
        /// The refusal from the final attempt
        #[source]
        source: std::io::Error,
    },

    /// Any other connection-level failure; surfaced immediately, never retried
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
