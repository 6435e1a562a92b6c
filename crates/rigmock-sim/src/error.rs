//! Server error types

use thiserror::Error;

/// Errors surfaced to the caller when starting the server.
///
/// Per-connection I/O failures are not in here; those just close the
/// affected session and are logged.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}
