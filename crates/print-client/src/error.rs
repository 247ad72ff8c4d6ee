//! Typed errors for label output sinks.

use std::io;
use std::time::Duration;

/// Why a document could not be delivered.
///
/// Nothing in this crate retries; the caller decides whether to try again.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// The printer actively refused the connection (port closed).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The connection did not establish within the configured timeout.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connecting or configuring the socket failed for another reason.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The address did not parse and did not resolve.
    #[error("no address found for printer: {0}")]
    NoAddressFound(String),

    /// Writing to the printer failed part-way.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// Creating or writing the output file failed.
    #[error("failed to write {path}: {source}")]
    FileFailed {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl PrintError {
    /// `true` for failures that happened before any byte reached the device.
    pub fn is_connect_error(&self) -> bool {
        matches!(
            self,
            PrintError::ConnectionRefused { .. }
                | PrintError::ConnectionTimeout { .. }
                | PrintError::ConnectionFailed { .. }
                | PrintError::NoAddressFound(_)
        )
    }
}
