//! Error types for LanKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LanKvError
pub type Result<T> = std::result::Result<T, LanKvError>;

/// Unified error type for LanKV operations
#[derive(Debug, Error)]
pub enum LanKvError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Frame Decode Errors
    // -------------------------------------------------------------------------
    #[error("Invalid length digit: 0x{0:02x}")]
    InvalidLengthDigit(u8),

    #[error("Invalid argument length: {0:?}")]
    InvalidLength(String),

    #[error("Truncated payload: expected {expected} bytes, got {got}")]
    TruncatedPayload { expected: u64, got: u64 },

    // -------------------------------------------------------------------------
    // Frame Encode Errors
    // -------------------------------------------------------------------------
    #[error("Argument too long for a one-digit length prefix: {0} bytes")]
    ArgumentTooLong(usize),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Store operation failed: {0}")]
    StoreOperationFailed(String),

    // -------------------------------------------------------------------------
    // Client Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server rejected the command")]
    Rejected,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LanKvError {
    /// True for malformed argument frames.
    ///
    /// These are answered with `err` and the connection stays usable.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            LanKvError::InvalidLengthDigit(_)
                | LanKvError::InvalidLength(_)
                | LanKvError::TruncatedPayload { .. }
        )
    }
}
