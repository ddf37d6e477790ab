use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid address {0:?}: expected host:port")]
    InvalidAddress(String),

    #[error("invalid port {0}")]
    InvalidPort(String),

    #[error("authentication rejected by server")]
    AuthFailed,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid packet length: {0}")]
    InvalidPacketLength(i32),

    #[error("packet missing null terminator")]
    MissingTerminator,

    #[error("unexpected packet type: {0}")]
    UnexpectedPacketType(i32),

    #[error("response id mismatch: expected {expected}, got {got}")]
    ResponseIdMismatch { expected: i32, got: i32 },

    #[error("RCON session closed after an interrupted exchange")]
    SessionClosed,

    #[error("command too long: {len} bytes (limit {limit})")]
    CommandTooLong { len: usize, limit: usize },
}
