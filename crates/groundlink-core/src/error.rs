//! Shared error type across GroundLink crates.

use thiserror::Error;

/// Stable error categories (used as drop-reason metric labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed datagram framing (header too short, bad declared lengths).
    Format,
    /// Point-cloud decode failure (corrupt stream, unsupported layout).
    Decode,
    /// Socket bind/send/receive failure.
    Socket,
    /// Invalid configuration.
    Config,
}

impl ErrorKind {
    /// String representation used in logs, metrics labels, and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Format => "FORMAT",
            ErrorKind::Decode => "DECODE",
            ErrorKind::Socket => "SOCKET",
            ErrorKind::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GroundLinkError>;

/// Unified error type used by core and the relay worker.
#[derive(Debug, Error)]
pub enum GroundLinkError {
    #[error("malformed packet: {0}")]
    Format(String),
    #[error("point-cloud decode: {0}")]
    Decode(String),
    #[error("socket: {0}")]
    Socket(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
}

impl GroundLinkError {
    /// Map an error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GroundLinkError::Format(_) => ErrorKind::Format,
            GroundLinkError::Decode(_) => ErrorKind::Decode,
            GroundLinkError::Socket(_) => ErrorKind::Socket,
            GroundLinkError::Config(_) => ErrorKind::Config,
        }
    }
}
