use std::fmt::{Display, Formatter};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// A pinger error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A pinger error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid packet: {0}")]
    PacketError(#[from] pingcheck_packet::error::Error),
    #[error("invalid config: {0}")]
    BadConfig(String),
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("expected to send {expected} bytes, but sent {sent}")]
    ShortWrite { expected: usize, sent: usize },
}

/// Custom IO error result.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Custom IO error.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Bind error for {1}: {0}")]
    Bind(io::Error, SocketAddr),
    #[error("Sendto error for {1}: {0}")]
    SendTo(io::Error, SocketAddr),
    #[error("Failed to {1}: {0}")]
    Other(io::Error, IoOperation),
}

impl IoError {
    /// The underlying [`io::ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Bind(e, _) | Self::SendTo(e, _) | Self::Other(e, _) => e.kind(),
        }
    }
}

/// Io operation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IoOperation {
    NewSocket,
    Select,
    RecvFrom,
}

impl Display for IoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSocket => write!(f, "create new socket"),
            Self::Select => write!(f, "select"),
            Self::RecvFrom => write!(f, "recv from"),
        }
    }
}
