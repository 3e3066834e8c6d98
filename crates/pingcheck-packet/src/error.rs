use thiserror::Error;

/// A packet error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A packet error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// The buffer is too small to hold the packet being viewed or built.
    #[error("insufficient buffer for {0} packet, minimum={1}, provided={2}")]
    InsufficientPacketBuffer(String, usize, usize),
}
