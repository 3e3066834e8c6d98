/// `IPv4` echo request building and reply parsing.
pub mod ipv4;

/// Platform specific socket implementations.
pub mod platform;

/// The socket abstraction used by the probe engine.
pub mod socket;

pub use platform::SocketImpl;
