use std::net::Ipv4Addr;
use thiserror::Error;

/// Resolve a ping target to a single `IPv4` address.
pub trait Resolver {
    /// Perform a blocking lookup of `target`.
    fn lookup(&self, target: &str) -> Result<Ipv4Addr>;
}

/// A DNS resolver error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A DNS resolver error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("DNS lookup failed: {0}")]
    LookupFailed(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("no IPv4 address found for {0}")]
    NoIpv4Addr(String),
}
