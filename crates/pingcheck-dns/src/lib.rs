//! Target resolution for pingcheck.
//!
//! A target is either a dotted-quad `IPv4` literal, which is used as-is, or a hostname which is
//! resolved with the system resolver. Only the first `IPv4` address of a hostname is used.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pingcheck_dns::{Resolver, SystemResolver};
//!
//! let addr = SystemResolver.lookup("example.com")?;
//! println!("example.com resolved to {addr}");
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod resolver;
mod system;

pub use resolver::{Error, Resolver, Result};
pub use system::SystemResolver;
