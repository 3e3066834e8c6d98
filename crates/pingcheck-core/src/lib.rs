//! pingcheck - An `ICMP` reachability checking library.
//!
//! This crate provides the ping engine used by the `pingcheck` command line tool: echo request
//! construction, sequence number management, the single probe send and receive protocol and the
//! retry loop which bounds a reachability check by count, interval and deadline.
//!
//! # Example
//!
//! The following example checks a target with the default configuration, retrying until an echo
//! reply is received:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pingcheck_core::Builder;
//!
//! let reachable = Builder::new().build()?.check_reachable("1.1.1.1");
//! # Ok(())
//! # }
//! ```
//!
//! The following example sends at most 3 probes, one per second, within 5 seconds overall using
//! unprivileged `ICMP` sockets (only supported on some platforms), printing each event:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pingcheck_core::{Builder, PrivilegeMode};
//! use std::time::Duration;
//!
//! let pinger = Builder::new()
//!     .privilege_mode(PrivilegeMode::Unprivileged)
//!     .timeout(Some(Duration::from_millis(500)))
//!     .interval(Some(Duration::from_secs(1)))
//!     .count(Some(3))
//!     .deadline(Some(Duration::from_secs(5)))
//!     .build()?;
//! pinger.check_reachable_with("example.com", |event| println!("{event}"));
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Pinger`].
//! - [`Pinger::check_reachable`] - Check a target.
//! - [`Pinger::check_reachable_with`] - Check a target with a custom event handler.
//! - [`Controller`] - Drive a check with a custom [`Prober`] and [`pingcheck_dns::Resolver`].
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc
)]
#![deny(unsafe_code)]

mod builder;
mod config;
mod controller;
mod error;
mod net;
mod pinger;
mod probe;
mod prober;
mod sequencer;
mod types;

pub use builder::Builder;
pub use config::{defaults, Config, PrivilegeMode, ReplyMatching};
pub use controller::{Controller, Event};
pub use error::{Error, IoError, IoOperation, IoResult, Result};
pub use net::socket::Socket;
pub use net::SocketImpl;
pub use pinger::Pinger;
pub use probe::{EchoReply, ProbeOutcome, ProbeRequest};
pub use prober::{EchoProber, Prober};
pub use sequencer::Sequencer;
pub use types::{Sequence, TraceId};
