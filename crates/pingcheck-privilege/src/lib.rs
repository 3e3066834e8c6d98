//! Discover platform privileges.
//!
//! Sending an `ICMP` echo request needs either a raw `IPPROTO_ICMP` socket, which requires
//! privileges, or an unprivileged `IPPROTO_ICMP` datagram ("ping") socket, which only some
//! platforms offer.
//!
//! [`Privilege::has_privileges`] (obtained via [`Privilege::discover`]):
//!
//! - On Linux we check if `CAP_NET_RAW` is in the effective set
//! - On other Unix platforms we check that the effective user is root
//!
//! [`Privilege::needs_privileges`] (obtained via [`Privilege::discover`]):
//!
//! - On macOS unprivileged `ICMP` datagram sockets are always available
//! - On Linux they are available if the effective group is within `net.ipv4.ping_group_range`
//! - On other Unix platforms they are not available
//!
//! Raising privileges is out of scope; run the binary as root or grant it `CAP_NET_RAW`.
//!
//! # Examples
//!
//! Discover the current privileges:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! # use pingcheck_privilege::Privilege;
//! let privilege = Privilege::discover()?;
//! if privilege.has_privileges() {
//!     println!("You have the required privileges for raw sockets");
//! } else if privilege.needs_privileges() {
//!     println!("You need privileges to send ICMP packets.");
//! } else {
//!     println!("You can send ICMP packets in unprivileged mode.");
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

/// A privilege error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A privilege error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[cfg(target_os = "linux")]
    #[error("caps error: {0}")]
    CapsError(#[from] caps::errors::CapsError),
}

/// Run-time platform privilege information.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Privilege {
    has_privileges: bool,
    needs_privileges: bool,
}

impl Privilege {
    /// Discover information about the platform privileges.
    pub fn discover() -> Result<Self> {
        let has_privileges = Self::check_has_privileges()?;
        let needs_privileges = Self::check_needs_privileges();
        tracing::debug!(has_privileges, needs_privileges);
        Ok(Self {
            has_privileges,
            needs_privileges,
        })
    }

    /// Create a new Privilege instance.
    #[must_use]
    pub const fn new(has_privileges: bool, needs_privileges: bool) -> Self {
        Self {
            has_privileges,
            needs_privileges,
        }
    }

    /// Are we running with the privileges required for raw sockets?
    #[must_use]
    pub const fn has_privileges(&self) -> bool {
        self.has_privileges
    }

    /// Are privileges needed to send `ICMP`, i.e. are unprivileged `ICMP` sockets unavailable?
    #[must_use]
    pub const fn needs_privileges(&self) -> bool {
        self.needs_privileges
    }

    #[cfg(target_os = "linux")]
    /// Check if `CAP_NET_RAW` is in the effective set.
    fn check_has_privileges() -> Result<bool> {
        Ok(caps::has_cap(
            None,
            caps::CapSet::Effective,
            caps::Capability::CAP_NET_RAW,
        )?)
    }

    #[cfg(all(unix, not(target_os = "linux")))]
    #[expect(clippy::unnecessary_wraps)]
    /// Checks if the effective user is root.
    fn check_has_privileges() -> Result<bool> {
        Ok(nix::unistd::Uid::effective().is_root())
    }

    #[cfg(target_os = "linux")]
    /// Linux only permits `IPPROTO_ICMP` datagram sockets for groups in `ping_group_range`.
    fn check_needs_privileges() -> bool {
        let gid = nix::unistd::Gid::effective().as_raw();
        match std::fs::read_to_string(PING_GROUP_RANGE) {
            Ok(range) => !ping_group_range_contains(&range, gid),
            Err(err) => {
                tracing::debug!(path = PING_GROUP_RANGE, ?err, "unreadable");
                true
            }
        }
    }

    #[cfg(target_os = "macos")]
    const fn check_needs_privileges() -> bool {
        false
    }

    #[cfg(all(unix, not(any(target_os = "linux", target_os = "macos"))))]
    /// `NetBSD`, `OpenBSD` and `FreeBSD` do not support `IPPROTO_ICMP` datagram sockets.
    const fn check_needs_privileges() -> bool {
        true
    }
}

#[cfg(target_os = "linux")]
const PING_GROUP_RANGE: &str = "/proc/sys/net/ipv4/ping_group_range";

/// Parse the `<low> <high>` pair and check whether `gid` lies within it.
///
/// The kernel default of `1 0` is an empty range.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn ping_group_range_contains(range: &str, gid: u32) -> bool {
    let mut bounds = range.split_whitespace().map(str::parse::<u32>);
    match (bounds.next(), bounds.next()) {
        (Some(Ok(low)), Some(Ok(high))) => (low..=high).contains(&gid),
        _ => false,
    }
}
