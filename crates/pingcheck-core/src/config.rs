use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use crate::{PrivilegeMode, ReplyMatching};
    use std::time::Duration;

    /// The default value for `unprivileged`.
    pub const DEFAULT_PRIVILEGE_MODE: PrivilegeMode = PrivilegeMode::Privileged;

    /// The default per-probe reply timeout.
    pub const DEFAULT_TIMEOUT: Option<Duration> = Some(Duration::from_secs(2));

    /// The default minimum spacing between probe starts (none).
    pub const DEFAULT_INTERVAL: Option<Duration> = None;

    /// The default maximum number of probes (unlimited).
    pub const DEFAULT_COUNT: Option<usize> = None;

    /// The default overall deadline (unlimited).
    pub const DEFAULT_DEADLINE: Option<Duration> = None;

    /// The default reply matching mode.
    pub const DEFAULT_REPLY_MATCHING: ReplyMatching = ReplyMatching::Strict;

    /// Whether a last-chance probe is sent after a failure when the deadline is near.
    pub const DEFAULT_FINAL_PROBE: bool = true;
}

/// The privilege mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrivilegeMode {
    /// Privileged mode, using a raw `ICMP` socket.
    Privileged,
    /// Unprivileged mode, using an `ICMP` datagram socket.
    Unprivileged,
}

impl PrivilegeMode {
    #[must_use]
    pub const fn is_unprivileged(self) -> bool {
        match self {
            Self::Privileged => false,
            Self::Unprivileged => true,
        }
    }
}

impl Display for PrivilegeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Privileged => write!(f, "privileged"),
            Self::Unprivileged => write!(f, "unprivileged"),
        }
    }
}

/// How inbound datagrams are attributed to the probe awaiting a reply.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ReplyMatching {
    /// Only accept an echo reply sent by the target carrying our identifier and sequence, or an
    /// `ICMP` error quoting our echo request; anything else is ignored until the probe times out.
    Strict,
    /// Classify the first datagram received, whatever it is.
    FirstDatagram,
}

impl Display for ReplyMatching {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::FirstDatagram => write!(f, "first-datagram"),
        }
    }
}

/// Reachability check configuration.
///
/// `None` means unbounded for every limit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// Reply timeout for each probe.
    pub timeout: Option<Duration>,
    /// Minimum spacing between the start of consecutive probes.
    pub interval: Option<Duration>,
    /// Maximum number of probes.
    pub count: Option<usize>,
    /// Wall-clock budget for the whole check, measured from the first probe.
    pub deadline: Option<Duration>,
    pub privilege_mode: PrivilegeMode,
    pub reply_matching: ReplyMatching,
    pub final_probe: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: defaults::DEFAULT_TIMEOUT,
            interval: defaults::DEFAULT_INTERVAL,
            count: defaults::DEFAULT_COUNT,
            deadline: defaults::DEFAULT_DEADLINE,
            privilege_mode: defaults::DEFAULT_PRIVILEGE_MODE,
            reply_matching: defaults::DEFAULT_REPLY_MATCHING,
            final_probe: defaults::DEFAULT_FINAL_PROBE,
        }
    }
}
