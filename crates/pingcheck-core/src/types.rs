/// `Sequence` number newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Sequence(pub u16);

/// `TraceId` newtype.
///
/// The `ICMP` echo identifier shared by every probe sent from this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct TraceId(pub u16);

impl TraceId {
    /// Derive the identifier from a process id, truncated to 16 bits.
    #[must_use]
    pub const fn from_pid(pid: u32) -> Self {
        Self((pid & 0xFFFF) as u16)
    }

    /// The identifier of the current process.
    #[must_use]
    pub fn current() -> Self {
        Self::from_pid(std::process::id())
    }
}
