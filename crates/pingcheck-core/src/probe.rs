use crate::error::Error;
use crate::types::{Sequence, TraceId};
use pingcheck_packet::icmpv4::{IcmpCode, IcmpType};
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::time::Duration;

/// A single `ICMP` echo request to be sent.
///
/// # Examples
///
/// ```
/// use pingcheck_core::{ProbeRequest, Sequence, TraceId};
/// use std::net::Ipv4Addr;
/// use std::time::Duration;
///
/// let request = ProbeRequest::new(
///     Ipv4Addr::new(192, 0, 2, 1),
///     TraceId(1234),
///     Sequence(7),
///     Some(Duration::from_secs(2)),
/// );
/// assert_eq!(Sequence(7), request.sequence);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRequest {
    /// The resolved target.
    pub target: Ipv4Addr,
    /// The echo identifier.
    pub identifier: TraceId,
    /// The echo sequence number.
    pub sequence: Sequence,
    /// How long to wait for a reply, `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ProbeRequest {
    #[must_use]
    pub const fn new(
        target: Ipv4Addr,
        identifier: TraceId,
        sequence: Sequence,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            target,
            identifier,
            sequence,
            timeout,
        }
    }
}

/// A received echo reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReply {
    /// The host which sent the reply.
    pub addr: Ipv4Addr,
    /// The sequence number echoed back.
    pub sequence: Sequence,
    /// Round trip time.
    pub rtt: Duration,
}

/// The result of a single probe.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// An echo reply was received.
    Success(EchoReply),
    /// No reply was received before the timeout.
    Timeout,
    /// A reply was received which was not an echo reply.
    ProtocolMismatch {
        addr: Ipv4Addr,
        icmp_type: IcmpType,
        icmp_code: IcmpCode,
    },
    /// The probe could not be built, sent or received.
    TransportError(Error),
}

impl ProbeOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl Display for ProbeOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success(reply) => write!(
                f,
                "reply from {}: icmp_seq={} time={:?}",
                reply.addr, reply.sequence.0, reply.rtt
            ),
            Self::Timeout => write!(f, "request timed out"),
            Self::ProtocolMismatch {
                addr,
                icmp_type,
                icmp_code,
            } => write!(f, "bad reply from {addr}: {icmp_type} ({icmp_code})"),
            Self::TransportError(err) => write!(f, "probe failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(
        ProbeOutcome::Success(EchoReply { addr: Ipv4Addr::new(1, 1, 1, 1), sequence: Sequence(3), rtt: Duration::from_millis(12) }),
        "reply from 1.1.1.1: icmp_seq=3 time=12ms";
        "success"
    )]
    #[test_case(ProbeOutcome::Timeout, "request timed out"; "timeout")]
    #[test_case(
        ProbeOutcome::ProtocolMismatch { addr: Ipv4Addr::new(10, 0, 0, 1), icmp_type: IcmpType::TimeExceeded, icmp_code: IcmpCode(0) },
        "bad reply from 10.0.0.1: time exceeded (code 0)";
        "time exceeded"
    )]
    #[test_case(
        ProbeOutcome::TransportError(Error::ShortWrite { expected: 8, sent: 0 }),
        "probe failed: expected to send 8 bytes, but sent 0";
        "short write"
    )]
    fn test_display(outcome: ProbeOutcome, expected: &str) {
        assert_eq!(expected, outcome.to_string());
    }

    #[test]
    fn test_is_success() {
        assert!(!ProbeOutcome::Timeout.is_success());
        assert!(ProbeOutcome::Success(EchoReply {
            addr: Ipv4Addr::LOCALHOST,
            sequence: Sequence(0),
            rtt: Duration::ZERO,
        })
        .is_success());
    }
}
