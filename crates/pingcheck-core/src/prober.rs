use crate::config::{PrivilegeMode, ReplyMatching};
use crate::error::{Error, Result};
use crate::net::ipv4::{self, Datagram, MAX_RECV_PACKET_SIZE};
use crate::net::socket::Socket;
use crate::probe::{EchoReply, ProbeOutcome, ProbeRequest};
use crate::sequencer::Sequencer;
use crate::types::{Sequence, TraceId};
use pingcheck_packet::icmpv4::echo::EchoPacket;
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Sends a single probe and reports its outcome.
#[cfg_attr(test, mockall::automock)]
pub trait Prober {
    /// Send one echo request to `target` and wait up to `timeout` for the reply.
    ///
    /// A `None` or zero `timeout` waits indefinitely.
    fn probe(&self, target: Ipv4Addr, timeout: Option<Duration>) -> ProbeOutcome;
}

/// An `ICMPv4` echo prober.
///
/// Each probe opens its own socket, which is closed before `probe` returns.
pub struct EchoProber<S> {
    identifier: TraceId,
    privilege_mode: PrivilegeMode,
    reply_matching: ReplyMatching,
    sequencer: Arc<Sequencer>,
    socket: PhantomData<fn() -> S>,
}

impl<S: Socket> EchoProber<S> {
    #[must_use]
    pub fn new(
        identifier: TraceId,
        privilege_mode: PrivilegeMode,
        reply_matching: ReplyMatching,
        sequencer: Arc<Sequencer>,
    ) -> Self {
        Self {
            identifier,
            privilege_mode,
            reply_matching,
            sequencer,
            socket: PhantomData,
        }
    }

    #[instrument(skip(self), level = "trace")]
    fn dispatch(&self, request: &ProbeRequest) -> Result<ProbeOutcome> {
        let mut buf = [0_u8; EchoPacket::minimum_packet_size()];
        let echo = ipv4::make_echo_request(&mut buf, request.identifier, request.sequence)?;
        let mut socket = S::new_icmp_socket_ipv4(!self.privilege_mode.is_unprivileged())?;
        socket.bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0))?;
        let sent_at = Instant::now();
        let deadline = request
            .timeout
            .filter(|timeout| !timeout.is_zero())
            .map(|timeout| sent_at + timeout);
        let expected = echo.packet().len();
        let target = SocketAddr::new(IpAddr::V4(request.target), 0);
        let sent = socket.send_to(echo.packet(), target)?;
        if sent != expected {
            return Err(Error::ShortWrite { expected, sent });
        }
        self.await_reply(&mut socket, request, sent_at, deadline)
    }

    fn await_reply(
        &self,
        socket: &mut S,
        request: &ProbeRequest,
        sent_at: Instant,
        deadline: Option<Instant>,
    ) -> Result<ProbeOutcome> {
        let mut buf = [0_u8; MAX_RECV_PACKET_SIZE];
        loop {
            let remaining = match deadline {
                Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                    Some(remaining) if !remaining.is_zero() => Some(remaining),
                    _ => return Ok(ProbeOutcome::Timeout),
                },
                None => None,
            };
            if !socket.is_readable(remaining)? {
                continue;
            }
            let (bytes_read, from) = socket.recv_from(&mut buf)?;
            let rtt = sent_at.elapsed();
            let datagram = ipv4::parse_datagram(&buf[..bytes_read])?;
            let addr = datagram
                .src()
                .or(match from {
                    Some(SocketAddr::V4(from)) => Some(*from.ip()),
                    _ => None,
                })
                .unwrap_or(request.target);
            if let Some(outcome) = self.classify(request, datagram, addr, rtt) {
                return Ok(outcome);
            }
            tracing::debug!(?datagram, "ignoring datagram not matching probe");
        }
    }

    /// Attribute a datagram to `request`, returning `None` if it belongs to something else.
    fn classify(
        &self,
        request: &ProbeRequest,
        datagram: Datagram,
        addr: Ipv4Addr,
        rtt: Duration,
    ) -> Option<ProbeOutcome> {
        let any = self.reply_matching == ReplyMatching::FirstDatagram;
        match datagram {
            Datagram::EchoReply {
                identifier,
                sequence,
                ..
            } if any
                || (addr == request.target && self.is_ours(request, identifier, sequence)) =>
            {
                Some(ProbeOutcome::Success(EchoReply {
                    addr,
                    sequence: Sequence(sequence),
                    rtt,
                }))
            }
            Datagram::Error {
                icmp_type,
                icmp_code,
                original,
                ..
            } if any
                || original.is_some_and(|(identifier, sequence)| {
                    self.is_ours(request, identifier, sequence)
                }) =>
            {
                Some(ProbeOutcome::ProtocolMismatch {
                    addr,
                    icmp_type,
                    icmp_code,
                })
            }
            Datagram::Other {
                icmp_type,
                icmp_code,
                ..
            } if any => Some(ProbeOutcome::ProtocolMismatch {
                addr,
                icmp_type,
                icmp_code,
            }),
            _ => None,
        }
    }

    /// Unprivileged sockets on Linux replace the identifier with the local port, so only the
    /// sequence can be checked in that mode.
    fn is_ours(&self, request: &ProbeRequest, identifier: u16, sequence: u16) -> bool {
        sequence == request.sequence.0
            && (self.privilege_mode.is_unprivileged() || identifier == request.identifier.0)
    }
}

impl<S: Socket> Prober for EchoProber<S> {
    #[instrument(skip(self), level = "trace")]
    fn probe(&self, target: Ipv4Addr, timeout: Option<Duration>) -> ProbeOutcome {
        let request = ProbeRequest::new(target, self.identifier, self.sequencer.next(), timeout);
        let outcome = self
            .dispatch(&request)
            .unwrap_or_else(ProbeOutcome::TransportError);
        tracing::debug!(sequence = request.sequence.0, %outcome);
        outcome
    }
}
