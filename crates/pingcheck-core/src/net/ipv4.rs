use crate::error::Result;
use crate::types::{Sequence, TraceId};
use pingcheck_packet::checksum::icmp_ipv4_checksum;
use pingcheck_packet::icmpv4::echo::EchoPacket;
use pingcheck_packet::icmpv4::error::IcmpErrorPacket;
use pingcheck_packet::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
use pingcheck_packet::ipv4::Ipv4Packet;
use pingcheck_packet::IpProtocol;
use std::net::Ipv4Addr;

/// Large enough for an `IPv4` header with options and an `ICMP` error quoting a full original
/// header and echo request.
pub const MAX_RECV_PACKET_SIZE: usize = 1024;

/// Build an `ICMP` echo request with an empty payload.
pub fn make_echo_request(
    buf: &mut [u8],
    identifier: TraceId,
    sequence: Sequence,
) -> Result<EchoPacket<'_>> {
    let mut echo = EchoPacket::new(buf)?;
    echo.set_icmp_type(IcmpType::EchoRequest);
    echo.set_icmp_code(IcmpCode(0));
    echo.set_identifier(identifier.0);
    echo.set_sequence(sequence.0);
    echo.set_checksum(icmp_ipv4_checksum(echo.packet()));
    Ok(echo)
}

/// An inbound `ICMP` datagram, reduced to what is needed to attribute it to a probe.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Datagram {
    EchoReply {
        src: Option<Ipv4Addr>,
        identifier: u16,
        sequence: u16,
    },
    /// `TimeExceeded` or `DestinationUnreachable`.
    ///
    /// `original` holds the identifier and sequence of the quoted datagram if it was an echo
    /// request.
    Error {
        src: Option<Ipv4Addr>,
        icmp_type: IcmpType,
        icmp_code: IcmpCode,
        original: Option<(u16, u16)>,
    },
    Other {
        src: Option<Ipv4Addr>,
        icmp_type: IcmpType,
        icmp_code: IcmpCode,
    },
}

impl Datagram {
    /// The sender, if the datagram carried an IP header.
    #[must_use]
    pub const fn src(&self) -> Option<Ipv4Addr> {
        match self {
            Self::EchoReply { src, .. } | Self::Error { src, .. } | Self::Other { src, .. } => *src,
        }
    }
}

/// Parse a datagram read from an `ICMPv4` socket.
///
/// Raw sockets (and datagram sockets on some platforms) deliver the IP header, others deliver the
/// bare `ICMP` message; both are accepted.
pub fn parse_datagram(bytes: &[u8]) -> Result<Datagram> {
    let (src, icmp_bytes) = if Ipv4Packet::has_ipv4_header(bytes) {
        let ipv4 = Ipv4Packet::new_view(bytes)?;
        (Some(ipv4.get_source()), &bytes[bytes.len() - ipv4.payload().len()..])
    } else {
        (None, bytes)
    };
    let icmp = IcmpPacket::new_view(icmp_bytes)?;
    let icmp_type = icmp.get_icmp_type();
    let icmp_code = icmp.get_icmp_code();
    Ok(match icmp_type {
        IcmpType::EchoReply => {
            let echo = EchoPacket::new_view(icmp_bytes)?;
            Datagram::EchoReply {
                src,
                identifier: echo.get_identifier(),
                sequence: echo.get_sequence(),
            }
        }
        IcmpType::TimeExceeded | IcmpType::DestinationUnreachable => {
            let error = IcmpErrorPacket::new_view(icmp_bytes)?;
            Datagram::Error {
                src,
                icmp_type,
                icmp_code,
                original: quoted_echo_request(error.payload()),
            }
        }
        _ => Datagram::Other {
            src,
            icmp_type,
            icmp_code,
        },
    })
}

/// Extract the identifier and sequence of an echo request quoted inside an `ICMP` error.
fn quoted_echo_request(original: &[u8]) -> Option<(u16, u16)> {
    let ipv4 = Ipv4Packet::new_view(original).ok()?;
    if ipv4.get_protocol() != IpProtocol::Icmp {
        return None;
    }
    let echo = EchoPacket::new_view(ipv4.payload()).ok()?;
    (echo.get_icmp_type() == IcmpType::EchoRequest)
        .then(|| (echo.get_identifier(), echo.get_sequence()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use hex_literal::hex;

    #[test]
    fn test_make_echo_request() -> anyhow::Result<()> {
        let mut buf = [0_u8; EchoPacket::minimum_packet_size()];
        let echo = make_echo_request(&mut buf, TraceId(1234), Sequence(10))?;
        assert_eq!(&hex!("08 00 f3 23 04 d2 00 0a"), echo.packet());
        Ok(())
    }

    #[test]
    fn test_make_echo_request_buffer_too_small() {
        let mut buf = [0_u8; 4];
        let err = make_echo_request(&mut buf, TraceId(1), Sequence(1)).unwrap_err();
        assert!(matches!(err, Error::PacketError(_)));
    }

    #[test]
    fn test_parse_echo_reply_with_ip_header() -> anyhow::Result<()> {
        let mut buf = [0_u8; 84];
        buf[..28].copy_from_slice(&hex!(
            "45 20 00 54 00 00 00 00 3b 01 50 02 8e fb de ce c0 a8 01 15"
            "00 00 09 0f 75 d7 81 19"
        ));
        let datagram = parse_datagram(&buf)?;
        assert_eq!(
            Datagram::EchoReply {
                src: Some(Ipv4Addr::new(142, 251, 222, 206)),
                identifier: 30167,
                sequence: 33049,
            },
            datagram
        );
        Ok(())
    }

    #[test]
    fn test_parse_bare_echo_reply() -> anyhow::Result<()> {
        let datagram = parse_datagram(&hex!("00 00 09 0f 75 d7 81 19"))?;
        assert_eq!(
            Datagram::EchoReply {
                src: None,
                identifier: 30167,
                sequence: 33049,
            },
            datagram
        );
        Ok(())
    }

    #[test]
    fn test_parse_time_exceeded() -> anyhow::Result<()> {
        let buf = hex!(
            "45 00 00 38 00 00 00 00 ff 01 00 00 0a 00 00 01 c0 a8 01 15"
            "0b 00 f4 ff 00 00 00 00"
            "45 00 00 1c 00 00 40 00 01 01 00 00 c0 a8 01 15 08 08 08 08"
            "08 00 f3 23 04 d2 00 0a"
        );
        let datagram = parse_datagram(&buf)?;
        assert_eq!(
            Datagram::Error {
                src: Some(Ipv4Addr::new(10, 0, 0, 1)),
                icmp_type: IcmpType::TimeExceeded,
                icmp_code: IcmpCode(0),
                original: Some((1234, 10)),
            },
            datagram
        );
        Ok(())
    }

    #[test]
    fn test_parse_destination_unreachable_quoting_udp() -> anyhow::Result<()> {
        let buf = hex!(
            "03 03 00 00 00 00 00 00"
            "45 00 00 1c 00 00 40 00 01 11 00 00 c0 a8 01 15 08 08 08 08"
            "82 9a 82 9b 00 08 00 00"
        );
        let datagram = parse_datagram(&buf)?;
        assert_eq!(
            Datagram::Error {
                src: None,
                icmp_type: IcmpType::DestinationUnreachable,
                icmp_code: IcmpCode(3),
                original: None,
            },
            datagram
        );
        Ok(())
    }

    #[test]
    fn test_parse_other() -> anyhow::Result<()> {
        let datagram = parse_datagram(&hex!("08 00 f3 23 04 d2 00 0a"))?;
        assert_eq!(
            Datagram::Other {
                src: None,
                icmp_type: IcmpType::EchoRequest,
                icmp_code: IcmpCode(0),
            },
            datagram
        );
        Ok(())
    }

    #[test]
    fn test_parse_truncated() {
        let err = parse_datagram(&hex!("00 00 09")).unwrap_err();
        assert!(matches!(err, Error::PacketError(_)));
    }
}
