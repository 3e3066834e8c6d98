use crate::buffer::Buffer;
use crate::error::Result;
use crate::fmt_payload;
use std::fmt::{Debug, Display, Formatter};

/// The type of `ICMPv4` packet.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    EchoRequest,
    TimeExceeded,
    Other(u8),
}

impl IcmpType {
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::EchoReply => 0,
            Self::DestinationUnreachable => 3,
            Self::EchoRequest => 8,
            Self::TimeExceeded => 11,
            Self::Other(id) => *id,
        }
    }
}

impl From<u8> for IcmpType {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::EchoReply,
            3 => Self::DestinationUnreachable,
            8 => Self::EchoRequest,
            11 => Self::TimeExceeded,
            id => Self::Other(id),
        }
    }
}

impl Display for IcmpType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EchoReply => write!(f, "echo reply"),
            Self::DestinationUnreachable => write!(f, "destination unreachable"),
            Self::EchoRequest => write!(f, "echo request"),
            Self::TimeExceeded => write!(f, "time exceeded"),
            Self::Other(id) => write!(f, "type {id}"),
        }
    }
}

/// The `ICMPv4` code.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

impl Display for IcmpCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "code {}", self.0)
    }
}

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;

/// The fixed `ICMPv4` header: type, code, checksum and four message specific bytes.
const HEADER_SIZE: usize = 8;

/// Represents a generic `ICMPv4` packet.
///
/// Only the fields common to every `ICMPv4` message are exposed; use the view for a specific
/// message type (see [`echo`] and [`error`]) to access the rest.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct IcmpPacket<'a> {
    buf: Buffer<'a>,
}

impl<'a> IcmpPacket<'a> {
    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Ok(Self {
            buf: Buffer::immutable("IcmpPacket", packet, Self::minimum_packet_size())?,
        })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        HEADER_SIZE
    }

    #[must_use]
    pub fn get_icmp_type(&self) -> IcmpType {
        IcmpType::from(self.buf.read(TYPE_OFFSET))
    }

    #[must_use]
    pub fn get_icmp_code(&self) -> IcmpCode {
        IcmpCode::from(self.buf.read(CODE_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.buf.tail(HEADER_SIZE)
    }
}

impl Debug for IcmpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpPacket")
            .field("icmp_type", &self.get_icmp_type())
            .field("icmp_code", &self.get_icmp_code())
            .field("checksum", &self.get_checksum())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}

/// `EchoRequest` and `EchoReply` messages, which share a layout.
pub mod echo {
    use super::{IcmpCode, IcmpType, CHECKSUM_OFFSET, CODE_OFFSET, HEADER_SIZE, TYPE_OFFSET};
    use crate::buffer::Buffer;
    use crate::error::Result;
    use crate::fmt_payload;
    use std::fmt::{Debug, Formatter};

    const IDENTIFIER_OFFSET: usize = 4;
    const SEQUENCE_OFFSET: usize = 6;

    /// Represents an `ICMPv4` echo request or echo reply packet.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor
    /// methods take and return data in host byte order, converting as necessary for the given
    /// architecture.
    pub struct EchoPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> EchoPacket<'a> {
        pub fn new(packet: &'a mut [u8]) -> Result<Self> {
            Ok(Self {
                buf: Buffer::mutable("EchoPacket", packet, Self::minimum_packet_size())?,
            })
        }

        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            Ok(Self {
                buf: Buffer::immutable("EchoPacket", packet, Self::minimum_packet_size())?,
            })
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            HEADER_SIZE
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
        }

        #[must_use]
        pub fn get_identifier(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(IDENTIFIER_OFFSET))
        }

        #[must_use]
        pub fn get_sequence(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(SEQUENCE_OFFSET))
        }

        pub fn set_icmp_type(&mut self, val: IcmpType) {
            *self.buf.write(TYPE_OFFSET) = val.id();
        }

        pub fn set_icmp_code(&mut self, val: IcmpCode) {
            *self.buf.write(CODE_OFFSET) = val.0;
        }

        pub fn set_checksum(&mut self, val: u16) {
            self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
        }

        pub fn set_identifier(&mut self, val: u16) {
            self.buf.set_bytes(IDENTIFIER_OFFSET, val.to_be_bytes());
        }

        pub fn set_sequence(&mut self, val: u16) {
            self.buf.set_bytes(SEQUENCE_OFFSET, val.to_be_bytes());
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        #[must_use]
        pub fn payload(&self) -> &[u8] {
            self.buf.tail(HEADER_SIZE)
        }
    }

    impl Debug for EchoPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("EchoPacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("identifier", &self.get_identifier())
                .field("sequence", &self.get_sequence())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }
}

/// `TimeExceeded` and `DestinationUnreachable` messages.
///
/// Both carry the IP header and leading bytes of the datagram which triggered them after the
/// fixed header.
pub mod error {
    use super::{IcmpCode, IcmpType, CHECKSUM_OFFSET, CODE_OFFSET, HEADER_SIZE, TYPE_OFFSET};
    use crate::buffer::Buffer;
    use crate::error::Result;
    use crate::fmt_payload;
    use std::fmt::{Debug, Formatter};

    const NEXT_HOP_MTU_OFFSET: usize = 6;

    /// Represents an `ICMPv4` error message.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor
    /// methods take and return data in host byte order, converting as necessary for the given
    /// architecture.
    pub struct IcmpErrorPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> IcmpErrorPacket<'a> {
        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            Ok(Self {
                buf: Buffer::immutable("IcmpErrorPacket", packet, Self::minimum_packet_size())?,
            })
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            HEADER_SIZE
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
        }

        /// Only meaningful for `DestinationUnreachable` with code 4 (fragmentation needed).
        #[must_use]
        pub fn get_next_hop_mtu(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(NEXT_HOP_MTU_OFFSET))
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        /// The quoted original datagram, starting with its IP header.
        #[must_use]
        pub fn payload(&self) -> &[u8] {
            self.buf.tail(HEADER_SIZE)
        }
    }

    impl Debug for IcmpErrorPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("IcmpErrorPacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("next_hop_mtu", &self.get_next_hop_mtu())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }
}
