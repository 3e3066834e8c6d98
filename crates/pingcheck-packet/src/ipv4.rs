use crate::buffer::Buffer;
use crate::error::Result;
use crate::{fmt_payload, IpProtocol};
use std::fmt::{Debug, Formatter};
use std::net::Ipv4Addr;

const VERSION_OFFSET: usize = 0;
const IHL_OFFSET: usize = 0;
const TOTAL_LENGTH_OFFSET: usize = 2;
const IDENTIFICATION_OFFSET: usize = 4;
const TIME_TO_LIVE_OFFSET: usize = 8;
const PROTOCOL_OFFSET: usize = 9;
const CHECKSUM_OFFSET: usize = 10;
const SOURCE_OFFSET: usize = 12;
const DESTINATION_OFFSET: usize = 16;

/// Represents an `IPv4` Packet.
///
/// Only the fields needed to locate and attribute an encapsulated `ICMPv4` message are exposed.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct Ipv4Packet<'a> {
    buf: Buffer<'a>,
}

impl<'a> Ipv4Packet<'a> {
    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Ok(Self {
            buf: Buffer::immutable("Ipv4Packet", packet, Self::minimum_packet_size())?,
        })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        20
    }

    /// Does `bytes` look like the start of an `IPv4` packet?
    ///
    /// Used to tell apart sockets which deliver the IP header from those which deliver the bare
    /// `ICMP` message; an `ICMPv4` message never starts with `0x4_` as no type in that range is
    /// assigned.
    #[must_use]
    pub fn has_ipv4_header(bytes: &[u8]) -> bool {
        bytes.len() >= Self::minimum_packet_size() && bytes[VERSION_OFFSET] >> 4 == 4
    }

    #[must_use]
    pub fn get_version(&self) -> u8 {
        (self.buf.read(VERSION_OFFSET) & 0xf0) >> 4
    }

    #[must_use]
    pub fn get_header_length(&self) -> u8 {
        self.buf.read(IHL_OFFSET) & 0xf
    }

    #[must_use]
    pub fn get_total_length(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(TOTAL_LENGTH_OFFSET))
    }

    #[must_use]
    pub fn get_identification(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(IDENTIFICATION_OFFSET))
    }

    #[must_use]
    pub fn get_ttl(&self) -> u8 {
        self.buf.read(TIME_TO_LIVE_OFFSET)
    }

    #[must_use]
    pub fn get_protocol(&self) -> IpProtocol {
        IpProtocol::from(self.buf.read(PROTOCOL_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    #[must_use]
    pub fn get_source(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes(SOURCE_OFFSET))
    }

    #[must_use]
    pub fn get_destination(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes(DESTINATION_OFFSET))
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// The bytes following the header, including any options.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.buf.tail(self.header_size())
    }

    fn header_size(&self) -> usize {
        (usize::from(self.get_header_length()) * 4).max(Self::minimum_packet_size())
    }
}

impl Debug for Ipv4Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ipv4Packet")
            .field("version", &self.get_version())
            .field("header_length", &self.get_header_length())
            .field("total_length", &self.get_total_length())
            .field("identification", &self.get_identification())
            .field("ttl", &self.get_ttl())
            .field("protocol", &self.get_protocol())
            .field("checksum", &self.get_checksum())
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
