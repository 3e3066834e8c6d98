use crate::error::IoResult as Result;
use std::net::SocketAddr;
use std::time::Duration;

/// An `ICMPv4` socket used for a single probe.
///
/// The socket is closed when dropped.
#[cfg_attr(test, mockall::automock)]
pub trait Socket
where
    Self: Sized,
{
    /// Create an IPv4 socket for sending `ICMP` echo requests and receiving the replies.
    ///
    /// A `raw` socket requires privileges and delivers the IP header with each datagram.
    fn new_icmp_socket_ipv4(raw: bool) -> Result<Self>;
    fn bind(&mut self, address: SocketAddr) -> Result<()>;
    /// Returns the number of bytes sent.
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize>;
    /// Returns true if the socket becomes readable before the timeout, false otherwise.
    ///
    /// A `None` timeout waits indefinitely.
    fn is_readable(&mut self, timeout: Option<Duration>) -> Result<bool>;
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, Option<SocketAddr>)>;
}

#[cfg(test)]
pub mod tests {
    #[macro_export]
    macro_rules! mocket_recv_from {
        ($packet: expr, $addr: expr) => {
            move |buf: &mut [u8]| -> IoResult<(usize, Option<SocketAddr>)> {
                buf[..$packet.len()].copy_from_slice(&$packet);
                Ok(($packet.len(), Some($addr)))
            }
        };
    }
}
