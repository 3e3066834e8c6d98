use crate::error::{IoError, IoOperation, IoResult};
use crate::net::socket::Socket;
use itertools::Itertools;
use nix::sys::select::FdSet;
use nix::sys::time::{TimeVal, TimeValLike};
use nix::Error;
use socket2::{Domain, Protocol, SockAddr, Type};
use std::io;
use std::net::SocketAddr;
use std::os::fd::AsFd;
use std::time::Duration;
use tracing::instrument;

/// An `ICMPv4` socket.
pub struct SocketImpl {
    inner: socket2::Socket,
}

impl SocketImpl {
    fn new(ty: Type) -> IoResult<Self> {
        Ok(Self {
            inner: socket2::Socket::new(Domain::IPV4, ty, Some(Protocol::ICMPV4))
                .map_err(|err| IoError::Other(err, IoOperation::NewSocket))?,
        })
    }
}

impl Socket for SocketImpl {
    #[instrument(level = "trace")]
    fn new_icmp_socket_ipv4(raw: bool) -> IoResult<Self> {
        if raw {
            Self::new(Type::RAW)
        } else {
            Self::new(Type::DGRAM)
        }
    }
    #[instrument(skip(self), level = "trace")]
    fn bind(&mut self, address: SocketAddr) -> IoResult<()> {
        self.inner
            .bind(&SockAddr::from(address))
            .map_err(|err| IoError::Bind(err, address))
    }
    #[instrument(skip(self, buf), level = "trace")]
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> IoResult<usize> {
        tracing::trace!(buf = format!("{:02x?}", buf.iter().format(" ")), ?addr);
        self.inner
            .send_to(buf, &SockAddr::from(addr))
            .map_err(|err| IoError::SendTo(err, addr))
    }
    #[instrument(skip(self), level = "trace")]
    fn is_readable(&mut self, timeout: Option<Duration>) -> IoResult<bool> {
        let mut read = FdSet::new();
        read.insert(self.inner.as_fd());
        let mut timeout = timeout.map(|timeout| {
            TimeVal::microseconds(i64::try_from(timeout.as_micros()).unwrap_or(i64::MAX))
        });
        let readable = nix::sys::select::select(None, Some(&mut read), None, None, timeout.as_mut());
        match readable {
            Ok(readable) => Ok(readable == 1),
            Err(Error::EINTR) => Ok(false),
            Err(err) => Err(IoError::Other(io::Error::from(err), IoOperation::Select)),
        }
    }
    #[instrument(skip(self, buf), level = "trace")]
    fn recv_from(&mut self, buf: &mut [u8]) -> IoResult<(usize, Option<SocketAddr>)> {
        let (bytes_read, addr) = self
            .inner
            .recv_from_into_buf(buf)
            .map_err(|err| IoError::Other(err, IoOperation::RecvFrom))?;
        tracing::trace!(
            buf = format!("{:02x?}", buf[..bytes_read].iter().format(" ")),
            bytes_read,
            ?addr
        );
        Ok((bytes_read, addr))
    }
}

/// An extension trait to allow `recv_from` method which writes to a `&mut [u8]`.
///
/// This is required for `socket2::Socket` which [does not currently provide] this method.
///
/// [does not currently provide]: https://github.com/rust-lang/socket2/issues/223
trait RecvFrom {
    fn recv_from_into_buf(&self, buf: &mut [u8]) -> io::Result<(usize, Option<SocketAddr>)>;
}

impl RecvFrom for socket2::Socket {
    // Safety: `recv_from` never writes uninitialised bytes into the buffer, so viewing the
    // initialised `[u8]` as `[MaybeUninit<u8>]` is sound.
    #[allow(unsafe_code)]
    fn recv_from_into_buf(&self, buf: &mut [u8]) -> io::Result<(usize, Option<SocketAddr>)> {
        let buf = unsafe {
            &mut *(std::ptr::from_mut::<[u8]>(buf) as *mut [std::mem::MaybeUninit<u8>])
        };
        self.recv_from(buf)
            .map(|(size, addr)| (size, addr.as_socket()))
    }
}
