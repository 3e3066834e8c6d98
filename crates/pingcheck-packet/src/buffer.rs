use crate::error::{Error, Result};

/// Borrowed packet bytes, either read-only (a view) or writable.
#[derive(Debug)]
pub enum Buffer<'a> {
    Immutable(&'a [u8]),
    Mutable(&'a mut [u8]),
}

impl<'a> Buffer<'a> {
    /// Wrap a writable slice, checking it can hold at least `minimum` bytes.
    pub fn mutable(name: &str, packet: &'a mut [u8], minimum: usize) -> Result<Self> {
        check_len(name, packet.len(), minimum)?;
        Ok(Self::Mutable(packet))
    }

    /// Wrap a read-only slice, checking it can hold at least `minimum` bytes.
    pub fn immutable(name: &str, packet: &'a [u8], minimum: usize) -> Result<Self> {
        check_len(name, packet.len(), minimum)?;
        Ok(Self::Immutable(packet))
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Immutable(packet) => packet,
            Buffer::Mutable(packet) => packet,
        }
    }

    /// Panics if the buffer is read-only.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        match self {
            Buffer::Immutable(_) => panic!("write operation called on readonly buffer"),
            Buffer::Mutable(packet) => packet,
        }
    }

    pub fn read(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    pub fn write(&mut self, offset: usize) -> &mut u8 {
        &mut self.as_slice_mut()[offset]
    }

    /// Read `N` bytes starting at `offset`.
    pub fn get_bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        core::array::from_fn(|i| self.read(offset + i))
    }

    /// Write `N` bytes starting at `offset`.
    pub fn set_bytes<const N: usize>(&mut self, offset: usize, bytes: [u8; N]) {
        self.as_slice_mut()[offset..offset + N].copy_from_slice(&bytes);
    }

    /// The bytes from `offset` to the end of the buffer, empty if `offset` is out of range.
    pub fn tail(&self, offset: usize) -> &[u8] {
        self.as_slice().get(offset..).unwrap_or_default()
    }
}

fn check_len(name: &str, provided: usize, minimum: usize) -> Result<()> {
    if provided >= minimum {
        Ok(())
    } else {
        Err(Error::InsufficientPacketBuffer(
            String::from(name),
            minimum,
            provided,
        ))
    }
}
