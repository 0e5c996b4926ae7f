use heapless::Vec;
use tracing::debug;

use crate::block::{DeviceAddress, MAX_BLOCK_LEN};
use crate::codec;
use crate::error::BusError;
use crate::transport::Transport;

/// Handle owning an open bus device.
///
/// Every read and write selects the device address and then performs one
/// block transfer, so operations on a handle must not interleave. `&mut self`
/// enforces that within one owner; sharing a handle across threads needs an
/// external lock held for the whole call.
///
/// The transport is released by [`close`](Self::close). After that, every
/// operation returns [`BusError::Closed`] without reaching the transport.
/// Dropping an unclosed handle drops the transport, which releases the
/// resource without reporting errors.
pub struct BusHandle<T: Transport> {
    transport: Option<T>,
}

impl<T: Transport> BusHandle<T> {
    /// Wrap an already-open transport.
    pub fn new(transport: T) -> Self {
        Self { transport: Some(transport) }
    }

    /// Returns `false` once the handle has been closed.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Read `dst.len()` bytes from register `offset` of the device at
    /// `address`.
    ///
    /// `dst` must hold between 1 and [`MAX_BLOCK_LEN`] bytes. On error its
    /// contents are unspecified.
    pub fn read(
        &mut self,
        dst: &mut [u8],
        address: u8,
        offset: u8,
    ) -> Result<(), BusError<T::Error>> {
        let transport = self.open_transport()?;
        codec::read_block(transport, dst, DeviceAddress(address), offset)
    }

    /// Write `src` to register `offset` of the device at `address`.
    ///
    /// `src` must hold between 1 and [`MAX_BLOCK_LEN`] bytes.
    pub fn write(
        &mut self,
        src: &[u8],
        address: u8,
        offset: u8,
    ) -> Result<(), BusError<T::Error>> {
        let transport = self.open_transport()?;
        codec::write_block(transport, src, DeviceAddress(address), offset)
    }

    /// Read `len` bytes into a new buffer.
    pub fn read_vec(
        &mut self,
        len: usize,
        address: u8,
        offset: u8,
    ) -> Result<Vec<u8, MAX_BLOCK_LEN>, BusError<T::Error>> {
        let mut buf = [0u8; MAX_BLOCK_LEN];
        let dst = buf
            .get_mut(..len)
            .ok_or(BusError::InvalidArgument { len, max: MAX_BLOCK_LEN })?;
        self.read(dst, address, offset)?;

        Vec::from_slice(&buf[..len])
            .map_err(|_| BusError::InvalidArgument { len, max: MAX_BLOCK_LEN })
    }

    /// Release the transport.
    ///
    /// Closing twice returns [`BusError::Closed`] the second time; the
    /// transport is released at most once either way.
    pub fn close(&mut self) -> Result<(), BusError<T::Error>> {
        let transport = self.transport.take().ok_or(BusError::Closed)?;
        debug!("closing bus handle");
        transport.close().map_err(BusError::Close)
    }

    fn open_transport(&mut self) -> Result<&mut T, BusError<T::Error>> {
        self.transport.as_mut().ok_or(BusError::Closed)
    }
}

impl<T: Transport + core::fmt::Debug> core::fmt::Debug for BusHandle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BusHandle").field("transport", &self.transport).finish()
    }
}
