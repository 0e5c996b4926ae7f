//! Block read/write on top of a [`Transport`].
//!
//! Each operation builds a fresh [`BlockTransfer`], selects the device,
//! runs the transfer, and checks the length byte the transport hands back. A transfer
//! either moves exactly the requested number of bytes or fails; there is no
//! partial result.

use tracing::{trace, warn};

use crate::block::{BlockTransfer, DeviceAddress, MAX_BLOCK_LEN};
use crate::error::BusError;
use crate::transport::Transport;

/// Read `dst.len()` bytes from register `offset` of the device at `address`.
///
/// On error the contents of `dst` are unspecified.
pub fn read_block<T: Transport>(
    transport: &mut T,
    dst: &mut [u8],
    address: DeviceAddress,
    offset: u8,
) -> Result<(), BusError<T::Error>> {
    let len = dst.len();
    let mut transfer =
        BlockTransfer::read(offset, len).ok_or_else(|| invalid_len(len))?;
    select(transport, address)?;
    run(transport, &mut transfer)?;
    check_transferred(&transfer)?;

    dst.copy_from_slice(transfer.data().payload(len));
    Ok(())
}

/// Write `src` to register `offset` of the device at `address`.
pub fn write_block<T: Transport>(
    transport: &mut T,
    src: &[u8],
    address: DeviceAddress,
    offset: u8,
) -> Result<(), BusError<T::Error>> {
    let mut transfer = BlockTransfer::write(offset, src)
        .ok_or_else(|| invalid_len(src.len()))?;
    select(transport, address)?;
    run(transport, &mut transfer)?;
    check_transferred(&transfer)
}

// Descriptors refuse lengths outside `1..=MAX_BLOCK_LEN`; the kernel
// rejects empty block transfers too.
fn invalid_len<E>(len: usize) -> BusError<E> {
    BusError::InvalidArgument { len, max: MAX_BLOCK_LEN }
}

// Re-selected before every transfer; the transport's current address may
// have been changed by an unrelated operation in between.
fn select<T: Transport>(
    transport: &mut T,
    address: DeviceAddress,
) -> Result<(), BusError<T::Error>> {
    trace!(%address, "selecting device");
    transport
        .select_address(address)
        .map_err(|source| BusError::AddressSelect { address, source })
}

fn run<T: Transport>(
    transport: &mut T,
    transfer: &mut BlockTransfer,
) -> Result<(), BusError<T::Error>> {
    let direction = transfer.direction();
    trace!(
        %direction,
        command = transfer.command(),
        len = transfer.requested_len(),
        "block transfer"
    );
    transport
        .block_transfer(transfer)
        .map_err(|source| BusError::Transfer { direction, source })
}

fn check_transferred<E>(transfer: &BlockTransfer) -> Result<(), BusError<E>> {
    let wanted = transfer.requested_len();
    let got = transfer.transferred_len();
    if wanted != got {
        let direction = transfer.direction();
        warn!(%direction, wanted, got, "short block transfer");
        return Err(BusError::ShortTransfer { direction, wanted, got });
    }
    Ok(())
}
