use crate::block::{BlockTransfer, DeviceAddress};

/// Abstracts the control interface of an open bus device.
///
/// Implementors own the OS resource (or a stand-in for it) and expose the
/// two control calls a block transfer needs. All protocol handling (length
/// checks, buffer layout, result validation) lives above this trait, so a
/// deterministic fake is enough to exercise it.
///
/// The selected address is state of the transport, shared by every
/// transfer that follows. Callers must keep select and transfer back to
/// back; nothing here serializes concurrent users.
pub trait Transport {
    /// Error type reported by the control calls.
    type Error: core::fmt::Debug;

    /// Direct subsequent transfers at `address`.
    fn select_address(
        &mut self,
        address: DeviceAddress,
    ) -> Result<(), Self::Error>;

    /// Perform one block transfer against the selected address.
    ///
    /// On success the transport has updated the transfer's data buffer in
    /// place: the payload for reads, and in both directions the length byte
    /// with the number of bytes actually moved.
    fn block_transfer(
        &mut self,
        transfer: &mut BlockTransfer,
    ) -> Result<(), Self::Error>;

    /// Release the underlying resource.
    fn close(self) -> Result<(), Self::Error>;
}
