use crate::block::{DeviceAddress, Direction};

/// Errors that can occur during bus operations.
///
/// `E` is the error type of the underlying [`Transport`](crate::Transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E> {
    /// The bus device could not be opened.
    Open(E),
    /// The transport rejected the target device address.
    AddressSelect { address: DeviceAddress, source: E },
    /// The physical transfer failed (NACK, bus error, driver timeout).
    Transfer { direction: Direction, source: E },
    /// The transfer completed but moved `got` bytes instead of `wanted`.
    ShortTransfer { direction: Direction, wanted: usize, got: usize },
    /// A request of `len` bytes is outside `1..=max`.
    InvalidArgument { len: usize, max: usize },
    /// Releasing the bus device failed.
    Close(E),
    /// The handle has already been closed.
    Closed,
}

/// Stage of a bus operation at which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Open,
    Select,
    Transfer,
    Validate,
    Close,
}

impl<E> BusError<E> {
    pub fn phase(&self) -> Phase {
        match self {
            BusError::Open(_) => Phase::Open,
            BusError::AddressSelect { .. } => Phase::Select,
            BusError::Transfer { .. } => Phase::Transfer,
            BusError::ShortTransfer { .. }
            | BusError::InvalidArgument { .. } => Phase::Validate,
            BusError::Close(_) | BusError::Closed => Phase::Close,
        }
    }

    /// True for failures raised by the bus itself rather than by how it was
    /// configured or used. These are the ones worth retrying.
    pub fn is_bus_fault(&self) -> bool {
        matches!(
            self,
            BusError::Transfer { .. } | BusError::ShortTransfer { .. }
        )
    }

    /// The transport error carried by this variant, if any.
    pub fn transport_error(&self) -> Option<&E> {
        match self {
            BusError::Open(e)
            | BusError::Close(e)
            | BusError::AddressSelect { source: e, .. }
            | BusError::Transfer { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl<E: core::fmt::Display> core::fmt::Display for BusError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::Open(err) => write!(f, "failed to open bus: {}", err),
            BusError::AddressSelect { address, source } => {
                write!(f, "failed to select device {}: {}", address, source)
            }
            BusError::Transfer { direction, source } => {
                write!(f, "block {} failed: {}", direction, source)
            }
            BusError::ShortTransfer { direction, wanted, got } => write!(
                f,
                "wanted {} of {} bytes, actually transferred {}",
                direction, wanted, got
            ),
            BusError::InvalidArgument { len, max } => write!(
                f,
                "block length {} is outside the supported range 1..={}",
                len, max
            ),
            BusError::Close(err) => write!(f, "failed to close bus: {}", err),
            BusError::Closed => write!(f, "bus handle is closed"),
        }
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for BusError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.transport_error()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
