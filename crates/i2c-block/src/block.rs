//! Wire-format types for SMBus "I2C block data" transfers.
//!
//! A block transfer moves up to [`MAX_BLOCK_LEN`] bytes to or from one
//! register of one device. The payload travels in a [`BlockData`] buffer
//! laid out exactly like the kernel's `i2c_smbus_data` union:
//!
//! ```text
//!  byte 0      bytes 1..=len         remaining bytes
//! ┌────────┬─────────────────────┬──────────────────┐
//! │  len   │       payload       │      unused      │
//! └────────┴─────────────────────┴──────────────────┘
//! ```
//!
//! The length byte is written by the caller to request a size and is read
//! back after the transfer to confirm how many bytes actually moved.

/// Largest payload a single block transfer can carry (`I2C_SMBUS_BLOCK_MAX`).
pub const MAX_BLOCK_LEN: usize = 32;

/// Size of the transfer buffer: length byte, payload, and one spare byte.
pub const BLOCK_DATA_LEN: usize = MAX_BLOCK_LEN + 2;

/// Transaction type tag for "I2C block data" (`I2C_SMBUS_I2C_BLOCK_DATA`).
pub const I2C_BLOCK_DATA: u32 = 8;

/// Bus address of a peripheral, normally 7 bits wide.
///
/// No range check happens here; the transport decides which addresses it
/// accepts and reports a rejection through its own error type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
)]
#[display("{_0:#04x}")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(pub u8);

impl DeviceAddress {
    /// Highest address reachable with 7-bit addressing.
    pub const MAX_7BIT: u8 = 0x7f;

    pub const fn get(self) -> u8 {
        self.0
    }

    /// True if the address fits in 7 bits.
    pub const fn is_7bit(self) -> bool {
        self.0 <= Self::MAX_7BIT
    }
}

/// Direction of a block transfer, encoded as the SMBus `read_write` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    #[display("write")]
    Write = 0,
    #[display("read")]
    Read = 1,
}

impl Direction {
    /// Value of the `read_write` field in the control call.
    pub const fn flag(self) -> u8 {
        self as u8
    }
}

/// Fixed-capacity transfer buffer with a leading length byte.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(C, align(2))]
pub struct BlockData {
    bytes: [u8; BLOCK_DATA_LEN],
}

impl BlockData {
    /// An all-zero buffer.
    pub const fn zeroed() -> Self {
        Self { bytes: [0; BLOCK_DATA_LEN] }
    }

    /// A buffer requesting `len` bytes, with an empty payload area.
    fn with_len(len: BlockLen) -> Self {
        let mut data = Self::zeroed();
        data.bytes[0] = len.0;
        data
    }

    /// A buffer carrying `payload`, with the length byte set to match.
    fn with_payload(len: BlockLen, payload: &[u8]) -> Self {
        let mut data = Self::with_len(len);
        data.bytes[1..=payload.len()].copy_from_slice(payload);
        data
    }

    /// The length byte as it currently stands.
    pub const fn len_prefix(&self) -> u8 {
        self.bytes[0]
    }

    pub fn set_len_prefix(&mut self, len: u8) {
        self.bytes[0] = len;
    }

    /// The first `len` payload bytes, clamped to the buffer capacity.
    pub fn payload(&self, len: usize) -> &[u8] {
        &self.bytes[1..=len.min(MAX_BLOCK_LEN)]
    }

    /// The whole payload area, for transports that fill it in place.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[1..=MAX_BLOCK_LEN]
    }

    /// Raw view of the buffer, length byte included.
    pub fn as_bytes(&self) -> &[u8; BLOCK_DATA_LEN] {
        &self.bytes
    }

}

impl core::fmt::Debug for BlockData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let len = usize::from(self.len_prefix()).min(MAX_BLOCK_LEN);
        f.debug_struct("BlockData")
            .field("len", &self.len_prefix())
            .field("payload", &self.payload(len))
            .finish()
    }
}

/// A payload length known to be in `1..=MAX_BLOCK_LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockLen(u8);

impl BlockLen {
    fn new(len: usize) -> Option<Self> {
        match u8::try_from(len) {
            Ok(n) if (1..=MAX_BLOCK_LEN).contains(&len) => Some(Self(n)),
            _ => None,
        }
    }
}

/// One block transfer: direction, register, and the data buffer.
///
/// Built fresh for every read or write and dropped once the result has
/// been checked. Only the codec constructs these; transports receive them
/// by `&mut` and fill in the buffer.
#[derive(Debug, Clone)]
pub struct BlockTransfer {
    direction: Direction,
    command: u8,
    requested: u8,
    data: BlockData,
}

impl BlockTransfer {
    /// A read of `len` bytes starting at register `command`.
    ///
    /// Returns `None` unless `len` is in `1..=MAX_BLOCK_LEN`.
    pub(crate) fn read(command: u8, len: usize) -> Option<Self> {
        let len = BlockLen::new(len)?;
        Some(Self {
            direction: Direction::Read,
            command,
            requested: len.0,
            data: BlockData::with_len(len),
        })
    }

    /// A write of `payload` starting at register `command`.
    ///
    /// Returns `None` unless `payload` holds `1..=MAX_BLOCK_LEN` bytes.
    pub(crate) fn write(command: u8, payload: &[u8]) -> Option<Self> {
        let len = BlockLen::new(payload.len())?;
        Some(Self {
            direction: Direction::Write,
            command,
            requested: len.0,
            data: BlockData::with_payload(len, payload),
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Register (SMBus command byte) the transfer starts at.
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Number of payload bytes asked for when the transfer was built.
    pub fn requested_len(&self) -> usize {
        usize::from(self.requested)
    }

    /// Number of payload bytes the transport reports as transferred.
    pub fn transferred_len(&self) -> usize {
        usize::from(self.data.len_prefix())
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut BlockData {
        &mut self.data
    }
}
