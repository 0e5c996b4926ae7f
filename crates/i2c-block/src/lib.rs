#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! Length-prefixed block transfers to I2C/SMBus peripherals.
//!
//! A [`BusHandle`] owns an open bus device and reads or writes up to
//! [`MAX_BLOCK_LEN`] bytes at a time from a register of a device, using the
//! SMBus "I2C block data" transaction. Each transfer re-selects the device
//! address and checks that the number of bytes the bus reports matches the
//! request exactly.
//!
//! ```text
//! BusHandle::read / write
//!        │
//!        ▼
//! codec: check length ─► select address ─► block transfer ─► check count
//!                              │                 │
//!                              ▼                 ▼
//!                       Transport (LinuxTransport, or a test fake)
//! ```
//!
//! The protocol logic is written against the [`Transport`] trait. With the
//! `std` feature on Linux, [`LinuxTransport`] drives `/dev/i2c-N` through
//! the `I2C_SLAVE` and `I2C_SMBUS` ioctls:
//!
//! ```no_run
//! # fn main() -> Result<(), i2c_block::BusError<std::io::Error>> {
//! let mut bus = i2c_block::open_bus("/dev/i2c-1")?;
//! let mut id = [0u8; 4];
//! bus.read(&mut id, 0x1e, 0x00)?;
//! bus.close()?;
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod codec;
mod error;
mod handle;
mod transport;

#[cfg(feature = "std")]
pub mod config;
#[cfg(all(feature = "std", target_os = "linux"))]
mod linux;

pub use block::{
    BlockData, BlockTransfer, DeviceAddress, Direction, BLOCK_DATA_LEN,
    MAX_BLOCK_LEN,
};
pub use error::{BusError, Phase};
pub use handle::BusHandle;
pub use transport::Transport;

#[cfg(feature = "std")]
pub use config::BusConfig;
#[cfg(all(feature = "std", target_os = "linux"))]
pub use linux::{open_bus, LinuxTransport};
