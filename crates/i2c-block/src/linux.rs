//! Transport over the Linux `i2c-dev` character device.
//!
//! See <https://www.kernel.org/doc/Documentation/i2c/dev-interface> for the
//! control calls used here.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, IntoRawFd};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::block::{BlockData, BlockTransfer, DeviceAddress, I2C_BLOCK_DATA};
use crate::error::BusError;
use crate::handle::BusHandle;
use crate::transport::Transport;

const I2C_SLAVE: u16 = 0x0703;
const I2C_SMBUS: u16 = 0x0720;

/// Argument of the `I2C_SMBUS` ioctl (`struct i2c_smbus_ioctl_data`).
// Fields are only read by the kernel.
#[allow(dead_code)]
#[repr(C)]
pub struct SmbusIoctlData {
    read_write: u8,
    command: u8,
    size: u32,
    data: *mut BlockData,
}

mod ioctl {
    use super::{SmbusIoctlData, I2C_SLAVE, I2C_SMBUS};

    nix::ioctl_write_int_bad!(set_slave_address, I2C_SLAVE);
    nix::ioctl_write_ptr_bad!(smbus, I2C_SMBUS, SmbusIoctlData);
}

/// An open `/dev/i2c-N` device.
#[derive(Debug)]
pub struct LinuxTransport {
    file: File,
    path: PathBuf,
}

impl LinuxTransport {
    /// Open the bus device at `path` for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        debug!(path = %path.display(), "opened bus device");
        Ok(Self { file, path: path.to_path_buf() })
    }
}

impl Transport for LinuxTransport {
    type Error = io::Error;

    fn select_address(&mut self, address: DeviceAddress) -> io::Result<()> {
        // SAFETY: the fd is open for the lifetime of `self.file`, and
        // I2C_SLAVE takes the address by value.
        unsafe {
            ioctl::set_slave_address(
                self.file.as_raw_fd(),
                i32::from(address.get()),
            )
        }?;
        Ok(())
    }

    fn block_transfer(
        &mut self,
        transfer: &mut BlockTransfer,
    ) -> io::Result<()> {
        let mut args = SmbusIoctlData {
            read_write: transfer.direction().flag(),
            command: transfer.command(),
            size: I2C_BLOCK_DATA,
            data: transfer.data_mut(),
        };
        // SAFETY: `args.data` points at a live `BlockData` with the size and
        // alignment of the kernel's `i2c_smbus_data` union, and nothing else
        // borrows it until the call returns.
        unsafe { ioctl::smbus(self.file.as_raw_fd(), &mut args) }?;
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        debug!(path = %self.path.display(), "closing bus device");
        let fd = self.file.into_raw_fd();
        nix::unistd::close(fd)?;
        Ok(())
    }
}

/// Open the bus device at `path`.
pub fn open_bus(
    path: impl AsRef<Path>,
) -> Result<BusHandle<LinuxTransport>, BusError<io::Error>> {
    LinuxTransport::open(path).map(BusHandle::new).map_err(BusError::Open)
}

impl BusHandle<LinuxTransport> {
    /// Open the bus device at `path`. Same as [`open_bus`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BusError<io::Error>> {
        open_bus(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ioctl_argument_layout() {
        assert_eq!(core::mem::offset_of!(SmbusIoctlData, read_write), 0);
        assert_eq!(core::mem::offset_of!(SmbusIoctlData, command), 1);
        assert_eq!(core::mem::offset_of!(SmbusIoctlData, size), 4);
        assert_eq!(
            core::mem::offset_of!(SmbusIoctlData, data),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn open_missing_device_fails() {
        let err = open_bus("/dev/i2c-block-test-missing").unwrap_err();
        match err {
            BusError::Open(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }
}
