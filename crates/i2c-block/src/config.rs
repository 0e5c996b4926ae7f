//! Where to find the bus device.

use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable read by [`BusConfig::from_env`].
pub const BUS_ENV_VAR: &str = "I2C_BLOCK_BUS";

/// Location of an `i2c-dev` bus device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusConfig {
    /// Path of the character device, e.g. `/dev/i2c-1`.
    pub path: PathBuf,
}

impl BusConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The device node for adapter number `bus`.
    pub fn for_bus(bus: u32) -> Self {
        Self::new(format!("/dev/i2c-{bus}"))
    }

    /// Reads [`BUS_ENV_VAR`], accepting a bus number or a device path.
    ///
    /// Returns `None` if the variable is unset or empty.
    pub fn from_env() -> Option<Self> {
        let value = std::env::var(BUS_ENV_VAR).ok()?;
        value.parse().ok()
    }

    /// Open the configured device.
    #[cfg(target_os = "linux")]
    pub fn open(
        &self,
    ) -> Result<
        crate::BusHandle<crate::LinuxTransport>,
        crate::BusError<std::io::Error>,
    > {
        crate::open_bus(&self.path)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::for_bus(1)
    }
}

/// Error parsing a [`BusConfig`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("empty bus location")]
pub struct EmptyBusLocation;

impl std::error::Error for EmptyBusLocation {}

impl FromStr for BusConfig {
    type Err = EmptyBusLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyBusLocation);
        }
        Ok(match s.parse::<u32>() {
            Ok(bus) => Self::for_bus(bus),
            Err(_) => Self::new(s),
        })
    }
}
