//! Blocking access to SPI buses through the Linux `spidev` interface.
//!
//! A [`ChannelRegistry`](spi::ChannelRegistry) owns the open devices. Each
//! (bus, channel) pair must be set up before it is used for transfers:
//!
//! ```no_run
//! use wiring_spi::spi::{ChannelRegistry, LinuxSpiOpener};
//!
//! let mut registry = ChannelRegistry::new(LinuxSpiOpener::new());
//! registry.setup_mode(0, 0, 500_000, 0)?;
//!
//! let mut buf = [0x9F, 0x00, 0x00, 0x00];
//! registry.data_rw_bus(0, 0, &mut buf)?;
//! # Ok::<(), wiring_spi::spi::Error>(())
//! ```

pub mod logging;
pub mod settings;
pub mod spi;
#[cfg(test)]
mod test;
