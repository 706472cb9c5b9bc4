pub mod device;
mod error;
mod registry;
pub mod report;

pub use device::{DeviceOpener, LinuxSpiDevice, LinuxSpiOpener, SpiDevice, TransferRequest};
pub use error::{Error, Result};
pub use registry::{slot_index, ChannelRegistry, BITS_PER_WORD, DELAY_USECS, MAX_BUS};
pub use report::{FailureReporter, Severity, TracingReporter};

use crate::settings::Spi;

/// A registry over the `spidev` nodes in the configured device directory.
pub fn create_channel_registry(settings: &Spi) -> ChannelRegistry<LinuxSpiOpener> {
    ChannelRegistry::new(LinuxSpiOpener::with_device_dir(&settings.device_dir))
}
