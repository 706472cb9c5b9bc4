mod linux;
mod traits;

pub use linux::{LinuxSpiDevice, LinuxSpiOpener};
pub use traits::{DeviceOpener, SpiDevice, TransferRequest};
#[cfg(test)]
pub use traits::{MockDeviceOpener, MockSpiDevice};
