use std::io::Result;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Parameters of a single full-duplex message. The same buffer is used for
/// both the transmit and receive side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub speed_hz: u32,
    pub delay_usecs: u16,
    pub bits_per_word: u8,
}

/// An open SPI character device.
#[cfg_attr(test, automock)]
pub trait SpiDevice {
    fn raw_fd(&self) -> RawFd;
    fn set_mode(&self, mode: u8) -> Result<()>;
    fn set_bits_per_word(&self, bits: u8) -> Result<()>;
    fn set_max_speed_hz(&self, speed_hz: u32) -> Result<()>;
    /// Exchange `buf` with the peripheral in place, returning the number of
    /// bytes transferred.
    fn transfer(&self, buf: &mut [u8], request: &TransferRequest) -> Result<usize>;
}

/// Opens device nodes for a registry.
#[cfg_attr(test, automock(type Device = MockSpiDevice;))]
pub trait DeviceOpener {
    type Device: SpiDevice;

    /// Path of the node for `bus` and `channel`.
    fn device_path(&self, bus: u32, channel: u32) -> PathBuf;
    fn open(&self, path: &Path) -> Result<Self::Device>;
}
