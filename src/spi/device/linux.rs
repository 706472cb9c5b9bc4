use std::{
    io,
    os::unix::io::{AsRawFd, RawFd},
    path::{Path, PathBuf},
};

use spidev::{spidevioctl, SpiModeFlags, Spidev, SpidevTransfer};

use super::traits::{DeviceOpener, SpiDevice, TransferRequest};

const DEFAULT_DEVICE_DIR: &str = "/dev";

/// A `spidev` character device opened read-write.
#[derive(Debug)]
pub struct LinuxSpiDevice {
    spi: Spidev,
}

impl LinuxSpiDevice {
    pub fn open(path: impl AsRef<Path>) -> io::Result<LinuxSpiDevice> {
        let spi = Spidev::open(path)?;
        Ok(LinuxSpiDevice { spi })
    }
}

impl SpiDevice for LinuxSpiDevice {
    fn raw_fd(&self) -> RawFd {
        self.spi.as_raw_fd()
    }

    fn set_mode(&self, mode: u8) -> io::Result<()> {
        let flags = SpiModeFlags::from_bits_truncate(u32::from(mode));
        spidevioctl::set_mode(self.raw_fd(), flags)
    }

    fn set_bits_per_word(&self, bits: u8) -> io::Result<()> {
        spidevioctl::set_bits_per_word(self.raw_fd(), bits)
    }

    fn set_max_speed_hz(&self, speed_hz: u32) -> io::Result<()> {
        spidevioctl::set_max_speed_hz(self.raw_fd(), speed_hz)
    }

    /// Returns the length of `buf`. `spidev` drops the ioctl's return value,
    /// which for a single message is the same count.
    fn transfer(&self, buf: &mut [u8], request: &TransferRequest) -> io::Result<usize> {
        let len = buf.len();
        let mut transfer = SpidevTransfer::read_write_in_place(buf);
        transfer.speed_hz = request.speed_hz;
        transfer.delay_usecs = request.delay_usecs;
        transfer.bits_per_word = request.bits_per_word;

        self.spi.transfer(&mut transfer)?;
        Ok(len)
    }
}

/// Opens `spidev<bus>.<channel>` nodes below a device directory.
#[derive(Debug, Clone)]
pub struct LinuxSpiOpener {
    device_dir: PathBuf,
}

impl LinuxSpiOpener {
    pub fn new() -> LinuxSpiOpener {
        LinuxSpiOpener::with_device_dir(DEFAULT_DEVICE_DIR)
    }

    pub fn with_device_dir(dir: impl Into<PathBuf>) -> LinuxSpiOpener {
        LinuxSpiOpener {
            device_dir: dir.into(),
        }
    }

    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }
}

impl Default for LinuxSpiOpener {
    fn default() -> Self {
        LinuxSpiOpener::new()
    }
}

impl DeviceOpener for LinuxSpiOpener {
    type Device = LinuxSpiDevice;

    fn device_path(&self, bus: u32, channel: u32) -> PathBuf {
        self.device_dir.join(format!("spidev{}.{}", bus, channel))
    }

    fn open(&self, path: &Path) -> io::Result<LinuxSpiDevice> {
        LinuxSpiDevice::open(path)
    }
}
