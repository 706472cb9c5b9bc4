use std::os::unix::io::RawFd;

use tracing::{debug, info, instrument};

use super::{
    device::{DeviceOpener, SpiDevice, TransferRequest},
    error::{Error, Result},
    report::{FailureReporter, Severity, TracingReporter},
};

/// Word size used for configuration and every transfer.
pub const BITS_PER_WORD: u8 = 8;
/// Delay between words within a transfer.
pub const DELAY_USECS: u16 = 0;
/// Highest bus number the registry has slots for.
pub const MAX_BUS: u32 = 1;

const SLOT_COUNT: usize = (MAX_BUS as usize + 1) * 2;

/// Registry slot for `bus` and `channel`, or `None` if the bus is out of range.
///
/// Only the low bit of `channel` takes part, so channels 0, 2, 4... of a bus
/// share a slot.
pub fn slot_index(bus: u32, channel: u32) -> Option<usize> {
    if bus > MAX_BUS {
        return None;
    }
    Some((bus * 2 + (channel & 1)) as usize)
}

#[derive(Debug)]
struct Slot<D> {
    device: D,
    speed_hz: u32,
}

/// Table of open SPI channels.
///
/// Devices are opened by [`setup_mode`](ChannelRegistry::setup_mode) and
/// stay open until they are replaced by another setup of the same slot or
/// the registry is dropped.
pub struct ChannelRegistry<O: DeviceOpener, R: FailureReporter = TracingReporter> {
    opener: O,
    reporter: R,
    slots: [Option<Slot<O::Device>>; SLOT_COUNT],
}

impl<O: DeviceOpener> ChannelRegistry<O> {
    pub fn new(opener: O) -> ChannelRegistry<O> {
        ChannelRegistry::with_reporter(opener, TracingReporter)
    }
}

impl<O: DeviceOpener, R: FailureReporter> ChannelRegistry<O, R> {
    pub fn with_reporter(opener: O, reporter: R) -> ChannelRegistry<O, R> {
        ChannelRegistry {
            opener,
            reporter,
            slots: std::array::from_fn(|_| None),
        }
    }

    fn fail(&self, error: Error) -> Error {
        self.reporter.report(Severity::Almost, error)
    }

    fn slot(&self, bus: u32, channel: u32) -> Option<&Slot<O::Device>> {
        slot_index(bus, channel).and_then(|index| self.slots[index].as_ref())
    }

    /// Open `spidev<bus>.<channel>` and configure it for `mode` and
    /// `speed_hz` with 8 bit words.
    ///
    /// The full `channel` is used to find the device node but only its low
    /// bit selects the slot, so a setup of channel 2 replaces channel 0 of the
    /// same bus. Only the two low bits of `mode` are used.
    ///
    /// The device is stored before it is configured. If a configuration step
    /// fails the device stays in its slot and the remaining steps are skipped.
    #[instrument(skip(self))]
    pub fn setup_mode(
        &mut self,
        bus: u32,
        channel: u32,
        speed_hz: u32,
        mode: u32,
    ) -> Result<RawFd> {
        let mode = (mode & 3) as u8;
        let index =
            slot_index(bus, channel).ok_or_else(|| self.fail(Error::BusOutOfRange(bus)))?;

        let path = self.opener.device_path(bus, channel);
        let device = self.opener.open(&path).map_err(|source| {
            self.fail(Error::Open {
                path: path.clone(),
                source,
            })
        })?;
        let fd = device.raw_fd();
        debug!(path = %path.display(), fd, index, "Opened SPI device");

        let slot = self.slots[index].insert(Slot { device, speed_hz });
        let configured = configure(&slot.device, mode, speed_hz);
        configured.map_err(|e| self.fail(e))?;

        info!(path = %path.display(), fd, speed_hz, mode, "SPI device ready");
        Ok(fd)
    }

    /// [`setup_mode`](ChannelRegistry::setup_mode) in mode 0.
    pub fn setup_bus(&mut self, bus: u32, channel: u32, speed_hz: u32) -> Result<RawFd> {
        self.setup_mode(bus, channel, speed_hz, 0)
    }

    /// [`setup_mode`](ChannelRegistry::setup_mode) on bus 0 in mode 0.
    pub fn setup(&mut self, channel: u32, speed_hz: u32) -> Result<RawFd> {
        self.setup_mode(0, channel, speed_hz, 0)
    }

    /// Descriptor stored for `bus` and `channel`, if any.
    pub fn fd_bus(&self, bus: u32, channel: u32) -> Option<RawFd> {
        self.slot(bus, channel).map(|slot| slot.device.raw_fd())
    }

    /// Descriptor for bus 0, channel 1.
    ///
    /// `_channel` is ignored. This looks like a defect but callers may depend
    /// on it, so it stays until the intended target is confirmed.
    pub fn fd(&self, _channel: u32) -> Option<RawFd> {
        self.fd_bus(0, 1)
    }

    /// Clock speed recorded by the last setup of `bus` and `channel`.
    pub fn speed_hz(&self, bus: u32, channel: u32) -> Option<u32> {
        self.slot(bus, channel).map(|slot| slot.speed_hz)
    }

    /// Device stored for `bus` and `channel`, if any.
    pub fn device(&self, bus: u32, channel: u32) -> Option<&O::Device> {
        self.slot(bus, channel).map(|slot| &slot.device)
    }

    /// Full-duplex exchange of `buf` with the device on `bus` and `channel`.
    ///
    /// The received bytes overwrite `buf`. One transfer is attempted and a
    /// driver error is passed back as is.
    #[instrument(skip(self, buf), fields(len = buf.len()))]
    pub fn data_rw_bus(&self, bus: u32, channel: u32, buf: &mut [u8]) -> Result<usize> {
        let channel = channel & 1;
        if bus > MAX_BUS {
            return Err(Error::BusOutOfRange(bus));
        }
        let slot = self
            .slot(bus, channel)
            .ok_or(Error::Unconfigured { bus, channel })?;

        let request = TransferRequest {
            speed_hz: slot.speed_hz,
            delay_usecs: DELAY_USECS,
            bits_per_word: BITS_PER_WORD,
        };
        let transferred = slot
            .device
            .transfer(buf, &request)
            .map_err(Error::Transfer)?;
        debug!(transferred, "SPI transfer complete");
        Ok(transferred)
    }

    /// [`data_rw_bus`](ChannelRegistry::data_rw_bus) on bus 0.
    pub fn data_rw(&self, channel: u32, buf: &mut [u8]) -> Result<usize> {
        self.data_rw_bus(0, channel, buf)
    }
}

fn configure<D: SpiDevice>(device: &D, mode: u8, speed_hz: u32) -> Result<()> {
    device.set_mode(mode).map_err(Error::Mode)?;
    device
        .set_bits_per_word(BITS_PER_WORD)
        .map_err(Error::BitsPerWord)?;
    device.set_max_speed_hz(speed_hz).map_err(Error::Speed)?;
    Ok(())
}
