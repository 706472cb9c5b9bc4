use std::{os::unix::io::RawFd, path::PathBuf};

use crate::spi::{
    device::{MockDeviceOpener, MockSpiDevice},
    report::MockFailureReporter,
};

/// A device that accepts any configuration and echoes every transfer, as if
/// MOSI were wired to MISO.
pub fn loopback_device(fd: RawFd) -> MockSpiDevice {
    let mut device = MockSpiDevice::new();
    device.expect_raw_fd().return_const(fd);
    device.expect_set_mode().returning(|_| Ok(()));
    device.expect_set_bits_per_word().returning(|_| Ok(()));
    device.expect_set_max_speed_hz().returning(|_| Ok(()));
    device
        .expect_transfer()
        .returning(|buf, _| Ok(buf.len()));
    device
}

/// Opens loopback devices under `/dev`, handing out descriptors counting up
/// from `first_fd`.
pub fn loopback_opener(first_fd: RawFd) -> MockDeviceOpener {
    let mut opener = MockDeviceOpener::new();
    opener
        .expect_device_path()
        .returning(|bus, channel| PathBuf::from(format!("/dev/spidev{}.{}", bus, channel)));
    let mut next_fd = first_fd;
    opener.expect_open().returning(move |_| {
        let device = loopback_device(next_fd);
        next_fd += 1;
        Ok(device)
    });
    opener
}

/// A reporter that expects `times` failures and hands each one back.
pub fn passthrough_reporter(times: usize) -> MockFailureReporter {
    let mut reporter = MockFailureReporter::new();
    reporter
        .expect_report()
        .times(times)
        .returning(|_, error| error);
    reporter
}
