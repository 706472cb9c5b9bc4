use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to open SPI device ({}): {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("SPI Mode Change failure: {0}")]
    Mode(io::Error),
    #[error("SPI BPW Change failure: {0}")]
    BitsPerWord(io::Error),
    #[error("SPI Speed Change failure: {0}")]
    Speed(io::Error),
    #[error("SPI transfer failed: {0}")]
    Transfer(io::Error),
    #[error("SPI bus {bus} channel {channel} has not been set up")]
    Unconfigured { bus: u32, channel: u32 },
    #[error("SPI bus {0} is out of range")]
    BusOutOfRange(u32),
}

impl Error {
    /// The raw OS error reported by the driver, if there is one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Open { source, .. } => source.raw_os_error(),
            Error::Mode(e) | Error::BitsPerWord(e) | Error::Speed(e) | Error::Transfer(e) => {
                e.raw_os_error()
            }
            Error::Unconfigured { .. } | Error::BusOutOfRange(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_names_the_device_path_when_open_fails() {
        let err = Error::Open {
            path: PathBuf::from("/dev/spidev0.0"),
            source: io::Error::from_raw_os_error(2),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Unable to open SPI device (/dev/spidev0.0): "));
        assert_eq!(err.raw_os_error(), Some(2));
    }

    #[test]
    fn it_has_no_os_error_for_unconfigured_slots() {
        let err = Error::Unconfigured { bus: 0, channel: 1 };
        assert_eq!(err.raw_os_error(), None);
    }
}
