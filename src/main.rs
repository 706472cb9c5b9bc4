use anyhow::{ensure, Context, Result};
use argh::FromArgs;
use tracing::{debug, instrument};
use wiring_spi::{logging::setup_logging, settings::Settings, spi::create_channel_registry};

/// Exchange bytes with a device on a Linux SPI bus.
///
/// The received bytes are printed as hex, one exchange per invocation.
#[derive(Debug, FromArgs)]
struct Args {
    /// bus number of the SPI controller (default from settings)
    #[argh(option, short = 'b')]
    bus: Option<u32>,

    /// chip select on the bus (default from settings)
    #[argh(option, short = 'c')]
    channel: Option<u32>,

    /// clock speed in Hz (default from settings)
    #[argh(option, short = 's')]
    speed: Option<u32>,

    /// transfer mode 0-3 (default from settings)
    #[argh(option, short = 'm')]
    mode: Option<u32>,

    /// bytes to send, in hex, e.g. 9f 00 00
    #[argh(positional, from_str_fn(parse_byte))]
    bytes: Vec<u8>,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid byte '{}': {}", value, e))
}

fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[instrument(skip(settings))]
fn run(args: Args, settings: Settings) -> Result<String> {
    ensure!(!args.bytes.is_empty(), "Nothing to send");

    let bus = args.bus.unwrap_or(settings.spi.bus);
    let channel = args.channel.unwrap_or(settings.spi.channel);
    let speed = args.speed.unwrap_or(settings.spi.speed_hz);
    let mode = args.mode.unwrap_or(settings.spi.mode);

    let mut registry = create_channel_registry(&settings.spi);
    registry
        .setup_mode(bus, channel, speed, mode)
        .with_context(|| format!("Unable to set up SPI bus {} channel {}", bus, channel))?;

    let mut buf = args.bytes;
    let transferred = registry
        .data_rw_bus(bus, channel, &mut buf)
        .context("SPI transfer failed")?;
    debug!(transferred, "Exchanged {} bytes", transferred);

    Ok(format_bytes(&buf[..transferred]))
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let settings = Settings::new()?;
    setup_logging(settings.loglevel, settings.json_logs);

    println!("{}", run(args, settings)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_hex_bytes() {
        assert_eq!(parse_byte("aa"), Ok(0xAA));
        assert_eq!(parse_byte("0x9F"), Ok(0x9F));
        assert_eq!(parse_byte("7"), Ok(0x07));
        assert!(parse_byte("100").is_err());
        assert!(parse_byte("zz").is_err());
    }

    #[test]
    fn it_formats_received_bytes() {
        assert_eq!(format_bytes(&[0x00, 0xAB, 0x0F]), "00 ab 0f");
        assert_eq!(format_bytes(&[]), "");
    }

    #[test]
    fn it_refuses_to_send_nothing() {
        let args = Args {
            bus: None,
            channel: None,
            speed: None,
            mode: None,
            bytes: Vec::new(),
        };
        assert!(run(args, Settings::default()).is_err());
    }

    #[test]
    fn it_fails_when_the_device_node_is_missing() {
        let args = Args {
            bus: Some(1),
            channel: Some(0),
            speed: None,
            mode: None,
            bytes: vec![0xAA],
        };
        let mut settings = Settings::default();
        settings.spi.device_dir = "/nonexistent-wiring-spi".into();

        let err = run(args, settings).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent-wiring-spi/spidev1.0"));
    }
}
