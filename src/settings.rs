use anyhow::Result;
use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::{de::Visitor, Deserialize, Deserializer};
use std::{path::PathBuf, str::FromStr};
use tracing::Level;

const LOG_LEVELS: [&str; 5] = ["DEBUG", "ERROR", "INFO", "TRACE", "WARN"];

struct LevelVisitor;

impl<'de> Visitor<'de> for LevelVisitor {
    type Value = Level;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter
            .write_str("Expecting one of ")
            .and(formatter.write_str(&LOG_LEVELS.join(",")))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        FromStr::from_str(v).map_err(|_| E::unknown_variant(v, &LOG_LEVELS))
    }
}

pub fn deserialize_level<'de, D>(de: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    de.deserialize_string(LevelVisitor)
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Spi {
    pub device_dir: PathBuf,
    pub bus: u32,
    pub channel: u32,
    pub speed_hz: u32,
    pub mode: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub spi: Spi,
    #[serde(deserialize_with = "deserialize_level")]
    pub loglevel: Level,
    pub json_logs: bool,
}

impl Settings {
    /// Read `wiring-spi.{toml,yaml,json,...}` from the working directory if
    /// present, then `WIRING_SPI_*` variables, e.g. `WIRING_SPI_SPI__SPEED_HZ`.
    pub fn new() -> Result<Settings> {
        let reader = ConfigBuilder::<DefaultState>::default()
            .add_source(File::with_name("wiring-spi").required(false))
            .add_source(
                Environment::with_prefix("WIRING_SPI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(reader.try_deserialize()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            spi: Default::default(),
            loglevel: Level::INFO,
            json_logs: false,
        }
    }
}

impl Default for Spi {
    fn default() -> Self {
        Spi {
            device_dir: PathBuf::from("/dev"),
            bus: 0,
            channel: 0,
            speed_hz: 500_000,
            mode: 0,
        }
    }
}
