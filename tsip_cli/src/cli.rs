use std::{fs::File, io, io::Read, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tsip::{DecoderConfig, HealthLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Status and error bytes only
    Documented,
    /// Status, error bytes and four trailing bytes
    Extended,
}

impl From<Layout> for HealthLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Documented => HealthLayout::Documented,
            Layout::Extended => HealthLayout::Extended,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Decode TSIP from a capture file, stdin or a serial port and print a JSON
/// snapshot of the receiver after every fix.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Capture file to decode, stdin when neither this nor --port is given
    #[arg(short, long, conflicts_with = "port")]
    pub input: Option<PathBuf>,

    /// Serial port device
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long, default_value_t = 9600)]
    pub baud_rate: u32,

    /// Lassen receivers ship with 8-O-1
    #[arg(long, value_enum, default_value_t = Parity::Odd)]
    pub parity: Parity,

    /// Payload layout of the 0x46 health report
    #[arg(long, value_enum, default_value_t = Layout::Extended)]
    pub health_layout: Layout,

    /// Refuse tracking table inserts once 12 satellites are stored
    #[arg(long)]
    pub strict: bool,

    /// Signal levels kept per 0x47 report
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(1..=64))]
    pub max_signal_levels: u8,

    /// Print a snapshot after every frame instead of after every 0x6D
    #[arg(long)]
    pub every_frame: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Args {
    pub fn decoder_config(&self) -> DecoderConfig {
        let base = if self.strict {
            DecoderConfig::strict()
        } else {
            DecoderConfig::default()
        };
        base.with_health_layout(self.health_layout.into())
            .with_max_signal_levels(usize::from(self.max_signal_levels))
    }

    pub fn open_source(&self) -> Result<Box<dyn Read + Send>> {
        if let Some(port) = &self.port {
            let serial = serialport::new(port, self.baud_rate)
                .data_bits(serialport::DataBits::Eight)
                .parity(self.parity.into())
                .stop_bits(serialport::StopBits::One)
                .timeout(Duration::from_millis(500))
                .open()
                .with_context(|| format!("opening serial port {port}"))?;
            return Ok(Box::new(serial));
        }
        match &self.input {
            Some(path) => {
                let file =
                    File::open(path).with_context(|| format!("opening {}", path.display()))?;
                Ok(Box::new(file))
            },
            None => Ok(Box::new(io::stdin())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tsip::OverflowPolicy;

    #[test]
    fn strict_documented_config() {
        let args = Args::parse_from([
            "tsip_cli",
            "--strict",
            "--health-layout",
            "documented",
            "--max-signal-levels",
            "32",
        ]);
        let config = args.decoder_config();
        assert_eq!(config.health_layout, HealthLayout::Documented);
        assert_eq!(config.tracking_policy, OverflowPolicy::Reject);
        assert_eq!(config.max_signal_levels, 32);
    }

    #[test]
    fn input_conflicts_with_port() {
        let result = Args::try_parse_from(["tsip_cli", "-i", "capture.bin", "-p", "/dev/ttyUSB0"]);
        assert!(result.is_err());
    }
}
