//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{services::Coordinates, sos::SosSettings, state::JsonFileStore};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "sos-guardian")]
#[command(about = "A personal-safety daemon hosting the SOS alert lifecycle")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Seconds between confirming SOS and the alert going active
    #[arg(short, long, default_value = "5")]
    pub countdown: u32,

    /// Where the theme preference is stored
    #[arg(long)]
    pub settings_file: Option<PathBuf>,

    /// Program that delivers texts, called as `<program> <message> <phone>...`
    #[arg(long)]
    pub sms_command: Option<String>,

    /// Fixed latitude reported as the device location
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Fixed longitude reported as the device location
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Behave as if location permission was refused
    #[arg(long)]
    pub deny_location: bool,

    /// Number dialed by the emergency call quick action
    #[arg(long, default_value = "911")]
    pub emergency_number: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings_file
            .clone()
            .unwrap_or_else(JsonFileStore::default_path)
    }

    pub fn fixed_location(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    pub fn sos_settings(&self) -> SosSettings {
        SosSettings {
            countdown_seconds: self.countdown,
            tick_period: Duration::from_secs(1),
            emergency_number: self.emergency_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["sos-guardian"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.sos_settings().countdown_seconds, 5);
        assert_eq!(config.sos_settings().emergency_number, "911");
        assert_eq!(config.fixed_location(), None);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn location_needs_both_coordinates() {
        assert!(Config::try_parse_from(["sos-guardian", "--latitude", "1.0"]).is_err());

        let config = Config::try_parse_from([
            "sos-guardian",
            "--latitude",
            "41.33",
            "--longitude",
            "-19.82",
        ])
        .unwrap();
        assert_eq!(config.fixed_location(), Some(Coordinates::new(41.33, -19.82)));
    }

    #[test]
    fn explicit_settings_file_wins() {
        let config =
            Config::try_parse_from(["sos-guardian", "--settings-file", "/tmp/s.json"]).unwrap();
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/s.json"));
    }
}
