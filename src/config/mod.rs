pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::render::MapOptions;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";
pub const DEFAULT_PLATES_SOURCE: &str = "static/PB2002_boundaries.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "quake-map")]
#[command(about = "Render the latest earthquakes on an interactive map")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// Plate boundary GeoJSON, as a URL or a local path
    #[arg(long, default_value = DEFAULT_PLATES_SOURCE)]
    pub plates: String,

    #[arg(long, help = "Do not load the tectonic plates overlay")]
    pub no_plates: bool,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "USGS - All Earthquakes")]
    pub title: String,

    #[arg(long, default_value = "From Previous Day")]
    pub subtitle: String,

    #[arg(long, help = "Drop malformed records instead of failing")]
    pub skip_invalid: bool,

    #[arg(long, help = "Also write the markers as earthquakes.geojson")]
    pub emit_geojson: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn plates_source(&self) -> Option<&str> {
        if self.no_plates {
            None
        } else {
            Some(&self.plates)
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn skip_invalid_records(&self) -> bool {
        self.skip_invalid
    }

    fn emit_geojson(&self) -> bool {
        self.emit_geojson
    }

    fn map_options(&self) -> MapOptions {
        MapOptions {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            ..MapOptions::default()
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("feed_url", &self.feed_url)?;
        if !self.no_plates {
            validation::validate_source("plates", &self.plates)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validation::validate_non_empty_string("title", &self.title)
    }
}
