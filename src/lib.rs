pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use self::core::depth::{bucket_for, classify, SEVERITY_BUCKETS};
pub use self::core::marker::to_marker;
pub use self::core::{etl::MapEngine, pipeline::MapPipeline};
pub use domain::model::{DepthColor, EarthquakeRecord, MarkerDescriptor, SeverityBucket};
pub use utils::error::{MapError, Result};
