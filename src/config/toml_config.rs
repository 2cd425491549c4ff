use crate::config::{DEFAULT_FEED_URL, DEFAULT_PLATES_SOURCE};
use crate::core::loader::DEFAULT_TIMEOUT;
use crate::core::ConfigProvider;
use crate::render::{BaseLayer, MapOptions};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub map: MapSection,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub base_layers: Option<Vec<BaseLayer>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSection {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// URL or local path; omit or set `plates_enabled = false` to skip the overlay
    pub plates: Option<String>,
    pub plates_enabled: Option<bool>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    pub emit_geojson: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub skip_invalid_records: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl Default for MapSection {
    fn default() -> Self {
        let defaults = MapOptions::default();
        Self {
            title: Some(defaults.title),
            subtitle: Some(defaults.subtitle),
            center: Some(defaults.center),
            zoom: Some(defaults.zoom),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            plates: Some(DEFAULT_PLATES_SOURCE.to_string()),
            plates_enabled: Some(true),
            timeout_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            emit_geojson: None,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // ${VAR_NAME}
        Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
    })
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USGS_FEED_URL})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.feed_url", &self.source.feed_url)?;

        if let Some(plates) = self.plates_source() {
            validation::validate_source("source.plates", plates)?;
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        validation::validate_path("output.path", &self.output.path)?;

        if let Some(zoom) = self.map.zoom {
            validation::validate_range("map.zoom", zoom, 0, 19)?;
        }
        if let Some(center) = self.map.center {
            validation::validate_center("map.center", center)?;
        }

        if let Some(layers) = &self.base_layers {
            if layers.is_empty() {
                return Err(MapError::InvalidConfigValueError {
                    field: "base_layers".to_string(),
                    value: "[]".to_string(),
                    reason: "At least one base layer is required".to_string(),
                });
            }
            for layer in layers {
                validation::validate_non_empty_string("base_layers.name", &layer.name)?;
                validation::validate_non_empty_string(
                    "base_layers.url_template",
                    &layer.url_template,
                )?;
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn feed_url(&self) -> &str {
        &self.source.feed_url
    }

    fn plates_source(&self) -> Option<&str> {
        if self.source.plates_enabled.unwrap_or(true) {
            self.source.plates.as_deref()
        } else {
            None
        }
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn request_timeout(&self) -> Duration {
        self.source
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn skip_invalid_records(&self) -> bool {
        self.validation.skip_invalid_records.unwrap_or(false)
    }

    fn emit_geojson(&self) -> bool {
        self.output.emit_geojson.unwrap_or(false)
    }

    fn map_options(&self) -> MapOptions {
        let defaults = MapOptions::default();
        MapOptions {
            title: self.map.title.clone().unwrap_or(defaults.title),
            subtitle: self.map.subtitle.clone().unwrap_or(defaults.subtitle),
            center: self.map.center.unwrap_or(defaults.center),
            zoom: self.map.zoom.unwrap_or(defaults.zoom),
            base_layers: self.base_layers.clone().unwrap_or(defaults.base_layers),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
