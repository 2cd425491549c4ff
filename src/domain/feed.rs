//! Wire shapes of the earthquake feed and the plate boundary dataset.
//!
//! Each feature in the feed looks like
//! `{"geometry": {"coordinates": [lon, lat, depth]}, "properties": {"mag", "place", "time"}}`.

use crate::domain::model::{BoundaryGeometry, EarthquakeRecord};
use crate::utils::error::{MapError, Result};
use serde::Deserialize;

pub const UNKNOWN_PLACE: &str = "Unknown location";

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub metadata: Option<FeedMetadata>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedMetadata {
    pub title: Option<String>,
    pub count: Option<u64>,
    pub generated: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub time: Option<i64>,
}

impl FeatureCollection {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| MapError::FeedFormatError {
            message: format!("not an earthquake FeatureCollection: {}", e),
        })
    }
}

impl EarthquakeRecord {
    /// Pulls one record out of a feed feature; `index` is the position in `features`.
    pub fn from_feature(index: usize, feature: &Feature) -> Result<Self> {
        let invalid = |reason: &str| MapError::InvalidRecordError {
            index,
            reason: reason.to_string(),
        };

        let coordinates = feature
            .geometry
            .as_ref()
            .map(|g| g.coordinates.as_slice())
            .ok_or_else(|| invalid("geometry is missing"))?;

        let coordinate = |position: usize, name: &str| {
            coordinates
                .get(position)
                .copied()
                .flatten()
                .ok_or_else(|| invalid(&format!("{} is missing", name)))
        };

        let longitude = coordinate(0, "longitude")?;
        let latitude = coordinate(1, "latitude")?;
        let depth_km = coordinate(2, "depth")?;

        let magnitude = feature
            .properties
            .mag
            .ok_or_else(|| invalid("magnitude is missing"))?;
        let timestamp_ms = feature
            .properties
            .time
            .ok_or_else(|| invalid("time is missing"))?;

        // 地點缺漏不影響繪圖
        let place = feature
            .properties
            .place
            .clone()
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string());

        Ok(Self {
            id: feature.id.clone(),
            longitude,
            latitude,
            depth_km,
            magnitude,
            place,
            timestamp_ms,
        })
    }
}

impl BoundaryGeometry {
    /// Accepts any GeoJSON object; the content itself is not inspected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| MapError::BoundaryFormatError {
                message: e.to_string(),
            })?;

        match value.get("type") {
            Some(serde_json::Value::String(_)) => Ok(Self(value)),
            _ => Err(MapError::BoundaryFormatError {
                message: "expected a GeoJSON object with a \"type\" member".to_string(),
            }),
        }
    }
}
