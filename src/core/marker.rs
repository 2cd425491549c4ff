use crate::core::depth::classify;
use crate::domain::model::{EarthquakeRecord, MarkerDescriptor};
use crate::utils::error::{MapError, Result};
use crate::utils::html;
use chrono::{DateTime, Utc};

/// Marker radius in pixels per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 5.0;

/// Builds the circle marker for one record.
///
/// `index` is only used to name the record in the error when a value is not
/// finite or the timestamp cannot be represented.
pub fn to_marker(index: usize, record: &EarthquakeRecord) -> Result<MarkerDescriptor> {
    let invalid = |reason: String| MapError::InvalidRecordError { index, reason };

    for (name, value) in [
        ("magnitude", record.magnitude),
        ("depth", record.depth_km),
        ("latitude", record.latitude),
        ("longitude", record.longitude),
    ] {
        if !value.is_finite() {
            return Err(invalid(format!("{} is not a finite number ({})", name, value)));
        }
    }

    let time = DateTime::<Utc>::from_timestamp_millis(record.timestamp_ms).ok_or_else(|| {
        invalid(format!(
            "timestamp {} ms is out of range",
            record.timestamp_ms
        ))
    })?;

    Ok(MarkerDescriptor {
        position: (record.latitude, record.longitude),
        radius_px: record.magnitude * RADIUS_PER_MAGNITUDE,
        fill_color: classify(record.depth_km),
        popup_html: popup_html(record, &time),
    })
}

/// Markers as a GeoJSON FeatureCollection, for use outside the generated page.
pub fn markers_geojson(markers: &[MarkerDescriptor]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = markers
        .iter()
        .map(|marker| {
            let (lat, lon) = marker.position;
            serde_json::json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [lon, lat]},
                "properties": {
                    "radius_px": marker.radius_px,
                    "fill_color": marker.fill_color.hex(),
                    "popup_html": marker.popup_html,
                }
            })
        })
        .collect();

    serde_json::json!({"type": "FeatureCollection", "features": features})
}

fn popup_html(record: &EarthquakeRecord, time: &DateTime<Utc>) -> String {
    format!(
        "<h3>{}</h3><hr><p>Magnitude: {}</p><p>Depth: {} km</p><p>{}</p>",
        html::escape(&record.place),
        record.magnitude,
        record.depth_km,
        time.format("%a %b %d %Y %H:%M:%S UTC")
    )
}
