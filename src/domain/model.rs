use serde::{Deserialize, Serialize, Serializer};

/// One detected event, taken verbatim from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    pub id: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
    pub place: String,
    pub timestamp_ms: i64,
}

/// Fill colors of the six depth buckets, shallowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthColor {
    Green,
    YellowGreen,
    Yellow,
    DarkYellow,
    Orange,
    Red,
}

impl DepthColor {
    pub const fn hex(self) -> &'static str {
        match self {
            DepthColor::Green => "#00FF00",
            DepthColor::YellowGreen => "#ADFF2F",
            DepthColor::Yellow => "#FFFF00",
            DepthColor::DarkYellow => "#CCCC00",
            DepthColor::Orange => "#FF4500",
            DepthColor::Red => "#FF0000",
        }
    }
}

impl std::fmt::Display for DepthColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hex())
    }
}

impl Serialize for DepthColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// A depth range `(lower, upper]` in km. `None` means unbounded on that side.
/// The bucket with no lower bound also takes NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBucket {
    pub lower_km: Option<f64>,
    pub upper_km: Option<f64>,
    pub color: DepthColor,
}

impl SeverityBucket {
    pub fn contains(&self, depth_km: f64) -> bool {
        if depth_km.is_nan() {
            return self.lower_km.is_none();
        }
        let above_lower = self.lower_km.map_or(true, |lower| depth_km > lower);
        let within_upper = self.upper_km.map_or(true, |upper| depth_km <= upper);
        above_lower && within_upper
    }

    /// Legend text. The shallowest bucket is displayed from 0 km.
    pub fn label(&self) -> String {
        let lower = self.lower_km.unwrap_or(0.0);
        match self.upper_km {
            Some(upper) => format!("{}&ndash;{} km", lower, upper),
            None => format!("{}+ km", lower),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub stroke_color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000",
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Everything the renderer needs to draw one circle marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    /// `(lat, lon)`
    pub position: (f64, f64),
    pub radius_px: f64,
    pub fill_color: DepthColor,
    pub popup_html: String,
}

/// Tectonic plate boundaries, passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundaryGeometry(pub serde_json::Value);

impl BoundaryGeometry {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Raw results of the two fetches.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub feed: crate::domain::feed::FeatureCollection,
    pub boundaries: Option<BoundaryGeometry>,
}

/// Render-ready content of the map.
#[derive(Debug, Clone)]
pub struct MapDataset {
    pub markers: Vec<MarkerDescriptor>,
    pub boundaries: Option<BoundaryGeometry>,
    pub skipped_records: usize,
}
