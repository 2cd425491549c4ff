//! Depth-to-color classification.
//!
//! Six disjoint buckets cover the whole real line. Each bucket is open below
//! and closed above, so a depth of exactly 90 km is orange, not red. The
//! legend relies on this when it colors each entry with `classify(lower + 1)`.

use crate::domain::model::{DepthColor, SeverityBucket};

/// Shallowest first.
pub static SEVERITY_BUCKETS: [SeverityBucket; 6] = [
    SeverityBucket {
        lower_km: None,
        upper_km: Some(10.0),
        color: DepthColor::Green,
    },
    SeverityBucket {
        lower_km: Some(10.0),
        upper_km: Some(30.0),
        color: DepthColor::YellowGreen,
    },
    SeverityBucket {
        lower_km: Some(30.0),
        upper_km: Some(50.0),
        color: DepthColor::Yellow,
    },
    SeverityBucket {
        lower_km: Some(50.0),
        upper_km: Some(70.0),
        color: DepthColor::DarkYellow,
    },
    SeverityBucket {
        lower_km: Some(70.0),
        upper_km: Some(90.0),
        color: DepthColor::Orange,
    },
    SeverityBucket {
        lower_km: Some(90.0),
        upper_km: None,
        color: DepthColor::Red,
    },
];

/// Maps a depth in km to its fill color.
///
/// Thresholds are tried from the deepest down; anything that matches none of
/// them (shallow, negative, NaN) is green.
pub fn classify(depth_km: f64) -> DepthColor {
    bucket_for(depth_km).color
}

pub fn bucket_for(depth_km: f64) -> &'static SeverityBucket {
    SEVERITY_BUCKETS
        .iter()
        .rev()
        .find(|bucket| bucket.contains(depth_km))
        .unwrap_or(&SEVERITY_BUCKETS[0])
}
