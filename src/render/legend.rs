use crate::core::depth::{classify, SEVERITY_BUCKETS};
use crate::render::PLATES_COLOR;
use crate::utils::html;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: String,
    /// Already HTML (may contain entities such as `&ndash;`).
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub subtitle: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Depth scale, one entry per bucket, plus the plates swatch when shown.
    ///
    /// Each swatch is colored with the depth one km past the displayed lower
    /// bound, so the label value itself never has to be classified.
    pub fn depth(include_plates: bool) -> Self {
        let mut entries: Vec<LegendEntry> = SEVERITY_BUCKETS
            .iter()
            .map(|bucket| LegendEntry {
                color: classify(bucket.lower_km.unwrap_or(0.0) + 1.0).hex().to_string(),
                label: bucket.label(),
            })
            .collect();

        if include_plates {
            entries.push(LegendEntry {
                color: PLATES_COLOR.to_string(),
                label: "Tectonic Plates".to_string(),
            });
        }

        Self {
            title: "Depth of Earthquakes".to_string(),
            subtitle: "Measured in km".to_string(),
            entries,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = format!(
            "<strong>{}</strong><br>{}",
            html::escape(&self.title),
            html::escape(&self.subtitle)
        );
        for entry in &self.entries {
            out.push_str(&format!(
                "<div class=\"legend-item\"><i style=\"background:{}\"></i> {}</div>",
                html::escape(&entry.color),
                entry.label
            ));
        }
        out
    }
}
