//! Renderer-agnostic map composition.
//!
//! [`compose_map`] only talks to the [`MapRenderer`] capability trait; the
//! Leaflet page writer is one implementation of it.

pub mod leaflet;
pub mod legend;
pub mod state;

pub use crate::domain::ports::MapRenderer;
pub use leaflet::LeafletRenderer;
pub use legend::{Legend, LegendEntry};
pub use state::MapState;

use crate::domain::model::{BoundaryGeometry, MapDataset, MarkerDescriptor, MarkerStyle};
use crate::utils::error::Result;
use crate::utils::html;
use serde::{Deserialize, Serialize};

pub const EARTHQUAKES_LAYER: &str = "Earthquakes";
pub const PLATES_LAYER: &str = "Tectonic Plates";
pub const PLATES_COLOR: &str = "#FFA500";
pub const PLATES_WEIGHT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// Background tiles; only one base layer is visible at a time.
    Tiles {
        name: String,
        url_template: String,
        attribution: String,
    },
    Markers {
        name: String,
        markers: Vec<MarkerDescriptor>,
        style: MarkerStyle,
    },
    Boundaries {
        name: String,
        geometry: BoundaryGeometry,
        color: String,
        weight: f64,
    },
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Tiles { name, .. } | Layer::Markers { name, .. } | Layer::Boundaries { name, .. } => {
                name
            }
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Layer::Tiles { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Title { html: String },
    LayerSwitcher,
    Legend(Legend),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

impl BaseLayer {
    pub fn street() -> Self {
        Self {
            name: "Street Map".to_string(),
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
        }
    }

    pub fn satellite() -> Self {
        Self {
            name: "Satellite Map".to_string(),
            url_template: "https://mt0.google.com/vt/lyrs=s&x={x}&y={y}&z={z}".to_string(),
            attribution: "&copy; <a href=\"https://www.google.com/maps\">Google Maps</a> contributors".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub title: String,
    pub subtitle: String,
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
    /// The first entry is shown initially.
    pub base_layers: Vec<BaseLayer>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            title: "USGS - All Earthquakes".to_string(),
            subtitle: "From Previous Day".to_string(),
            center: [0.0, 0.0],
            zoom: 2,
            base_layers: vec![BaseLayer::street(), BaseLayer::satellite()],
        }
    }
}

impl MapOptions {
    pub fn title_html(&self) -> String {
        if self.subtitle.trim().is_empty() {
            format!("<h1>{}</h1>", html::escape(&self.title))
        } else {
            format!(
                "<h1>{}<br>{}</h1>",
                html::escape(&self.title),
                html::escape(&self.subtitle)
            )
        }
    }
}

/// Layer handles produced by [`compose_map`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedMap {
    pub base_layers: Vec<LayerId>,
    pub earthquakes: LayerId,
    pub plates: Option<LayerId>,
}

/// Adds the base tiles, the two overlays and all controls to `renderer`.
pub fn compose_map<R: MapRenderer + ?Sized>(
    renderer: &mut R,
    dataset: MapDataset,
    options: &MapOptions,
) -> Result<ComposedMap> {
    let mut base_layers = Vec::with_capacity(options.base_layers.len());
    for base in &options.base_layers {
        let id = renderer.add_layer(Layer::Tiles {
            name: base.name.clone(),
            url_template: base.url_template.clone(),
            attribution: base.attribution.clone(),
        });
        base_layers.push(id);
    }
    if let Some(first) = base_layers.first() {
        renderer.toggle_layer(*first, true)?;
    }

    let earthquakes = renderer.add_layer(Layer::Markers {
        name: EARTHQUAKES_LAYER.to_string(),
        markers: dataset.markers,
        style: MarkerStyle::default(),
    });
    renderer.toggle_layer(earthquakes, true)?;

    let plates = match dataset.boundaries {
        Some(geometry) => {
            let id = renderer.add_layer(Layer::Boundaries {
                name: PLATES_LAYER.to_string(),
                geometry,
                color: PLATES_COLOR.to_string(),
                weight: PLATES_WEIGHT,
            });
            renderer.toggle_layer(id, true)?;
            Some(id)
        }
        None => None,
    };

    renderer.add_control(Control::Title {
        html: options.title_html(),
    });
    renderer.add_control(Control::LayerSwitcher);
    renderer.add_control(Control::Legend(Legend::depth(plates.is_some())));

    Ok(ComposedMap {
        base_layers,
        earthquakes,
        plates,
    })
}
