use crate::domain::ports::MapRenderer;
use crate::render::{Control, Layer, LayerId};
use crate::utils::error::{MapError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub id: LayerId,
    pub visible: bool,
    pub base: bool,
    pub layer: Layer,
}

/// The map being built: view, layers and controls.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    center: [f64; 2],
    zoom: u8,
    layers: Vec<LayerEntry>,
    controls: Vec<Control>,
}

impl MapState {
    pub fn new(center: [f64; 2], zoom: u8) -> Self {
        Self {
            center,
            zoom,
            layers: Vec::new(),
            controls: Vec::new(),
        }
    }

    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn layers(&self) -> &[LayerEntry] {
        &self.layers
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn layer(&self, id: LayerId) -> Option<&LayerEntry> {
        self.layers.iter().find(|entry| entry.id == id)
    }

    pub fn is_visible(&self, id: LayerId) -> bool {
        self.layer(id).is_some_and(|entry| entry.visible)
    }
}

impl MapRenderer for MapState {
    fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.layers.len());
        tracing::debug!("Adding layer {:?} '{}'", id, layer.name());
        self.layers.push(LayerEntry {
            id,
            visible: false,
            base: layer.is_base(),
            layer,
        });
        id
    }

    fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    fn toggle_layer(&mut self, id: LayerId, visible: bool) -> Result<()> {
        let base = self
            .layer(id)
            .map(|entry| entry.base)
            .ok_or_else(|| MapError::RenderError {
                message: format!("unknown layer {:?}", id),
            })?;

        // 底圖一次只能顯示一個
        if base && visible {
            for entry in self.layers.iter_mut().filter(|entry| entry.base) {
                entry.visible = false;
            }
        }

        for entry in self.layers.iter_mut().filter(|entry| entry.id == id) {
            entry.visible = visible;
        }
        Ok(())
    }
}
