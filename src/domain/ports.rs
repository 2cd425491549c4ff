use crate::domain::model::{Datasets, MapDataset};
use crate::render::{Control, Layer, LayerId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn feed_url(&self) -> &str;
    /// URL or local path of the plate boundaries; `None` disables the overlay.
    fn plates_source(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn skip_invalid_records(&self) -> bool;
    fn emit_geojson(&self) -> bool;
    fn map_options(&self) -> crate::render::MapOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Datasets>;
    async fn transform(&self, data: Datasets) -> Result<MapDataset>;
    async fn load(&self, dataset: MapDataset) -> Result<String>;
}

/// Whatever draws the map. Layers start hidden until toggled on.
pub trait MapRenderer {
    fn add_layer(&mut self, layer: Layer) -> LayerId;
    fn add_control(&mut self, control: Control);
    fn toggle_layer(&mut self, id: LayerId, visible: bool) -> Result<()>;
}
