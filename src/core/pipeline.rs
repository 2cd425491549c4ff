use crate::core::loader::DatasetLoader;
use crate::core::marker::{markers_geojson, to_marker};
use crate::core::{ConfigProvider, Datasets, MapDataset, Pipeline, Storage};
use crate::domain::model::EarthquakeRecord;
use crate::render::{compose_map, LeafletRenderer};
use crate::utils::error::Result;

pub const PAGE_FILENAME: &str = "index.html";
pub const GEOJSON_FILENAME: &str = "earthquakes.geojson";

/// Fetch, classify and render the earthquake map.
pub struct MapPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) loader: DatasetLoader,
}

impl<S: Storage, C: ConfigProvider> MapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let loader = DatasetLoader::new(config.request_timeout());
        Self {
            storage,
            config,
            loader,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MapPipeline<S, C> {
    async fn extract(&self) -> Result<Datasets> {
        tracing::info!("🚀 Fetching earthquake feed from: {}", self.config.feed_url());
        if let Some(source) = self.config.plates_source() {
            tracing::info!("🚀 Fetching plate boundaries from: {}", source);
        }

        self.loader
            .load(self.config.feed_url(), self.config.plates_source())
            .await
    }

    async fn transform(&self, data: Datasets) -> Result<MapDataset> {
        if let Some(metadata) = &data.feed.metadata {
            tracing::info!(
                "📋 {} ({} events reported)",
                metadata.title.as_deref().unwrap_or("Untitled feed"),
                metadata.count.unwrap_or(data.feed.features.len() as u64)
            );
        }

        let mut markers = Vec::with_capacity(data.feed.features.len());
        let mut skipped_records = 0;

        for (index, feature) in data.feed.features.iter().enumerate() {
            let marker = EarthquakeRecord::from_feature(index, feature)
                .and_then(|record| to_marker(index, &record));

            match marker {
                Ok(marker) => markers.push(marker),
                Err(e) if self.config.skip_invalid_records() => {
                    tracing::warn!("⚠️ Skipping record: {}", e);
                    skipped_records += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "✅ Built {} markers ({} skipped)",
            markers.len(),
            skipped_records
        );

        Ok(MapDataset {
            markers,
            boundaries: data.boundaries,
            skipped_records,
        })
    }

    async fn load(&self, dataset: MapDataset) -> Result<String> {
        tracing::info!("💾 Rendering map to storage");

        if self.config.emit_geojson() {
            let geojson = serde_json::to_string_pretty(&markers_geojson(&dataset.markers))?;
            self.storage
                .write_file(GEOJSON_FILENAME, geojson.as_bytes())
                .await?;
            tracing::info!("📦 Markers saved: {}/{}", self.config.output_path(), GEOJSON_FILENAME);
        }

        let options = self.config.map_options();
        let mut renderer = LeafletRenderer::new(&options);
        compose_map(&mut renderer, dataset, &options)?;
        let page = renderer.render_html()?;

        tracing::debug!("Writing page ({} bytes) to storage", page.len());
        self.storage.write_file(PAGE_FILENAME, page.as_bytes()).await?;

        let output_path = format!("{}/{}", self.config.output_path(), PAGE_FILENAME);
        tracing::info!("📦 Map saved: {}", output_path);
        Ok(output_path)
    }
}
