use crate::domain::feed::FeatureCollection;
use crate::domain::model::{BoundaryGeometry, Datasets};
use crate::utils::error::{MapError, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the earthquake feed and the plate boundaries.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: Client,
    timeout: Duration,
}

impl DatasetLoader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(MapError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<FeatureCollection> {
        let bytes = self.get_bytes(url).await?;
        let feed = FeatureCollection::from_slice(&bytes)?;
        tracing::info!("🌍 Feed returned {} features", feed.features.len());
        Ok(feed)
    }

    /// `source` is an `http(s)` URL or a local file path.
    pub async fn fetch_boundaries(&self, source: &str) -> Result<BoundaryGeometry> {
        let bytes = if is_remote(source) {
            self.get_bytes(source).await?
        } else {
            tracing::debug!("Reading plate boundaries from file: {}", source);
            tokio::fs::read(source).await?
        };
        BoundaryGeometry::from_slice(&bytes)
    }

    /// Runs both fetches concurrently.
    ///
    /// The feed is required. A failed boundary fetch is logged and the map is
    /// rendered without the plates overlay.
    pub async fn load(&self, feed_url: &str, plates_source: Option<&str>) -> Result<Datasets> {
        let plates = async {
            match plates_source {
                Some(source) => Some(self.fetch_boundaries(source).await),
                None => None,
            }
        };

        let (feed, plates) = tokio::join!(self.fetch_feed(feed_url), plates);
        let feed = feed?;

        let boundaries = match plates {
            Some(Ok(boundaries)) => {
                tracing::info!("🗺️ Plate boundaries loaded");
                Some(boundaries)
            }
            Some(Err(e)) => {
                tracing::warn!(
                    "⚠️ Plate boundaries unavailable, rendering without them: {}",
                    e
                );
                None
            }
            None => {
                tracing::debug!("No plate boundary source configured");
                None
            }
        };

        Ok(Datasets { feed, boundaries })
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
