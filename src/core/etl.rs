use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct MapEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> MapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load; returns where the page was written.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting map build...");
        self.monitor.log_stats("Start");

        // Extract
        let datasets = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} features (plates: {})",
            datasets.feed.features.len(),
            if datasets.boundaries.is_some() { "yes" } else { "no" }
        );
        self.monitor.log_stats("Extract");

        // Transform
        let dataset = self.pipeline.transform(datasets).await?;
        tracing::info!("Prepared {} markers", dataset.markers.len());
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(dataset).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
