use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ArchiveEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ArchiveEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting archive run...");

        tracing::info!("Fetching submissions...");
        let rows = self.pipeline.extract().await?;
        tracing::info!("Fetched {} submissions", rows.len());
        self.monitor.log_stats("extract");

        tracing::info!("Planning downloads...");
        let plan = self.pipeline.transform(rows).await?;
        let planned: usize = plan.batches.iter().map(|batch| batch.jobs.len()).sum();
        tracing::info!(
            "Planned {} downloads across {} divisions",
            planned,
            plan.batches.len()
        );
        self.monitor.log_stats("transform");

        tracing::info!("Downloading and organizing...");
        let output_path = self.pipeline.load(plan).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
