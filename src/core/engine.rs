use crate::domain::model::Report;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct VerificationEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> VerificationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs compute, tabulate and export, printing the table on the way.
    /// Failed checks are carried in the report summary, not returned as errors.
    pub fn run(&self) -> Result<Report> {
        let task = self.pipeline.task();
        tracing::info!("Starting {} verification", task);

        let records = self.pipeline.extract()?;
        tracing::info!("Computed {} records", records.len());
        self.monitor.log_stats("compute");

        let mut report = self.pipeline.transform(records)?;
        self.monitor.log_stats("tabulate");
        println!("{}", report.table);

        let output_path = self.pipeline.load(&report)?;
        tracing::info!("Results saved to {}", output_path);
        self.monitor.log_stats("export");
        report.summary.output_file = output_path;

        if report.summary.passed() {
            tracing::info!(
                "✅ {}: {} checks passed",
                task,
                report.summary.checks
            );
        } else {
            tracing::warn!(
                "❌ {}: {} of {} checks failed",
                task,
                report.summary.failures,
                report.summary.checks
            );
        }
        self.monitor.log_final_stats();

        Ok(report)
    }
}
