use crate::app::pipelines::{ExponentsPipeline, LocalRootsPipeline, ModuliPipeline};
use crate::core::archive::{self, RunManifest, ARCHIVE_FILE, SUMMARY_FILE};
use crate::core::engine::VerificationEngine;
use crate::domain::model::Task;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub manifest: RunManifest,
    pub summary_path: String,
    pub archive_path: Option<String>,
}

/// Runs every task the configuration selects, then writes the run summary
/// and, if requested, the archive. Each task computes from scratch.
pub fn run_verification<C, S>(config: &C, storage: &S, monitor_enabled: bool) -> Result<RunOutcome>
where
    C: ConfigProvider + Clone,
    S: Storage + Clone,
{
    let task = config.task();
    let mut reports = Vec::new();

    if task.includes(Task::Moduli) {
        let pipeline = ModuliPipeline::new(storage.clone(), config.clone());
        reports.push(VerificationEngine::new_with_monitoring(pipeline, monitor_enabled).run()?);
    }
    if task.includes(Task::LocalRoots) {
        let pipeline = LocalRootsPipeline::new(storage.clone(), config.clone());
        reports.push(VerificationEngine::new_with_monitoring(pipeline, monitor_enabled).run()?);
    }
    if task.includes(Task::Exponents) {
        let pipeline = ExponentsPipeline::new(storage.clone(), config.clone());
        reports.push(VerificationEngine::new_with_monitoring(pipeline, monitor_enabled).run()?);
    }

    let manifest = RunManifest::new(config.modulus(), &reports);
    archive::write_summary(storage, &manifest)?;
    let summary_path = format!("{}/{}", config.output_path(), SUMMARY_FILE);

    let archive_path = if config.archive() {
        archive::write_archive(storage, &reports)?;
        Some(format!("{}/{}", config.output_path(), ARCHIVE_FILE))
    } else {
        None
    };

    Ok(RunOutcome {
        manifest,
        summary_path,
        archive_path,
    })
}
