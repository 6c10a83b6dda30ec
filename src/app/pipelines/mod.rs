pub mod exponents_pipeline;
pub mod format;
pub mod local_roots_pipeline;
pub mod moduli_pipeline;

pub use exponents_pipeline::ExponentsPipeline;
pub use local_roots_pipeline::LocalRootsPipeline;
pub use moduli_pipeline::ModuliPipeline;

use crate::domain::model::Report;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Writes the report's CSV under the storage root and returns its display path.
fn save_report<S: Storage>(storage: &S, output_path: &str, report: &Report) -> Result<String> {
    tracing::debug!(
        "Writing {} ({} bytes)",
        report.file_name,
        report.csv_output.len()
    );
    storage.write_file(&report.file_name, report.csv_output.as_bytes())?;
    Ok(format!("{}/{}", output_path, report.file_name))
}
