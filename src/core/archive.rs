use crate::domain::model::{Report, TaskSummary};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SUMMARY_FILE: &str = "run_summary.json";
pub const ARCHIVE_FILE: &str = "q47_verification.zip";

/// Machine-readable account of one run, written next to the CSV files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub modulus: u64,
    pub tasks: Vec<TaskSummary>,
}

impl RunManifest {
    pub fn new(modulus: u64, reports: &[Report]) -> Self {
        Self {
            generated_at: Utc::now(),
            modulus,
            tasks: reports.iter().map(|r| r.summary.clone()).collect(),
        }
    }

    pub fn failures(&self) -> usize {
        self.tasks.iter().map(|t| t.failures).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.tasks.iter().all(TaskSummary::passed)
    }
}

pub fn write_summary<S: Storage>(storage: &S, manifest: &RunManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    storage.write_file(SUMMARY_FILE, json.as_bytes())
}

/// Bundles every report's CSV and the run summary, read back from storage.
pub fn write_archive<S: Storage>(storage: &S, reports: &[Report]) -> Result<()> {
    let mut members: Vec<&str> = reports.iter().map(|r| r.file_name.as_str()).collect();
    members.push(SUMMARY_FILE);

    tracing::debug!("Creating ZIP archive with {} files", members.len());

    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for name in members {
            let data = storage.read_file(name)?;
            zip.start_file(name, SimpleFileOptions::default())?;
            zip.write_all(&data)?;
        }
        zip.finish()?.into_inner()
    };

    tracing::debug!("Writing ZIP archive ({} bytes) to storage", zip_data.len());
    storage.write_file(ARCHIVE_FILE, &zip_data)
}
