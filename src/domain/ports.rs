use crate::domain::model::{Report, Task};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn task(&self) -> Task;
    fn modulus(&self) -> u64;
    fn checkpoints(&self) -> &[u64];
    fn p_max(&self) -> u64;
    /// Raw sweep values; empty means the model's default sweep.
    fn b_values(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn archive(&self) -> bool;
}

/// Compute, tabulate, persist.
pub trait Pipeline {
    type Record;

    fn task(&self) -> Task;
    fn extract(&self) -> Result<Vec<Self::Record>>;
    fn transform(&self, records: Vec<Self::Record>) -> Result<Report>;
    fn load(&self, report: &Report) -> Result<String>;
}
