pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::Task;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHECKPOINTS: [u64; 9] = [
    100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000,
];
pub const DEFAULT_P_MAX: u64 = 6299;
pub const DEFAULT_OUTPUT_PATH: &str = "./data";
/// Sieve bounds above this need more than ~100 MB of flags.
pub const MAX_BOUND: u64 = 100_000_000;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "q47-verify")]
#[command(about = "Numerical checks for Q(n) = n^47 - (n-1)^47: effective moduli, local roots, sparsity exponents")]
pub struct CliConfig {
    /// Which verification to run (default: all)
    #[arg(long, value_enum)]
    pub task: Option<Task>,

    /// Prime degree k of Q(n) = n^k - (n-1)^k
    #[arg(long, default_value_t = 47)]
    pub modulus: u64,

    /// Bounds D at which N_eff(D) is counted
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_CHECKPOINTS)]
    pub checkpoints: Vec<u64>,

    /// Largest prime tested for the local root structure
    #[arg(long, default_value_t = DEFAULT_P_MAX)]
    pub p_max: u64,

    /// Sweep of B values, as decimals or fractions (default sweep if empty)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub b_values: Vec<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Bundle the CSV files and run summary into a ZIP archive
    #[arg(long)]
    pub archive: bool,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// TOML configuration file; command-line --task and --archive still apply
    #[arg(short, long)]
    pub config: Option<String>,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn task(&self) -> Task {
        self.task.unwrap_or(Task::All)
    }

    fn modulus(&self) -> u64 {
        self.modulus
    }

    fn checkpoints(&self) -> &[u64] {
        &self.checkpoints
    }

    fn p_max(&self) -> u64 {
        self.p_max
    }

    fn b_values(&self) -> &[String] {
        &self.b_values
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive(&self) -> bool {
        self.archive
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_prime_modulus("modulus", self.modulus)?;
        validation::validate_checkpoints("checkpoints", &self.checkpoints)?;
        for &d in &self.checkpoints {
            validation::validate_range("checkpoints", d, 2, MAX_BOUND)?;
        }
        validation::validate_range("p_max", self.p_max, 2, MAX_BOUND)?;
        validation::validate_rationals("b_values", &self.b_values)?;
        validation::validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
