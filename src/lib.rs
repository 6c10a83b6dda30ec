pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use app::pipelines::{ExponentsPipeline, LocalRootsPipeline, ModuliPipeline};
pub use core::{
    engine::VerificationEngine,
    runner::{run_verification, RunOutcome},
};
pub use domain::services::{
    classify, count_effective_moduli, global_exponent, local_root_count, restricted_exponent,
    sieve_primes,
};
pub use utils::error::{Result, VerifyError};
