use super::{DEFAULT_CHECKPOINTS, DEFAULT_OUTPUT_PATH, DEFAULT_P_MAX, MAX_BOUND};
use crate::core::ConfigProvider;
use crate::domain::model::Task;
use crate::domain::services::DEFAULT_MODULUS;
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub moduli: ModuliConfig,
    #[serde(default)]
    pub local_roots: LocalRootsConfig,
    #[serde(default)]
    pub exponents: ExponentsConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: Option<String>,
    pub task: Option<Task>,
    #[serde(default = "default_modulus")]
    pub modulus: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuliConfig {
    #[serde(default = "default_checkpoints")]
    pub checkpoints: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalRootsConfig {
    #[serde(default = "default_p_max")]
    pub p_max: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExponentsConfig {
    #[serde(default)]
    pub b_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default)]
    pub archive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub system_stats: Option<bool>,
}

fn default_modulus() -> u64 {
    DEFAULT_MODULUS
}

fn default_checkpoints() -> Vec<u64> {
    DEFAULT_CHECKPOINTS.to_vec()
}

fn default_p_max() -> u64 {
    DEFAULT_P_MAX
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: None,
            task: None,
            modulus: default_modulus(),
        }
    }
}

impl Default for ModuliConfig {
    fn default() -> Self {
        Self {
            checkpoints: default_checkpoints(),
        }
    }
}

impl Default for LocalRootsConfig {
    fn default() -> Self {
        Self {
            p_max: default_p_max(),
        }
    }
}

impl TomlConfig {
    /// Reads and parses a TOML file; `${VAR}` references are expanded first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VerifyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VerifyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VerifyError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_prime_modulus("run.modulus", self.run.modulus)?;
        validation::validate_checkpoints("moduli.checkpoints", &self.moduli.checkpoints)?;
        for &d in &self.moduli.checkpoints {
            validation::validate_range("moduli.checkpoints", d, 2, MAX_BOUND)?;
        }
        validation::validate_range("local_roots.p_max", self.local_roots.p_max, 2, MAX_BOUND)?;
        validation::validate_rationals("exponents.b_values", &self.exponents.b_values)?;
        validation::validate_path("output.path", &self.output.path)?;
        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring
            .as_ref()
            .map(|m| m.enabled && m.system_stats.unwrap_or(true))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn task(&self) -> Task {
        self.run.task.unwrap_or(Task::All)
    }

    fn modulus(&self) -> u64 {
        self.run.modulus
    }

    fn checkpoints(&self) -> &[u64] {
        &self.moduli.checkpoints
    }

    fn p_max(&self) -> u64 {
        self.local_roots.p_max
    }

    fn b_values(&self) -> &[String] {
        &self.exponents.b_values
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn archive(&self) -> bool {
        self.output.archive
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
