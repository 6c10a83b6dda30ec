use num_rational::Rational64;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three verifications, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    Moduli,
    LocalRoots,
    Exponents,
    All,
}

impl Task {
    pub fn includes(self, other: Task) -> bool {
        self == Task::All || self == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Moduli => "moduli",
            Task::LocalRoots => "local-roots",
            Task::Exponents => "exponents",
            Task::All => "all",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splitting behaviour of a prime `p` in the degree-`k` root field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimeClass {
    /// `p == k`
    Ramified,
    /// `p ≡ 1 (mod k)`
    Splitting,
    Inert,
}

impl PrimeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimeClass::Ramified => "ramified",
            PrimeClass::Splitting => "splitting",
            PrimeClass::Inert => "inert",
        }
    }
}

impl fmt::Display for PrimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// N_eff(D) at one checkpoint against `D / (log D)^alpha`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuliRecord {
    pub bound: u64,
    pub count: u64,
    pub asymptotic: f64,
    pub ratio: f64,
    pub fraction_percent: f64,
}

impl ModuliRecord {
    pub fn new(bound: u64, count: u64, alpha: f64) -> Self {
        let d = bound as f64;
        let asymptotic = d / d.ln().powf(alpha);
        let ratio = if asymptotic > 0.0 && asymptotic.is_finite() {
            count as f64 / asymptotic
        } else {
            0.0
        };
        let fraction_percent = if bound > 0 {
            count as f64 / d * 100.0
        } else {
            0.0
        };
        Self {
            bound,
            count,
            asymptotic,
            ratio,
            fraction_percent,
        }
    }

    /// Share of moduli up to D that are not effective.
    pub fn null_percent(&self) -> f64 {
        100.0 - self.fraction_percent
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRootRecord {
    pub prime: u64,
    pub class: PrimeClass,
    pub theory: u64,
    pub brute: u64,
    pub matches: bool,
}

/// `Q(r) mod k` over every residue `r` of the degree `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueCheck {
    pub modulus: u64,
    pub expected: u64,
    /// `(r, Q(r) mod k)` for every residue that missed `expected`.
    pub failures: Vec<(u64, u64)>,
}

impl ResidueCheck {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExponentStatus {
    /// Negative exponent: the level θ = 1/2 is reached.
    Succeeds,
    Fails,
}

impl ExponentStatus {
    pub fn of(exponent: Rational64) -> Self {
        if exponent < Rational64::zero() {
            ExponentStatus::Succeeds
        } else {
            ExponentStatus::Fails
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExponentStatus::Succeeds => "θ=1/2",
            ExponentStatus::Fails => "FAILS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExponentRecord {
    pub label: String,
    pub b: Rational64,
    pub global: Rational64,
    pub restricted: Rational64,
}

impl ExponentRecord {
    pub fn global_status(&self) -> ExponentStatus {
        ExponentStatus::of(self.global)
    }

    pub fn restricted_status(&self) -> ExponentStatus {
        ExponentStatus::of(self.restricted)
    }

    pub fn global_f64(&self) -> f64 {
        self.global.to_f64().unwrap_or(f64::NAN)
    }

    pub fn restricted_f64(&self) -> f64 {
        self.restricted.to_f64().unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task: Task,
    pub output_file: String,
    pub checks: usize,
    pub failures: usize,
    pub notes: Vec<String>,
}

impl TaskSummary {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

/// Rendered output of one pipeline, ready to be printed and persisted.
#[derive(Debug, Clone)]
pub struct Report {
    pub summary: TaskSummary,
    pub file_name: String,
    pub table: String,
    pub csv_output: String,
}
