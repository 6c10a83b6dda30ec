use super::format::{thousands, thousands_f64, write_csv};
use super::save_report;
use crate::domain::model::{ModuliRecord, Report, Task, TaskSummary};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::domain::services::moduli::{count_effective_in_class, ResidueClass};
use crate::utils::error::Result;
use std::fmt::Write;

pub const MODULI_CSV: &str = "effective_moduli_count.csv";

/// N_eff(D) at each checkpoint against `D / (log D)^alpha`.
pub struct ModuliPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ModuliPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn alpha(&self) -> f64 {
        let phi = (self.config.modulus() - 1) as f64;
        (phi - 1.0) / phi
    }

    fn alpha_label(&self) -> String {
        let k = self.config.modulus();
        format!("{}/{}", k - 2, k - 1)
    }
}

/// Slope of `log(N/D)` against `log log D` between two checkpoints, negated.
pub fn fit_alpha(first: &ModuliRecord, second: &ModuliRecord) -> Option<f64> {
    if first.count == 0 || second.count == 0 {
        return None;
    }
    let x1 = (first.bound as f64).ln().ln();
    let x2 = (second.bound as f64).ln().ln();
    if !(x2 - x1).is_normal() {
        return None;
    }
    let y1 = (first.count as f64 / first.bound as f64).ln();
    let y2 = (second.count as f64 / second.bound as f64).ln();
    Some(-(y2 - y1) / (x2 - x1))
}

impl<S: Storage, C: ConfigProvider> Pipeline for ModuliPipeline<S, C> {
    type Record = ModuliRecord;

    fn task(&self) -> Task {
        Task::Moduli
    }

    fn extract(&self) -> Result<Vec<ModuliRecord>> {
        let class = ResidueClass::one_mod(self.config.modulus());
        let alpha = self.alpha();

        let records = self
            .config
            .checkpoints()
            .iter()
            .map(|&bound| {
                let count = count_effective_in_class(bound, class);
                tracing::debug!("N_eff({}) = {}", bound, count);
                ModuliRecord::new(bound, count, alpha)
            })
            .collect();

        Ok(records)
    }

    fn transform(&self, records: Vec<ModuliRecord>) -> Result<Report> {
        let k = self.config.modulus();
        let alpha = self.alpha();
        let alpha_label = self.alpha_label();
        let rule = "-".repeat(65);
        let banner = "=".repeat(65);

        let mut table = String::new();
        writeln!(table, "{}", banner).ok();
        writeln!(
            table,
            "  Effective Moduli Count: N_eff(D) vs D/(log D)^{{{}}}",
            alpha_label
        )
        .ok();
        writeln!(table, "  Q_eff = {{q : p|q => p ≡ 1 (mod {})}}", k).ok();
        writeln!(table, "{}", banner).ok();
        writeln!(table).ok();
        writeln!(
            table,
            "{:>10}  {:>10}  {:>16}  {:>8}  {:>12}",
            "D",
            "N_eff(D)",
            format!("D/(logD)^{}", alpha_label),
            "Ratio",
            "D fraction"
        )
        .ok();
        writeln!(table, "{}", rule).ok();
        for r in &records {
            writeln!(
                table,
                "{:>10}  {:>10}  {:>16}  {:>8.4}  {:>10.4}%",
                thousands(r.bound),
                thousands(r.count),
                thousands_f64(r.asymptotic, 2),
                r.ratio,
                r.fraction_percent
            )
            .ok();
        }
        writeln!(table, "{}", rule).ok();

        let mut notes = Vec::new();

        writeln!(table).ok();
        writeln!(table, "Null moduli fraction (q ∉ Q_eff):").ok();
        let tail_start = records.len().saturating_sub(3);
        for r in &records[tail_start..] {
            writeln!(
                table,
                "  D = {:>10}: {:.2}% of moduli contribute zero to BV error",
                thousands(r.bound),
                r.null_percent()
            )
            .ok();
            notes.push(format!("null fraction at D = {}: {:.2}%", r.bound, r.null_percent()));
        }

        if let [.., first, second] = records.as_slice() {
            if let Some(alpha_fit) = fit_alpha(first, second) {
                let relative_error = (alpha_fit - alpha).abs() / alpha * 100.0;
                writeln!(table).ok();
                writeln!(table, "Exponent verification (log-log fit):").ok();
                writeln!(table, "  Fitted exponent alpha = {:.4}", alpha_fit).ok();
                writeln!(
                    table,
                    "  Theoretical value     = {:.4} = {}",
                    alpha, alpha_label
                )
                .ok();
                writeln!(table, "  Relative error        = {:.2}%", relative_error).ok();
                notes.push(format!(
                    "fitted alpha {:.4} vs {} ({:.2}% relative error)",
                    alpha_fit, alpha_label, relative_error
                ));
            }
        }

        let header_asymptotic = format!("Asymptotic_D_over_logD_{}_{}", k - 2, k - 1);
        let csv_output = write_csv(
            &["# N_eff(D) = #{q ≤ D : q ∈ Q_eff}".to_string()],
            &["D", "N_eff", header_asymptotic.as_str(), "Ratio", "Fraction_percent"],
            records.iter().map(|r| {
                vec![
                    r.bound.to_string(),
                    r.count.to_string(),
                    format!("{:.2}", r.asymptotic),
                    format!("{:.4}", r.ratio),
                    format!("{:.4}", r.fraction_percent),
                ]
            }),
        )?;

        Ok(Report {
            summary: TaskSummary {
                task: Task::Moduli,
                output_file: MODULI_CSV.to_string(),
                checks: records.len(),
                failures: 0,
                notes,
            },
            file_name: MODULI_CSV.to_string(),
            table,
            csv_output,
        })
    }

    fn load(&self, report: &Report) -> Result<String> {
        save_report(&self.storage, self.config.output_path(), report)
    }
}
