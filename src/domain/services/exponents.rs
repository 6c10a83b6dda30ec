//! Cauchy–Schwarz exponents for the sparse part of the error sum.
//!
//! With effective-prime density `δ = 1/φ(k)` and Landau–Ramanujan exponent
//! `α = 1 - δ`, one sparsity factor gives the global exponent `(B - α)/2`
//! and two give the restricted exponent `B'/2 - α`. For `k = 47` these are
//! `(46B - 45)/92` and `(23B' - 45)/46`.

use super::DEFAULT_MODULUS;
use crate::domain::model::ExponentRecord;
use num_rational::Rational64;
use num_traits::{One, ToPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentModel {
    phi: i64,
}

impl Default for ExponentModel {
    fn default() -> Self {
        Self::for_modulus(DEFAULT_MODULUS)
    }
}

impl ExponentModel {
    /// `modulus` is prime, so `φ(modulus) = modulus - 1`.
    pub fn for_modulus(modulus: u64) -> Self {
        Self {
            phi: modulus as i64 - 1,
        }
    }

    pub fn phi(&self) -> i64 {
        self.phi
    }

    pub fn density(&self) -> Rational64 {
        Rational64::new(1, self.phi)
    }

    pub fn alpha(&self) -> Rational64 {
        Rational64::one() - self.density()
    }

    pub fn global(&self, b: Rational64) -> Rational64 {
        (b - self.alpha()) / 2
    }

    pub fn restricted(&self, b_prime: Rational64) -> Rational64 {
        b_prime / 2 - self.alpha()
    }

    /// `(φB - (φ-1)) / 2φ`; exact whenever `φB` is.
    pub fn global_f64(&self, b: f64) -> f64 {
        let phi = self.phi as f64;
        (phi * b - (phi - 1.0)) / (2.0 * phi)
    }

    /// `(φB' - 2(φ-1)) / 2φ`.
    pub fn restricted_f64(&self, b_prime: f64) -> f64 {
        let phi = self.phi as f64;
        (phi * b_prime - 2.0 * (phi - 1.0)) / (2.0 * phi)
    }

    /// `B` where the global exponent vanishes: `α`.
    pub fn global_threshold(&self) -> Rational64 {
        self.alpha()
    }

    /// `B'` where the restricted exponent vanishes: `2α`.
    pub fn restricted_threshold(&self) -> Rational64 {
        self.alpha() * 2
    }

    /// Sweep points 0.5, 0.8, 0.9, α, 0.98, 1, 1.5, 2α.
    pub fn default_sweep(&self) -> Vec<Rational64> {
        vec![
            Rational64::new(1, 2),
            Rational64::new(4, 5),
            Rational64::new(9, 10),
            self.global_threshold(),
            Rational64::new(49, 50),
            Rational64::one(),
            Rational64::new(3, 2),
            self.restricted_threshold(),
        ]
    }

    /// Thresholds print as fractions, everything else to four decimals.
    pub fn label(&self, b: Rational64) -> String {
        if b == self.global_threshold() || b == self.restricted_threshold() {
            b.to_string()
        } else {
            format!("{:.4}", b.to_f64().unwrap_or(f64::NAN))
        }
    }

    pub fn evaluate(&self, b: Rational64) -> ExponentRecord {
        ExponentRecord {
            label: self.label(b),
            b,
            global: self.global(b),
            restricted: self.restricted(b),
        }
    }
}

/// `(46B - 45) / 92`.
pub fn global_exponent(b: f64) -> f64 {
    ExponentModel::default().global_f64(b)
}

/// `(23B' - 45) / 46`.
pub fn restricted_exponent(b_prime: f64) -> f64 {
    ExponentModel::default().restricted_f64(b_prime)
}

/// Parses `"45/46"`, `"-3"` or `"0.98"` exactly.
pub fn parse_rational(input: &str) -> Option<Rational64> {
    let input = input.trim();
    if let Some((num, den)) = input.split_once('/') {
        let num: i64 = num.trim().parse().ok()?;
        let den: i64 = den.trim().parse().ok()?;
        if den == 0 {
            return None;
        }
        return Some(Rational64::new(num, den));
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) || frac.len() > 15 {
        return None;
    }

    let scale = 10i64.checked_pow(frac.len() as u32)?;
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let magnitude = whole.checked_mul(scale)?.checked_add(frac)?;
    let numerator = if negative { -magnitude } else { magnitude };
    Some(Rational64::new(numerator, scale))
}
