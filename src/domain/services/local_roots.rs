//! Local root structure of `Q(n) = n^k - (n-1)^k`.
//!
//! For a prime degree `k`, a root mod `p` is a residue where
//! `(n / (n-1))^k ≡ 1`, so the count is `gcd(k, p-1) - 1`: `k - 1` roots
//! when `p ≡ 1 (mod k)` and none otherwise. At `p = k` Fermat gives
//! `Q(n) ≡ 1`, so there are no roots either.

use super::arith::mod_pow;
use super::DEFAULT_MODULUS;
use crate::domain::model::{LocalRootRecord, PrimeClass, ResidueCheck};

/// `Q(n) = n^degree - (n-1)^degree` for a fixed prime degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalRootModel {
    degree: u64,
}

impl Default for LocalRootModel {
    fn default() -> Self {
        Self::new(DEFAULT_MODULUS)
    }
}

impl LocalRootModel {
    pub const fn new(degree: u64) -> Self {
        Self { degree }
    }

    pub fn degree(&self) -> u64 {
        self.degree
    }

    pub fn classify(&self, p: u64) -> PrimeClass {
        if p == self.degree {
            PrimeClass::Ramified
        } else if (p - 1) % self.degree == 0 {
            PrimeClass::Splitting
        } else {
            PrimeClass::Inert
        }
    }

    pub fn theoretical_root_count(&self, p: u64) -> u64 {
        match self.classify(p) {
            PrimeClass::Splitting => self.degree - 1,
            PrimeClass::Ramified | PrimeClass::Inert => 0,
        }
    }

    /// `Q(n) mod p` for `n` in `[0, p)`; `n - 1` wraps to `p - 1` at zero.
    pub fn evaluate(&self, n: u64, p: u64) -> u64 {
        let previous = (n + p - 1) % p;
        let lhs = mod_pow(n, self.degree, p);
        let rhs = mod_pow(previous, self.degree, p);
        (lhs + p - rhs) % p
    }

    /// ω(p) by exhaustive search over every residue mod `p`. Requires `p >= 2`.
    pub fn root_count(&self, p: u64) -> u64 {
        (0..p).filter(|&n| self.evaluate(n, p) == 0).count() as u64
    }

    /// Brute-force count checked against the classification.
    pub fn verify_prime(&self, p: u64) -> LocalRootRecord {
        let theory = self.theoretical_root_count(p);
        let brute = self.root_count(p);
        LocalRootRecord {
            prime: p,
            class: self.classify(p),
            theory,
            brute,
            matches: brute == theory,
        }
    }

    /// `Q(r) ≡ 1 (mod degree)` for every residue `r`.
    pub fn residue_check(&self) -> ResidueCheck {
        let k = self.degree;
        let failures = (0..k)
            .map(|r| (r, self.evaluate(r, k)))
            .filter(|&(_, value)| value != 1)
            .collect();
        ResidueCheck {
            modulus: k,
            expected: 1,
            failures,
        }
    }
}

/// ω(p) for `Q(n) = n^47 - (n-1)^47`.
pub fn local_root_count(p: u64) -> u64 {
    LocalRootModel::default().root_count(p)
}

pub fn classify(p: u64) -> PrimeClass {
    LocalRootModel::default().classify(p)
}

pub fn theoretical_root_count(p: u64) -> u64 {
    LocalRootModel::default().theoretical_root_count(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::primes::sieve_primes;

    #[test]
    fn test_ramified_prime() {
        assert_eq!(classify(47), PrimeClass::Ramified);
        assert_eq!(local_root_count(47), 0);
        assert_eq!(theoretical_root_count(47), 0);
    }

    #[test]
    fn test_first_splitting_prime() {
        assert_eq!(classify(283), PrimeClass::Splitting);
        assert_eq!(local_root_count(283), 46);

        let below_283: Vec<u64> = sieve_primes(282)
            .into_iter()
            .filter(|&p| classify(p) == PrimeClass::Splitting)
            .collect();
        assert!(below_283.is_empty());
    }

    #[test]
    fn test_primes_up_to_100() {
        let primes = sieve_primes(100);
        assert_eq!(primes.len(), 25);
        for p in primes {
            let class = classify(p);
            if p == 47 {
                assert_eq!(class, PrimeClass::Ramified);
            } else {
                assert_eq!(class, PrimeClass::Inert, "p = {}", p);
                assert_eq!(local_root_count(p), 0, "p = {}", p);
            }
        }
    }

    #[test]
    fn test_wraparound_at_zero() {
        // Q(0) = 0 - (-1)^47 = 1
        let model = LocalRootModel::default();
        for p in [2, 3, 53, 283] {
            assert_eq!(model.evaluate(0, p), 1 % p);
        }
    }

    #[test]
    fn test_residue_check_mod_47() {
        let check = LocalRootModel::default().residue_check();
        assert_eq!(check.modulus, 47);
        assert!(check.passed(), "failures: {:?}", check.failures);
    }

    #[test]
    fn test_trichotomy_up_to_1000() {
        let model = LocalRootModel::default();
        for p in sieve_primes(1000) {
            let record = model.verify_prime(p);
            assert!(record.matches, "{:?}", record);
        }
    }

    #[test]
    fn test_small_degrees() {
        // k = 3: p ≡ 1 (mod 3) has the two primitive cube roots of unity
        let model = LocalRootModel::new(3);
        assert_eq!(model.classify(3), PrimeClass::Ramified);
        assert_eq!(model.root_count(7), 2);
        assert_eq!(model.root_count(5), 0);
        assert!(model.residue_check().passed());

        let model = LocalRootModel::new(5);
        assert_eq!(model.classify(11), PrimeClass::Splitting);
        assert_eq!(model.root_count(11), 4);
        assert_eq!(model.root_count(13), 0);
        assert!(model.residue_check().passed());
    }

    #[test]
    fn test_splitting_record() {
        let record = LocalRootModel::default().verify_prime(659);
        assert_eq!(
            record,
            LocalRootRecord {
                prime: 659,
                class: PrimeClass::Splitting,
                theory: 46,
                brute: 46,
                matches: true,
            }
        );
    }
}
