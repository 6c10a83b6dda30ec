//! Counting integers whose prime factors all lie in an allowed set.
//!
//! An integer is effective iff it has no prime factor outside the allowed
//! set, so one pass over the multiples of each disallowed prime clears
//! every non-effective integer without factoring anything.

use super::primes::sieve_primes;
use super::DEFAULT_MODULUS;

/// The primes `p` with `p ≡ residue (mod modulus)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueClass {
    pub modulus: u64,
    pub residue: u64,
}

impl ResidueClass {
    pub const fn new(modulus: u64, residue: u64) -> Self {
        Self { modulus, residue }
    }

    /// `p ≡ 1 (mod modulus)`; the modulus itself is never a member.
    pub const fn one_mod(modulus: u64) -> Self {
        Self::new(modulus, 1)
    }

    pub fn contains(&self, p: u64) -> bool {
        p % self.modulus == self.residue % self.modulus
    }
}

/// Effectiveness flags for every integer in `[0, bound]`.
#[derive(Debug, Clone)]
pub struct EffectiveSieve {
    flags: Vec<bool>,
}

impl EffectiveSieve {
    /// Sieves `[0, bound]`, clearing every multiple of each prime for which
    /// `is_effective_prime` is false. Memory is `O(bound)`.
    pub fn new<F>(bound: u64, is_effective_prime: F) -> Self
    where
        F: Fn(u64) -> bool,
    {
        let n = bound as usize;
        let mut flags = vec![true; n + 1];
        flags[0] = false;

        for p in sieve_primes(bound) {
            if is_effective_prime(p) {
                continue;
            }
            let step = p as usize;
            let mut m = step;
            while m <= n {
                flags[m] = false;
                m += step;
            }
        }

        Self { flags }
    }

    pub fn for_class(bound: u64, class: ResidueClass) -> Self {
        Self::new(bound, |p| class.contains(p))
    }

    pub fn bound(&self) -> u64 {
        (self.flags.len() - 1) as u64
    }

    /// False for 0 and for anything beyond the sieved bound.
    pub fn is_effective(&self, n: u64) -> bool {
        self.flags.get(n as usize).copied().unwrap_or(false)
    }

    pub fn count(&self) -> u64 {
        self.flags.iter().filter(|&&f| f).count() as u64
    }

    /// Effective integers in `[1, d]`, with `d` clamped to the sieved bound.
    pub fn count_up_to(&self, d: u64) -> u64 {
        let end = d.min(self.bound()) as usize;
        self.flags[..=end].iter().filter(|&&f| f).count() as u64
    }

    pub fn effective_moduli(&self) -> impl Iterator<Item = u64> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i as u64))
    }
}

/// N_eff(bound) for an arbitrary residue class of allowed primes.
pub fn count_effective_in_class(bound: u64, class: ResidueClass) -> u64 {
    EffectiveSieve::for_class(bound, class).count()
}

/// N_eff(bound): integers in `[1, bound]` all of whose prime factors are
/// `≡ 1 (mod 47)`.
pub fn count_effective_moduli(bound: u64) -> u64 {
    count_effective_in_class(bound, ResidueClass::one_mod(DEFAULT_MODULUS))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference count by trial factorisation of every integer.
    fn brute_force_count(bound: u64, class: ResidueClass) -> u64 {
        (1..=bound)
            .filter(|&n| {
                let mut rest = n;
                let mut d = 2;
                while d * d <= rest {
                    if rest % d == 0 {
                        if !class.contains(d) {
                            return false;
                        }
                        while rest % d == 0 {
                            rest /= d;
                        }
                    }
                    d += 1;
                }
                rest == 1 || class.contains(rest)
            })
            .count() as u64
    }

    #[test]
    fn test_zero_and_one() {
        assert_eq!(count_effective_moduli(0), 0);
        assert_eq!(count_effective_moduli(1), 1);

        let sieve = EffectiveSieve::for_class(0, ResidueClass::one_mod(47));
        assert_eq!(sieve.bound(), 0);
        assert!(!sieve.is_effective(0));
    }

    #[test]
    fn test_modulus_itself_is_not_effective() {
        let class = ResidueClass::one_mod(47);
        assert!(!class.contains(47));
        assert!(class.contains(283));

        let sieve = EffectiveSieve::for_class(300, class);
        assert!(!sieve.is_effective(47));
        assert!(!sieve.is_effective(94));
        assert!(sieve.is_effective(283));
    }

    #[test]
    fn test_known_counts_mod_47() {
        assert_eq!(count_effective_moduli(100), 1);
        assert_eq!(count_effective_moduli(500), 2);
        assert_eq!(count_effective_moduli(1000), 4);
        assert_eq!(count_effective_moduli(10_000), 29);
    }

    #[test]
    fn test_effective_moduli_below_1000() {
        let sieve = EffectiveSieve::for_class(1000, ResidueClass::one_mod(47));
        let moduli: Vec<u64> = sieve.effective_moduli().collect();
        assert_eq!(moduli, vec![1, 283, 659, 941]);
    }

    #[test]
    fn test_small_modulus_classes() {
        let sieve = EffectiveSieve::for_class(100, ResidueClass::one_mod(4));
        assert_eq!(sieve.count(), 15);
        assert!(sieve.is_effective(65)); // 5 * 13
        assert!(!sieve.is_effective(15));

        let sieve = EffectiveSieve::for_class(100, ResidueClass::one_mod(3));
        let moduli: Vec<u64> = sieve.effective_moduli().collect();
        assert_eq!(
            moduli,
            vec![1, 7, 13, 19, 31, 37, 43, 49, 61, 67, 73, 79, 91, 97]
        );
    }

    #[test]
    fn test_matches_trial_factorisation() {
        for class in [
            ResidueClass::one_mod(47),
            ResidueClass::one_mod(3),
            ResidueClass::one_mod(5),
            ResidueClass::new(4, 3),
        ] {
            for bound in [1, 2, 50, 100, 2_000] {
                assert_eq!(
                    count_effective_in_class(bound, class),
                    brute_force_count(bound, class),
                    "bound {} class {:?}",
                    bound,
                    class
                );
            }
        }
    }

    #[test]
    fn test_monotone_in_bound() {
        let class = ResidueClass::one_mod(3);
        let mut previous = 0;
        for d in 0..=300 {
            let current = count_effective_in_class(d, class);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_prefix_counts_match_fresh_sieves() {
        let class = ResidueClass::one_mod(47);
        let sieve = EffectiveSieve::for_class(5_000, class);
        for d in [1, 100, 283, 500, 1_000, 5_000] {
            assert_eq!(sieve.count_up_to(d), count_effective_in_class(d, class));
        }
        assert_eq!(sieve.count_up_to(1_000_000), sieve.count());
    }

    #[test]
    fn test_splitting_primes_are_effective() {
        let sieve = EffectiveSieve::for_class(6_300, ResidueClass::one_mod(47));
        for p in crate::domain::services::primes::sieve_primes(6_300) {
            assert_eq!(sieve.is_effective(p), p % 47 == 1, "p = {}", p);
        }
    }
}
