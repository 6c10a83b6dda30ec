//! Pure arithmetic: no I/O, no logging, no shared state.

pub mod arith;
pub mod exponents;
pub mod local_roots;
pub mod moduli;
pub mod primes;

/// The degree of `Q(n) = n^47 - (n-1)^47` and the modulus of `Q_eff`.
pub const DEFAULT_MODULUS: u64 = 47;

pub use exponents::{global_exponent, restricted_exponent, ExponentModel};
pub use local_roots::{classify, local_root_count, theoretical_root_count, LocalRootModel};
pub use moduli::{count_effective_in_class, count_effective_moduli, EffectiveSieve, ResidueClass};
pub use primes::sieve_primes;
