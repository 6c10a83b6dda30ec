//! Word-size modular arithmetic.

/// `base^exp mod m` by binary exponentiation with u128 intermediates.
pub fn mod_pow(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let m = m as u128;
    let mut b = base as u128 % m;
    let mut result = 1u128;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        exp >>= 1;
        b = b * b % m;
    }
    result as u64
}

/// Trial-division primality, for validating small parameters.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime strictly greater than `n`.
pub fn next_prime(n: u64) -> u64 {
    let mut candidate = n + 1;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow_small_cases() {
        assert_eq!(mod_pow(2, 10, 1000), 24);
        assert_eq!(mod_pow(3, 0, 7), 1);
        assert_eq!(mod_pow(0, 47, 53), 0);
        assert_eq!(mod_pow(5, 3, 1), 0);
    }

    #[test]
    fn test_mod_pow_fermat() {
        for a in 1..47 {
            assert_eq!(mod_pow(a, 46, 47), 1);
            assert_eq!(mod_pow(a, 47, 47), a);
        }
    }

    #[test]
    fn test_mod_pow_large_modulus() {
        let m = 18_446_744_073_709_551_557; // largest prime below 2^64
        assert_eq!(mod_pow(m - 1, 2, m), 1);
    }

    #[test]
    fn test_is_prime() {
        let small: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(small, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(283));
        assert!(!is_prime(95));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(47), 53);
        assert_eq!(next_prime(1), 2);
        assert_eq!(next_prime(2), 3);
    }
}
