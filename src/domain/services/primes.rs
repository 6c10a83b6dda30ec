//! Prime generation by the sieve of Eratosthenes.

/// All primes `p` with `2 <= p <= limit`, ascending.
///
/// `O(limit log log limit)` time and `O(limit)` space. A limit below 2
/// yields an empty vector.
pub fn sieve_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return vec![];
    }
    let n = limit as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            let mut j = i * i;
            while j <= n {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    is_prime
        .into_iter()
        .enumerate()
        .filter_map(|(i, prime)| prime.then_some(i as u64))
        .collect()
}
