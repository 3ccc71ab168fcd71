//! CPU-bound workload: prime counting by trial division

use tracing::info;

use crate::config::CpuWorkload;
use crate::error::{AppError, Result};

/// Trial-division primality test
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Number of primes strictly below `limit`
pub fn count_primes(limit: u64) -> usize {
    (0..limit).filter(|&n| is_prime(n)).count()
}

/// Burn CPU on the blocking pool and report the count
pub async fn run(config: &CpuWorkload) -> Result<String> {
    let limit = config.limit;
    info!(limit, "Burning CPU");

    let found = tokio::task::spawn_blocking(move || count_primes(limit))
        .await
        .map_err(|e| AppError::Workload(format!("prime counter crashed: {}", e)))?;

    Ok(format!("CPU Task Done. Found {} primes.\n", found))
}
