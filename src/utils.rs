use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, SeedableRng};

/// Builds the random number generator used for rollouts.
///
/// # Parameters
/// - `seed`: A fixed seed for reproducible searches. When `None`, the generator is
///           seeded from the current system time, so runs are not reproducible.
///
/// # Returns
/// A freshly seeded `StdRng`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng{
    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| (elapsed.as_nanos() % u64::MAX as u128) as u64)
            .unwrap_or_default()
    });

    StdRng::seed_from_u64(seed)
}
