//! Per-worker RNG seeding
//!
//! Each worker owns a private `StdRng` seeded deterministically from
//! `(master_seed, worker_id)`, so a run's path draws depend only on the
//! seed and the fixed chunking scheme, never on scheduling order.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// splitmix64 finalizer, used here purely as a seed mixer (not as the
/// path RNG itself) so two distinct worker ids never collide in practice.
fn mix(master_seed: u64, worker_id: u64) -> u64 {
    let mut z = master_seed.wrapping_add(worker_id.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Build the RNG for a given worker.
pub fn worker_rng(master_seed: u64, worker_id: u64) -> StdRng {
    StdRng::seed_from_u64(mix(master_seed, worker_id))
}
