//! Seeded randomness for generators and the subgraph sampler.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// Seeded `StdRng` shared by every randomized routine of the workspace.
///
/// Randomized operations take a `&mut RngHandle` or a `u64` seed, so equal
/// seeds produce equal networks and equal samples. Independent streams, for
/// example one per sampling trial, come from [`RngHandle::substream`].
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Handle seeded with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Handle for stream `id` of `master`; see [`derive_substream_seed`].
    pub fn substream(master: u64, id: u64) -> Self {
        Self::from_seed(derive_substream_seed(master, id))
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Coin flip landing `true` with probability `p`; `p` outside `[0, 1]`
    /// (or NaN) is clamped.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        match p {
            p if p >= 1.0 => true,
            p if p > 0.0 => self.rng.gen_bool(p),
            _ => false,
        }
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of stream `id` under `master`: SipHash-1-3 with zero keys over both
/// values, stable across platforms and releases.
pub fn derive_substream_seed(master: u64, id: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master);
    hasher.write_u64(id);
    hasher.finish()
}
