// Random pick of the file to post. Variety matters here, not security, so a
// clock-seeded StdRng is enough.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of indexes in `0..len`. `len` is never zero when called.
pub trait RandomSource {
    fn pick(&mut self, len: usize) -> usize;
}

/// Process-wide RNG, seeded once from the wall clock at startup.
pub struct ClockSeeded {
    rng: StdRng,
}

impl ClockSeeded {
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        tracing::debug!(seed, "Seeded random source");
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ClockSeeded {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ClockSeeded {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Choose an index into a collection of `len` items, uniformly.
/// `folder` only labels the error when the collection is empty.
pub fn choose_uniform<R: RandomSource + ?Sized>(rng: &mut R, len: usize, folder: &str) -> Result<usize> {
    if len == 0 {
        return Err(Error::EmptyCollection {
            folder: folder.to_string(),
        });
    }
    let index = rng.pick(len);
    debug_assert!(index < len);
    Ok(index)
}
