//! Injectable random source for the population optimizer.
//! Any `rand::Rng` qualifies; seed a `StdRng` for reproducible searches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform value in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Uniform index in [0, upper); `upper` must be non-zero
    fn next_index(&mut self, upper: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    #[inline]
    fn next_index(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }
}

/// Seeded source when a seed is given, otherwise a fresh entropy-seeded one
pub fn source_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
