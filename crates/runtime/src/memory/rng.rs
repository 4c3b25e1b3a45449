//! `rand`-backed RNG oracle for live play.

use combat_core::RngOracle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Standard generator, seeded from entropy or from a fixed seed.
#[derive(Clone, Debug)]
pub struct SystemRng {
    rng: StdRng,
}

impl SystemRng {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl RngOracle for SystemRng {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}
