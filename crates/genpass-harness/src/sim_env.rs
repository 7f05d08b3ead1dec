//! Simulated page environment.
//!
//! Content height is drawn from a seeded RNG once, then only changes when the
//! simulated layout changes. Clones share the same layout, so a test can keep
//! a handle while the controller owns another.

use std::{cell::Cell, rc::Rc};

use genpass_core::Environment;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Smallest initial content height, in CSS pixels.
const MIN_HEIGHT: u32 = 320;

/// Largest initial content height, in CSS pixels.
const MAX_HEIGHT: u32 = 960;

/// Deterministic environment for simulation.
#[derive(Debug, Clone)]
pub struct SimEnv {
    height: Rc<Cell<u32>>,
}

impl SimEnv {
    /// Create an environment whose initial height comes from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_height(rng.gen_range(MIN_HEIGHT..=MAX_HEIGHT))
    }

    /// Create an environment with a fixed height.
    pub fn with_height(height: u32) -> Self {
        Self { height: Rc::new(Cell::new(height)) }
    }

    /// Simulate content being added to the page.
    pub fn grow(&self, by: u32) {
        self.height.set(self.height.get().saturating_add(by));
    }
}

impl Environment for SimEnv {
    fn content_height(&self) -> u32 {
        self.height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_height() {
        assert_eq!(SimEnv::with_seed(7).content_height(), SimEnv::with_seed(7).content_height());
    }

    #[test]
    fn seeded_height_in_range() {
        for seed in 0..64 {
            let height = SimEnv::with_seed(seed).content_height();
            assert!((MIN_HEIGHT..=MAX_HEIGHT).contains(&height));
        }
    }

    #[test]
    fn clones_share_layout() {
        let env = SimEnv::with_height(400);
        let handle = env.clone();
        handle.grow(48);
        assert_eq!(env.content_height(), 448);
    }
}
