//! Deterministic RNG resource.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic randomness. The rain
//! simulator draws every spawn and respawn height from `ResMut<SimRng>`
//! instead of `rand::thread_rng()`, so a given `ISLAND_SEED` replays the same
//! curtain on desktop and in the browser.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{IslandConfig, DEFAULT_SEED};

/// Deterministic RNG resource for all simulation randomness.
///
/// Systems that need randomness take `ResMut<SimRng>` and use `rng.0`
/// (which is a `ChaCha8Rng` implementing `rand::Rng`).
#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

pub struct SimRngPlugin;

impl Plugin for SimRngPlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world()
            .get_resource::<IslandConfig>()
            .map_or(DEFAULT_SEED, |config| config.seed);
        app.insert_resource(SimRng::from_seed_u64(seed));
    }
}
