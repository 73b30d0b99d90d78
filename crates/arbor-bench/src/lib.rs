//! Benchmark profiles for the Arbor growth automaton.
//!
//! Provides pre-built [`WorldConfig`] profiles for benchmarking and examples:
//!
//! - [`reference_profile`]: 128x128 grid (16K cells)
//! - [`stress_profile`]: 512x512 grid (~262K cells)
//! - [`custom_profile`]: any size, same terrain recipe
//! - [`planted_world`]: a profile with deterministic seedlings along the surface

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arbor_core::{LineageId, Material};
use arbor_engine::{ConfigError, EditError, LockstepWorld, Seed, WorldConfig};
use arbor_space::Pos;

/// The dirt surface of every profile sits at `height / SURFACE_DIVISOR`.
const SURFACE_DIVISOR: u32 = 3;

/// Build a profile of `width x height` with a dirt floor in the bottom
/// third, scattered stone, and seeded fertility.
pub fn custom_profile(width: u32, height: u32, seed: u64) -> WorldConfig {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let surface = height / SURFACE_DIVISOR;
    let mut config = WorldConfig::new(width, height).with_ground(surface);
    for f in config.fertility.iter_mut() {
        *f = rng.random_range(0.25..=1.0);
    }
    let w = width as usize;
    for (i, m) in config.materials.iter_mut().enumerate() {
        if (i / w) as u32 + 2 < surface && rng.random_ratio(1, 40) {
            *m = Material::Stone;
        }
    }
    config
}

/// Reference benchmark profile: 128x128 grid (16K cells).
pub fn reference_profile(seed: u64) -> WorldConfig {
    custom_profile(128, 128, seed)
}

/// Stress benchmark profile: 512x512 grid (~262K cells).
pub fn stress_profile(seed: u64) -> WorldConfig {
    custom_profile(512, 512, seed)
}

/// Error building a benchmark world.
#[derive(Debug)]
pub enum ProfileError {
    /// The profile configuration was rejected.
    Config(ConfigError),
    /// A seedling could not be planted.
    Edit(EditError),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Edit(e) => write!(f, "edit: {e}"),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Edit(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ProfileError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EditError> for ProfileError {
    fn from(e: EditError) -> Self {
        Self::Edit(e)
    }
}

/// Build `config` into a world with `count` seedlings spread evenly along
/// the surface, each a branch origin above a root origin.
///
/// Lineages cycle through 1..=255.
pub fn planted_world(config: WorldConfig, count: u32) -> Result<LockstepWorld, ProfileError> {
    let surface = (config.height / SURFACE_DIVISOR) as i32;
    let spacing = (config.width / (count + 1)).max(1) as i32;
    let mut world = LockstepWorld::new(config)?;
    for n in 0..count {
        let x = spacing * (n as i32 + 1);
        let Some(lineage) = LineageId::new((n % 255) as u8 + 1) else {
            continue;
        };
        world.plant(Seed::branch(Pos::new(x, surface + 1), lineage, 120))?;
        world.plant(Seed::root(Pos::new(x, surface), lineage, 60))?;
    }
    Ok(world)
}
