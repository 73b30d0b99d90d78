//! Seeded random worlds.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arbor_core::Material;
use arbor_engine::LockstepWorld;

use crate::fixtures::Fixture;

/// Build a reproducible world from `seed`.
///
/// The lower part of the grid is dirt with scattered stone and water
/// pockets, fertility varies per cell, substrate carries some resource, and
/// one to four lineages are planted on the surface with a root origin just
/// below each. The same `(seed, width, height)` always yields the same
/// world. Requires `width >= 4` and `height >= 8`.
pub fn random_world(seed: u64, width: u32, height: u32) -> LockstepWorld {
    assert!(width >= 4 && height >= 8, "random worlds need at least 4x8");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let surface = rng.random_range(height / 4..=height / 2);
    let mut fx = Fixture::new(width, height).ground(surface);

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            fx = fx.fertility_at(x, y, rng.random());
        }
    }

    // Pockets stay at least two rows below the surface so that water never
    // touches a planted origin.
    let pockets = (width * surface) / 12;
    for _ in 0..pockets {
        let x = rng.random_range(0..width as i32);
        let y = rng.random_range(0..surface.saturating_sub(1).max(1) as i32);
        let material = if rng.random_bool(0.5) {
            Material::Stone
        } else {
            Material::Water
        };
        fx = fx.material(x, y, material);
    }

    for y in 0..surface as i32 {
        for x in 0..width as i32 {
            if fx.config().materials[y as usize * width as usize + x as usize] == Material::Dirt {
                fx = fx.resource(x, y, rng.random_range(-20..=60));
            }
        }
    }

    // Plant origins on even columns so that no two share a column.
    let mut columns: Vec<i32> = (1..width as i32 - 1).step_by(2).collect();
    columns.shuffle(&mut rng);
    let lineages = rng.random_range(1..=columns.len().min(4));
    let s = surface as i32;
    for (n, &x) in columns.iter().take(lineages).enumerate() {
        let id = n as u8 + 1;
        fx = fx
            .material(x, s, Material::Dirt)
            .branch(x, s + 1, id, rng.random_range(40..=100))
            .root(x, s, id, rng.random_range(20..=60));
    }
    fx.build()
}
