//! Grow a small forest and print it.
//!
//! Run with `RUST_LOG=arbor=debug` to see per-phase tallies.

use arbor_bench::{custom_profile, planted_world};
use arbor_core::{Material, Role};
use arbor_space::Pos;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut world = planted_world(custom_profile(64, 48, 42), 3)?;

    for cycle in 0..100 {
        let totals = world.step_n(4)?;
        if cycle % 20 == 0 {
            tracing::info!(
                cycle,
                births = totals.births,
                contested = totals.contested_claims,
                occupied = world.last_metrics().occupied,
                "growth cycle"
            );
        }
    }

    let grid = *world.grid();
    for y in (0..grid.height() as i32).rev() {
        let row: String = (0..grid.width() as i32)
            .map(|x| {
                let pos = Pos::new(x, y);
                match (world.cell(pos), world.material(pos)) {
                    (Some(c), _) if c.is_role(Role::Branch) => '|',
                    (Some(c), _) if c.is_occupied() => '*',
                    (_, Some(Material::Stone)) => '#',
                    (_, Some(Material::Water)) => '~',
                    (_, Some(Material::Dirt)) => '.',
                    _ => ' ',
                }
            })
            .collect();
        println!("{row}");
    }
    println!(
        "tick {}: {} cells, total resource {}",
        world.current_tick(),
        world.snapshot().occupied_count(),
        world.snapshot().total_resource()
    );
    Ok(())
}
