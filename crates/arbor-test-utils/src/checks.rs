//! Invariant checks over a published generation.

use arbor_core::Cell;
use arbor_engine::LockstepWorld;
use arbor_kernel::{get_parent, is_child_of, ParentLookup, PhaseContext};
use arbor_space::Pos;

/// A kernel context over `cells`, which must be the decoded published
/// generation of `world`.
pub fn context_of<'a>(world: &'a LockstepWorld, cells: &'a [Cell]) -> PhaseContext<'a> {
    PhaseContext {
        grid: world.grid(),
        cells,
        materials: world.materials(),
        fertility: world.fertility(),
        params: world.params(),
        features: world.features(),
        tick: world.current_tick(),
    }
}

/// Positions of every occupied cell, in index order.
pub fn occupied_positions(world: &LockstepWorld) -> Vec<Pos> {
    let grid = world.grid();
    world
        .snapshot()
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_occupied())
        .map(|(i, _)| grid.pos(i))
        .collect()
}

/// Every non-origin cell whose parent is missing, ambiguous, or of a
/// different lineage.
pub fn lineage_violations(world: &LockstepWorld) -> Vec<Pos> {
    let cells = world.snapshot().cells();
    let ctx = context_of(world, &cells);
    let mut bad = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        if !cell.is_occupied() || cell.origin {
            continue;
        }
        let pos = ctx.pos(i);
        let ok = match get_parent(&ctx, i) {
            ParentLookup::Found(nb) => {
                let parent = ctx.cell(nb.index);
                parent.lineage == cell.lineage && is_child_of(cell, pos, &parent, nb.pos)
            }
            ParentLookup::Origin | ParentLookup::Ambiguous { .. } => false,
        };
        if !ok {
            bad.push(pos);
        }
    }
    bad
}

/// Highest inhibition of any occupied cell.
pub fn max_inhibition(world: &LockstepWorld) -> u8 {
    world
        .snapshot()
        .cells()
        .iter()
        .filter(|c| c.is_occupied())
        .map(|c| c.inhibition)
        .max()
        .unwrap_or(0)
}
