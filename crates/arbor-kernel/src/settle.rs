//! Settle phases: resource transport, inhibition, and substrate diffusion.
//!
//! Occupied cells exchange resource with their inferred parent and
//! children and relax their inhibition. Unoccupied dirt cells pair up along
//! one axis by checkerboard parity and exchange with their partner. Every
//! exchange is computed by both endpoints from the same inputs with an odd
//! transfer function, so the phase conserves total resource.

use arbor_core::Cell;
use arbor_space::{Offset, Pos};

use crate::context::{CellOutcome, PhaseContext, PhaseTally};
use crate::kernel::PhaseKernel;
use crate::topology::{children_of, get_parent};
use crate::transfer::{bounded_edge_flow, transfer};

/// Diffusion axis for a settle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Pair horizontally.
    X,
    /// Pair vertically.
    Y,
}

/// Transport + inhibition for occupied cells, diffusion for substrate.
#[derive(Clone, Debug)]
pub struct Settle {
    axis: Axis,
    name: &'static str,
}

impl Settle {
    /// A settle kernel diffusing along `axis`.
    pub fn new(axis: Axis) -> Self {
        let name = match axis {
            Axis::X => "settle_x",
            Axis::Y => "settle_y",
        };
        Self { axis, name }
    }

    fn transport(&self, ctx: &PhaseContext<'_>, index: usize, cell: Cell) -> CellOutcome {
        let mut tally = PhaseTally::default();
        let mut resource = cell.resource as i32;

        let lookup = get_parent(ctx, index);
        if lookup.is_ambiguous() {
            tally.ambiguous_parents += 1;
        }
        if let Some(parent) = lookup.parent() {
            resource += bounded_edge_flow(ctx, parent.index, index);
        }
        for child in children_of(ctx, index) {
            resource -= bounded_edge_flow(ctx, index, child.index);
        }

        let (mut next, saturated) = cell.with_resource(resource);
        if saturated {
            tally.saturated_writes += 1;
        }
        next.inhibition = relax_inhibition(ctx, index, &cell);
        CellOutcome { cell: next, tally }
    }

    fn diffuse(&self, ctx: &PhaseContext<'_>, index: usize, cell: Cell) -> CellOutcome {
        let pos = ctx.pos(index);
        let Some(partner) = diffusion_partner(ctx, pos, self.axis) else {
            return CellOutcome::unchanged(cell);
        };
        let other = ctx.cell(partner);
        let flow = transfer(
            cell.resource as i32 - other.resource as i32,
            ctx.params.diffusion_rate,
        );
        let (next, saturated) = cell.with_resource(cell.resource as i32 - flow);
        CellOutcome {
            cell: next,
            tally: PhaseTally {
                saturated_writes: saturated as u32,
                ..PhaseTally::default()
            },
        }
    }
}

impl PhaseKernel for Settle {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, ctx: &PhaseContext<'_>, index: usize) -> CellOutcome {
        let cell = ctx.cell(index);
        if cell.is_occupied() {
            self.transport(ctx, index, cell)
        } else if ctx.material(index).is_substrate() {
            self.diffuse(ctx, index, cell)
        } else {
            CellOutcome::unchanged(cell)
        }
    }
}

/// Decayed own inhibition, or the strongest decayed same-role neighbour.
pub fn relax_inhibition(ctx: &PhaseContext<'_>, index: usize, cell: &Cell) -> u8 {
    if !ctx.features.inhibition {
        return 0;
    }
    let decay = ctx.params.inhibition_decay(cell.role);
    let own = cell.inhibition.saturating_sub(decay);
    ctx.grid
        .neighbours(ctx.pos(index))
        .iter()
        .map(|nb| ctx.cell(nb.index))
        .filter(|n| n.is_role(cell.role))
        .map(|n| n.inhibition.saturating_sub(decay))
        .fold(own, u8::max)
}

/// The one cell `pos` exchanges with this phase, if any.
///
/// Along the axis coordinate `a`, the partner is `a + 1` when
/// `(a + cycle)` is even and `a - 1` otherwise, so pairs never overlap and
/// alternate each cycle. The partner must be unoccupied dirt.
pub fn diffusion_partner(ctx: &PhaseContext<'_>, pos: Pos, axis: Axis) -> Option<usize> {
    let cycle = ctx.tick.epoch() as i64;
    let coord = match axis {
        Axis::X => pos.x,
        Axis::Y => pos.y,
    };
    let dir = if (coord as i64 + cycle).rem_euclid(2) == 0 {
        1
    } else {
        -1
    };
    let offset = match axis {
        Axis::X => Offset::new(dir, 0),
        Axis::Y => Offset::new(0, dir),
    };
    let index = ctx.grid.index(pos + offset)?;
    let partner = ctx.cell(index);
    (!partner.is_occupied() && ctx.material(index).is_substrate()).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Scene;
    use arbor_core::{Heading, LineError, Material, Role, TickId};

    fn chain(s: &mut Scene, resources: [i16; 3]) {
        s.plant(2, 0, 1, Role::Branch, Heading::UP, resources[0]);
        s.grow(2, 1, 1, Role::Branch, Heading::UP, LineError::ZERO, resources[1]);
        s.grow(2, 2, 1, Role::Branch, Heading::UP, LineError::ZERO, resources[2]);
    }

    #[test]
    fn transport_moves_up_the_chain_and_conserves() {
        let mut s = Scene::air(5, 5);
        chain(&mut s, [80, 0, 0]);
        let before = s.total_resource();
        s.run(&Settle::new(Axis::X));
        assert_eq!(s.total_resource(), before);
        assert_eq!(s.cell(2, 0).resource, 60);
        assert_eq!(s.cell(2, 1).resource, 20);
        assert_eq!(s.cell(2, 2).resource, 0);
    }

    #[test]
    fn flow_against_canopy_is_weak() {
        let mut s = Scene::air(5, 5);
        chain(&mut s, [0, 0, 80]);
        s.run(&Settle::new(Axis::X));
        assert_eq!(s.cell(2, 2).resource, 75);
        assert_eq!(s.cell(2, 1).resource, 5);
    }

    #[test]
    fn roots_push_toward_canopy() {
        let mut s = Scene::with_ground(5, 5, 1);
        s.plant(2, 2, 1, Role::Branch, Heading::UP, 0);
        s.grow(2, 1, 1, Role::Root, Heading::DOWN, LineError::ZERO, 40);
        s.run(&Settle::new(Axis::Y));
        assert_eq!(s.cell(2, 2).resource, 10);
        assert_eq!(s.cell(2, 1).resource, 30);
    }

    #[test]
    fn unit_differences_near_the_cap_conserve() {
        let mut s = Scene::air(5, 5);
        chain(&mut s, [127, 126, 127]);
        let before = s.total_resource();
        let tally = s.run(&Settle::new(Axis::X));
        assert_eq!(tally.saturated_writes, 0);
        assert_eq!(s.total_resource(), before);
        assert_eq!(s.cell(2, 1).resource, 126);
    }

    #[test]
    fn inhibition_decays_and_spreads() {
        let mut s = Scene::air(5, 5);
        chain(&mut s, [0, 0, 0]);
        let i = s.index(2, 2);
        s.cells[i].inhibition = 200;
        s.run(&Settle::new(Axis::X));
        assert_eq!(s.cell(2, 2).inhibition, 194);
        assert_eq!(s.cell(2, 1).inhibition, 194);
        assert_eq!(s.cell(2, 0).inhibition, 0);
    }

    #[test]
    fn inhibition_disabled_reads_zero() {
        let mut s = Scene::air(5, 5);
        chain(&mut s, [0, 0, 0]);
        s.features.inhibition = false;
        let i = s.index(2, 2);
        s.cells[i].inhibition = 200;
        s.run(&Settle::new(Axis::X));
        assert!(s.cells.iter().all(|c| c.inhibition == 0));
    }

    #[test]
    fn substrate_pairs_exchange_symmetrically() {
        let mut s = Scene::with_ground(4, 2, 0);
        let i = s.index(0, 0);
        s.cells[i] = Cell::vacant(40);
        s.run(&Settle::new(Axis::X));
        // Cycle 0: x=0 pairs with x=1, x=2 with x=3.
        assert_eq!(s.cell(0, 0).resource, 30);
        assert_eq!(s.cell(1, 0).resource, 10);
        assert_eq!(s.cell(2, 0).resource, 0);
        // Air is untouched.
        assert_eq!(s.cell(0, 1).resource, 0);
    }

    #[test]
    fn parity_flips_each_cycle() {
        let s = {
            let mut s = Scene::with_ground(4, 1, 0);
            s.tick = TickId(4);
            s
        };
        let ctx = s.ctx();
        // Cycle 1: x=1 pairs with x=2; x=0 would pair with x=-1.
        assert_eq!(diffusion_partner(&ctx, Pos::new(1, 0), Axis::X), Some(2));
        assert_eq!(diffusion_partner(&ctx, Pos::new(2, 0), Axis::X), Some(1));
        assert_eq!(diffusion_partner(&ctx, Pos::new(0, 0), Axis::X), None);
    }

    #[test]
    fn occupied_or_non_dirt_partner_blocks_exchange() {
        let mut s = Scene::with_ground(4, 1, 0);
        s.set_material(1, 0, Material::Stone);
        s.grow(3, 0, 1, Role::Root, Heading::DOWN, LineError::ZERO, 0);
        let ctx = s.ctx();
        assert_eq!(diffusion_partner(&ctx, Pos::new(0, 0), Axis::X), None);
        assert_eq!(diffusion_partner(&ctx, Pos::new(2, 0), Axis::X), None);
    }
}
