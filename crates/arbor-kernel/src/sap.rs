//! Root sap exchange: roots siphon from richer substrate.

use arbor_core::{Cell, Role};

use crate::context::{CellOutcome, PhaseContext, PhaseTally};
use crate::kernel::PhaseKernel;

/// One-directional siphon from unoccupied dirt into adjacent roots.
///
/// A root gains `sap_amount` per substrate neighbour holding at least
/// `sap_threshold` more than it; each such neighbour loses `sap_amount`
/// per qualifying root. Both sides test the same pair, so the phase
/// conserves total resource.
#[derive(Clone, Copy, Debug, Default)]
pub struct SapExchange;

impl SapExchange {
    fn qualifies(ctx: &PhaseContext<'_>, root: &Cell, substrate: &Cell) -> bool {
        substrate.resource as i32 >= root.resource as i32 + ctx.params.sap_threshold as i32
    }
}

impl PhaseKernel for SapExchange {
    fn name(&self) -> &str {
        "sap_exchange"
    }

    fn evaluate(&self, ctx: &PhaseContext<'_>, index: usize) -> CellOutcome {
        let cell = ctx.cell(index);
        let neighbours = ctx.grid.neighbours(ctx.pos(index));
        let delta = if cell.is_role(Role::Root) {
            let sources = neighbours
                .iter()
                .filter(|nb| {
                    let n = ctx.cell(nb.index);
                    !n.is_occupied()
                        && ctx.material(nb.index).is_substrate()
                        && Self::qualifies(ctx, &cell, &n)
                })
                .count() as i32;
            sources * ctx.params.sap_amount as i32
        } else if !cell.is_occupied() && ctx.material(index).is_substrate() {
            let sinks = neighbours
                .iter()
                .filter(|nb| {
                    let n = ctx.cell(nb.index);
                    n.is_role(Role::Root) && Self::qualifies(ctx, &n, &cell)
                })
                .count() as i32;
            -sinks * ctx.params.sap_amount as i32
        } else {
            return CellOutcome::unchanged(cell);
        };

        let (next, saturated) = cell.with_resource(cell.resource as i32 + delta);
        CellOutcome {
            cell: next,
            tally: PhaseTally {
                saturated_writes: saturated as u32,
                ..PhaseTally::default()
            },
        }
    }
}
