//! The shared exchange rule used by transport and diffusion.

use arbor_core::{Cell, Role, RESOURCE_MAX, RESOURCE_MIN};

use crate::context::PhaseContext;
use crate::params::KernelParams;

/// Amount moved from the higher side to the lower side for a signed
/// difference `diff = from - to`.
///
/// A difference of one moves fully; larger differences move
/// `|diff| * frac / 256`, rounded toward zero. The result is odd in `diff`:
/// `transfer(-d, f) == -transfer(d, f)`, which makes paired exchanges
/// conservative.
#[inline]
pub fn transfer(diff: i32, frac: u8) -> i32 {
    match diff.abs() {
        0 => 0,
        1 => diff,
        m => diff.signum() * ((m * frac as i32) >> 8),
    }
}

/// Signed flow along a parent→child edge; positive moves resource from
/// `parent` into `child`.
///
/// Flow toward the canopy uses the strong fraction: parent→child when the
/// child is a branch, child→parent when the child is a root.
pub fn edge_flow(parent: &Cell, child: &Cell, params: &KernelParams) -> i32 {
    let diff = parent.resource as i32 - child.resource as i32;
    let canopy_ward = match child.role {
        Role::Branch => diff > 0,
        Role::Root => diff < 0,
    };
    let frac = if canopy_ward {
        params.transport_strong_frac
    } else {
        params.transport_weak_frac
    };
    transfer(diff, frac)
}

/// Occupied same-lineage neighbours of `index`, at least one.
///
/// Every transport edge of the cell is to one of these, so this bounds how
/// many flows can land on it in one phase.
fn edge_bound(ctx: &PhaseContext<'_>, index: usize) -> i32 {
    let lineage = ctx.cell(index).lineage;
    let n = ctx
        .grid
        .neighbours(ctx.pos(index))
        .iter()
        .filter(|nb| {
            let c = ctx.cell(nb.index);
            c.is_occupied() && c.lineage == lineage
        })
        .count() as i32;
    n.max(1)
}

/// [`edge_flow`] between the cells at `parent` and `child`, limited so
/// neither endpoint can leave the resource range.
///
/// The sender gives at most its room above [`RESOURCE_MIN`] and the
/// receiver takes at most its room below [`RESOURCE_MAX`], each split
/// evenly across that endpoint's possible edges. The limit depends only on
/// the previous buffers, so both endpoints still compute the same flow.
pub fn bounded_edge_flow(ctx: &PhaseContext<'_>, parent: usize, child: usize) -> i32 {
    let flow = edge_flow(&ctx.cell(parent), &ctx.cell(child), ctx.params);
    if flow == 0 {
        return 0;
    }
    let (from, to) = if flow > 0 {
        (parent, child)
    } else {
        (child, parent)
    };
    let room_out = ctx.cell(from).resource as i32 - RESOURCE_MIN as i32;
    let room_in = RESOURCE_MAX as i32 - ctx.cell(to).resource as i32;
    let cap = (room_out / edge_bound(ctx, from)).min(room_in / edge_bound(ctx, to));
    flow.signum() * flow.abs().min(cap)
}
