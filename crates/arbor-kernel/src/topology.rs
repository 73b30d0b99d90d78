//! Parent/child inference from local state.
//!
//! No graph is ever stored. [`is_child_of`] is the single relation: a cell
//! names its parent implicitly through its heading and line error, and
//! everything else ([`get_parent`], [`children_of`]) is derived from it.

use arbor_core::Cell;
use arbor_space::{Neighbour, Pos};
use smallvec::SmallVec;

use crate::context::PhaseContext;
use crate::stepper::backward_step;

/// Whether `child` at `child_pos` was created by `parent` at `parent_pos`.
///
/// Both must be occupied with the same lineage, the child must not be a
/// planted origin, and stepping backward from the child must land on the
/// parent.
pub fn is_child_of(child: &Cell, child_pos: Pos, parent: &Cell, parent_pos: Pos) -> bool {
    match (child.lineage, parent.lineage) {
        (Some(c), Some(p)) if c == p && !child.origin => {
            child_pos + backward_step(child.heading, child.line_error) == parent_pos
        }
        _ => false,
    }
}

/// Outcome of a parent lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentLookup {
    /// No neighbour matches: the cell is an origin (or unoccupied).
    Origin,
    /// Exactly one neighbour matches.
    Found(Neighbour),
    /// Several neighbours match. `first` is the earliest in scan order.
    Ambiguous {
        /// The neighbour chosen by the fixed scan order.
        first: Neighbour,
        /// How many neighbours matched.
        matches: u8,
    },
}

impl ParentLookup {
    /// The resolved parent, tie-broken by scan order.
    pub fn parent(&self) -> Option<Neighbour> {
        match *self {
            Self::Origin => None,
            Self::Found(n) | Self::Ambiguous { first: n, .. } => Some(n),
        }
    }

    /// Whether the lookup was ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}

/// Scan the neighbours of `index` for the cell that created it.
pub fn get_parent(ctx: &PhaseContext<'_>, index: usize) -> ParentLookup {
    let cell = ctx.cell(index);
    if !cell.is_occupied() {
        return ParentLookup::Origin;
    }
    let pos = ctx.pos(index);
    let mut found: Option<Neighbour> = None;
    let mut matches = 0u8;
    for nb in ctx.grid.neighbours(pos) {
        if is_child_of(&cell, pos, &ctx.cell(nb.index), nb.pos) {
            matches += 1;
            if found.is_none() {
                found = Some(nb);
            }
        }
    }
    match (found, matches) {
        (None, _) => ParentLookup::Origin,
        (Some(n), 1) => ParentLookup::Found(n),
        (Some(first), matches) => {
            tracing::warn!(
                target: "arbor::kernel",
                x = pos.x,
                y = pos.y,
                matches,
                "cell resolves to several parents; using first in scan order"
            );
            ParentLookup::Ambiguous { first, matches }
        }
    }
}

/// Every neighbour of `index` that names it as parent, in scan order.
pub fn children_of(ctx: &PhaseContext<'_>, index: usize) -> SmallVec<[Neighbour; 8]> {
    let cell = ctx.cell(index);
    if !cell.is_occupied() {
        return SmallVec::new();
    }
    let pos = ctx.pos(index);
    ctx.grid
        .neighbours(pos)
        .into_iter()
        .filter(|nb| is_child_of(&ctx.cell(nb.index), nb.pos, &cell, pos))
        .collect()
}
