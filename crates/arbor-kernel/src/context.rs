//! Read-only inputs shared by every cell evaluation in a phase.

use std::ops::AddAssign;

use arbor_core::{Cell, Material, TickId};
use arbor_space::{Grid2D, Pos};

use crate::params::{Features, KernelParams};

/// Which of the four per-cycle phases a tick runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Transport + inhibition; substrate diffuses along x.
    SettleX,
    /// Transport + inhibition; substrate diffuses along y.
    SettleY,
    /// Roots siphon resource from substrate.
    SapExchange,
    /// New cells are born.
    Growth,
}

impl Phase {
    /// The phase run on `tick` (`tick % 4`).
    pub fn of(tick: TickId) -> Self {
        match tick.0 % 4 {
            0 => Self::SettleX,
            1 => Self::SettleY,
            2 => Self::SapExchange,
            _ => Self::Growth,
        }
    }

    /// Short name for logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Self::SettleX => "settle_x",
            Self::SettleY => "settle_y",
            Self::SapExchange => "sap_exchange",
            Self::Growth => "growth",
        }
    }
}

/// Frozen view of the previous generation plus external inputs.
///
/// Every field is immutable for the whole phase, so any cell may be
/// evaluated in any order, on any thread.
#[derive(Clone, Copy, Debug)]
pub struct PhaseContext<'a> {
    /// Grid geometry.
    pub grid: &'a Grid2D,
    /// Decoded previous-generation cells, row-major.
    pub cells: &'a [Cell],
    /// External material classification, row-major.
    pub materials: &'a [Material],
    /// Quantized fertility (0..=255), row-major.
    pub fertility: &'a [u8],
    /// Kernel constants.
    pub params: &'a KernelParams,
    /// Optional behaviours.
    pub features: Features,
    /// The tick being computed.
    pub tick: TickId,
}

impl PhaseContext<'_> {
    /// Phase implied by [`tick`](Self::tick).
    pub fn phase(&self) -> Phase {
        Phase::of(self.tick)
    }

    /// Cell at `index`. Out-of-range indices read as an empty cell.
    #[inline]
    pub fn cell(&self, index: usize) -> Cell {
        self.cells.get(index).copied().unwrap_or_default()
    }

    /// Material at `index`. Out-of-range indices read as stone.
    #[inline]
    pub fn material(&self, index: usize) -> Material {
        self.materials.get(index).copied().unwrap_or(Material::Stone)
    }

    /// Fertility at `index`. Out-of-range indices read as zero.
    #[inline]
    pub fn fertility(&self, index: usize) -> u8 {
        self.fertility.get(index).copied().unwrap_or(0)
    }

    /// Position of `index`.
    #[inline]
    pub fn pos(&self, index: usize) -> Pos {
        self.grid.pos(index)
    }
}

/// Diagnostic counters produced while evaluating cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTally {
    /// Cells born.
    pub births: u32,
    /// Candidates left empty because more than one proposal survived.
    pub contested_claims: u32,
    /// Proposals rejected for insufficient resource.
    pub starved_claims: u32,
    /// Total resource removed by creation costs.
    pub cost_charged: i64,
    /// Parent lookups that matched more than one neighbour.
    pub ambiguous_parents: u32,
    /// Writes whose resource had to be clamped into range.
    pub saturated_writes: u32,
}

impl AddAssign for PhaseTally {
    fn add_assign(&mut self, o: Self) {
        self.births += o.births;
        self.contested_claims += o.contested_claims;
        self.starved_claims += o.starved_claims;
        self.cost_charged += o.cost_charged;
        self.ambiguous_parents += o.ambiguous_parents;
        self.saturated_writes += o.saturated_writes;
    }
}

/// What one cell evaluation produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellOutcome {
    /// The cell's next-generation value.
    pub cell: Cell,
    /// Diagnostics raised while computing it.
    pub tally: PhaseTally,
}

impl CellOutcome {
    /// The cell carried forward unchanged.
    pub fn unchanged(cell: Cell) -> Self {
        Self {
            cell,
            tally: PhaseTally::default(),
        }
    }
}
