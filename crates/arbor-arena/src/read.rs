//! Read-only view of the published generation.

use arbor_core::{Cell, TickId};

use crate::planes::CellPlanes;

/// A read-only view of a published generation.
///
/// Borrows from the [`PingPongPlanes`](crate::PingPongPlanes); the engine
/// cannot run another phase while a snapshot is alive.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    planes: &'a CellPlanes,
    tick_id: TickId,
    generation: u32,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(planes: &'a CellPlanes, tick_id: TickId, generation: u32) -> Self {
        Self {
            planes,
            tick_id,
            generation,
        }
    }

    /// Tick that produced this generation.
    pub fn tick_id(&self) -> TickId {
        self.tick_id
    }

    /// Number of publishes since the arena was created.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The primary cell-state plane.
    pub fn state_bytes(&self) -> &'a [u8] {
        self.planes.state()
    }

    /// The metadata plane.
    pub fn meta_bytes(&self) -> &'a [u8] {
        self.planes.meta()
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.planes.cell_count()
    }

    /// Decode a single cell by index.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.planes.cell(index)
    }

    /// Decode every cell.
    pub fn cells(&self) -> Vec<Cell> {
        self.planes.decode_all()
    }

    /// Sum of every cell's resource, occupied or not.
    pub fn total_resource(&self) -> i64 {
        self.cells().iter().map(|c| c.resource as i64).sum()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells().iter().filter(|c| c.is_occupied()).count()
    }

    /// Clone the published planes out of the arena.
    pub fn to_owned_planes(&self) -> CellPlanes {
        self.planes.clone()
    }
}
