//! Hand-built grids for kernel unit tests.

use arbor_core::{Cell, Heading, LineError, LineageId, Material, Role, TickId};
use arbor_space::{Grid2D, Pos};

use crate::context::{PhaseContext, PhaseTally};
use crate::kernel::PhaseKernel;
use crate::params::{Features, KernelParams};

pub(crate) struct Scene {
    pub grid: Grid2D,
    pub cells: Vec<Cell>,
    pub materials: Vec<Material>,
    pub fertility: Vec<u8>,
    pub params: KernelParams,
    pub features: Features,
    pub tick: TickId,
}

impl Scene {
    pub fn air(width: u32, height: u32) -> Self {
        let grid = Grid2D::new(width, height).unwrap();
        let n = grid.cell_count();
        Self {
            grid,
            cells: vec![Cell::vacant(0); n],
            materials: vec![Material::Air; n],
            fertility: vec![255; n],
            params: KernelParams::default(),
            features: Features::default(),
            tick: TickId(0),
        }
    }

    /// Dirt for every row `y <= surface`, air above.
    pub fn with_ground(width: u32, height: u32, surface: i32) -> Self {
        let mut s = Self::air(width, height);
        for i in 0..s.cells.len() {
            if s.grid.pos(i).y <= surface {
                s.materials[i] = Material::Dirt;
            }
        }
        s
    }

    pub fn index(&self, x: i32, y: i32) -> usize {
        self.grid.index(Pos::new(x, y)).unwrap()
    }

    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        let i = self.index(x, y);
        self.cells[i] = cell;
    }

    pub fn set_material(&mut self, x: i32, y: i32, m: Material) {
        let i = self.index(x, y);
        self.materials[i] = m;
    }

    pub fn plant(&mut self, x: i32, y: i32, lineage: u8, role: Role, heading: Heading, res: i16) {
        let cell = Cell::planted(LineageId::new(lineage).unwrap(), role, heading, res);
        self.set(x, y, cell);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn grow(
        &mut self,
        x: i32,
        y: i32,
        lineage: u8,
        role: Role,
        heading: Heading,
        error: LineError,
        res: i16,
    ) {
        let mut cell = Cell::grown(LineageId::new(lineage).unwrap(), role, heading, res);
        cell.line_error = error;
        self.set(x, y, cell);
    }

    pub fn ctx(&self) -> PhaseContext<'_> {
        PhaseContext {
            grid: &self.grid,
            cells: &self.cells,
            materials: &self.materials,
            fertility: &self.fertility,
            params: &self.params,
            features: self.features,
            tick: self.tick,
        }
    }

    /// Evaluate `kernel` over every cell and replace the scene's cells.
    pub fn run(&mut self, kernel: &dyn PhaseKernel) -> PhaseTally {
        let ctx = self.ctx();
        let mut tally = PhaseTally::default();
        let next: Vec<Cell> = (0..self.cells.len())
            .map(|i| {
                let out = kernel.evaluate(&ctx, i);
                tally += out.tally;
                out.cell
            })
            .collect();
        self.cells = next;
        self.tick = self.tick.next();
        tally
    }

    pub fn total_resource(&self) -> i64 {
        self.cells.iter().map(|c| c.resource as i64).sum()
    }
}
