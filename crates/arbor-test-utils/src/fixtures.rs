//! Hand-authored world scenes.

use arbor_core::{encode_cell, Cell, Heading, LineError, LineageId, Material, Role, TickId};
use arbor_core::{META_STRIDE, STATE_STRIDE};
use arbor_engine::{LockstepWorld, Seed, WorldConfig};
use arbor_kernel::{Features, KernelParams};
use arbor_space::Pos;

/// Shorthand for a lineage id. Panics on zero.
pub fn lineage(n: u8) -> LineageId {
    LineageId::new(n).expect("lineage ids start at 1")
}

/// Builder for a [`LockstepWorld`] with preconfigured inputs and cells.
///
/// ```ignore
/// let world = Fixture::new(9, 12)
///     .ground(3)
///     .material(6, 2, Material::Water)
///     .branch(4, 4, 1, 80)
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct Fixture {
    config: WorldConfig,
    seeds: Vec<Seed>,
    grown: Vec<(Pos, Cell)>,
    resources: Vec<(Pos, i32)>,
}

impl Fixture {
    /// All air, full fertility, default parameters, tick 0.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            config: WorldConfig::new(width, height),
            seeds: Vec::new(),
            grown: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Dirt at and below row `surface`.
    pub fn ground(mut self, surface: u32) -> Self {
        self.config = self.config.with_ground(surface);
        self
    }

    /// Set one cell's material.
    pub fn material(mut self, x: i32, y: i32, material: Material) -> Self {
        let i = self.flat(x, y);
        self.config.materials[i] = material;
        self
    }

    /// Uniform fertility.
    pub fn fertility(mut self, value: f32) -> Self {
        self.config.fertility.fill(value);
        self
    }

    /// One cell's fertility.
    pub fn fertility_at(mut self, x: i32, y: i32, value: f32) -> Self {
        let i = self.flat(x, y);
        self.config.fertility[i] = value;
        self
    }

    /// Adjust kernel parameters in place.
    pub fn params(mut self, f: impl FnOnce(&mut KernelParams)) -> Self {
        f(&mut self.config.params);
        self
    }

    /// Replace the feature toggles.
    pub fn features(mut self, features: Features) -> Self {
        self.config.features = features;
        self
    }

    /// Starting tick.
    pub fn tick(mut self, tick: u64) -> Self {
        self.config.initial_tick = TickId(tick);
        self
    }

    /// Plant a branch origin growing up.
    pub fn branch(self, x: i32, y: i32, lineage_id: u8, resource: i16) -> Self {
        self.seed(Seed::branch(Pos::new(x, y), lineage(lineage_id), resource))
    }

    /// Plant a root origin growing down.
    pub fn root(self, x: i32, y: i32, lineage_id: u8, resource: i16) -> Self {
        self.seed(Seed::root(Pos::new(x, y), lineage(lineage_id), resource))
    }

    /// Plant an arbitrary origin.
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seeds.push(seed);
        self
    }

    /// Place a non-origin cell, as if grown with the given heading and
    /// line error. Planting cannot produce these.
    #[allow(clippy::too_many_arguments)]
    pub fn grow(
        mut self,
        x: i32,
        y: i32,
        lineage_id: u8,
        role: Role,
        heading: u8,
        error: u8,
        resource: i16,
    ) -> Self {
        let mut cell = Cell::grown(lineage(lineage_id), role, Heading::new(heading), resource);
        cell.line_error = LineError::new(error);
        self.grown.push((Pos::new(x, y), cell));
        self
    }

    /// Author resource on a cell after planting.
    pub fn resource(mut self, x: i32, y: i32, value: i32) -> Self {
        self.resources.push((Pos::new(x, y), value));
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Construct the world. Panics if any input or seed is rejected.
    pub fn build(self) -> LockstepWorld {
        let mut world = LockstepWorld::new(self.config).expect("fixture config is valid");
        for seed in self.seeds {
            world.plant(seed).expect("fixture seed can be planted");
        }
        if !self.grown.is_empty() {
            let snap = world.snapshot();
            let mut state = snap.state_bytes().to_vec();
            let mut meta = snap.meta_bytes().to_vec();
            for (pos, cell) in &self.grown {
                let i = world.grid().index(*pos).expect("grown cell is on the grid");
                let (bytes, m) = encode_cell(cell);
                state[i * STATE_STRIDE..(i + 1) * STATE_STRIDE].copy_from_slice(&bytes);
                meta[i * META_STRIDE] = m;
            }
            world
                .load_buffers(state, meta)
                .expect("fixture planes have the right length");
        }
        for (pos, value) in self.resources {
            world
                .set_resource(pos, value)
                .expect("fixture resource is on the grid");
        }
        world
    }

    fn flat(&self, x: i32, y: i32) -> usize {
        assert!(
            x >= 0 && y >= 0 && (x as u32) < self.config.width && (y as u32) < self.config.height,
            "({x}, {y}) is outside the fixture grid"
        );
        y as usize * self.config.width as usize + x as usize
    }
}
