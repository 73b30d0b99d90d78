//! Lockstep (synchronous) world driver.
//!
//! [`LockstepWorld`] owns the cell planes, the external inputs, and the
//! tick counter. Each call to [`step()`](LockstepWorld::step) runs exactly
//! one phase of the four-tick cycle over every cell in parallel, publishes
//! the new generation, and returns a snapshot of it.
//!
//! # Ownership model
//!
//! `LockstepWorld` is [`Send`]. All mutating methods take `&mut self`, and
//! [`step()`](LockstepWorld::step) returns a [`Snapshot`] that borrows from
//! `self`, so the caller cannot author or step while holding one.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use rayon::prelude::*;

use arbor_arena::{ArenaError, PingPongPlanes, Snapshot};
use arbor_core::{Cell, Heading, InputError, LineageId, Material, PlantError, Role, TickId};
use arbor_kernel::{CellOutcome, Features, KernelParams, Phase, PhaseContext, PhaseTally};
use arbor_space::{Grid2D, Pos};

use crate::config::{check_fertility, check_materials, quantize_all, ConfigError, WorldConfig};
use crate::metrics::StepMetrics;
use crate::scheduler::TickScheduler;

// Compile-time assertion: LockstepWorld is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<LockstepWorld>();
    }
};

// ── Errors ──────────────────────────────────────────────────────

/// A step could not run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The plane lifecycle was violated.
    Arena(ArenaError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
        }
    }
}

impl From<ArenaError> for StepError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

/// A host edit between steps was rejected. The world is unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum EditError {
    /// An origin cell could not be planted.
    Plant(PlantError),
    /// A replacement input buffer is malformed.
    Input(InputError),
    /// The plane storage rejected the edit.
    Arena(ArenaError),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plant(e) => write!(f, "plant: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Plant(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Arena(e) => Some(e),
        }
    }
}

impl From<PlantError> for EditError {
    fn from(e: PlantError) -> Self {
        Self::Plant(e)
    }
}

impl From<InputError> for EditError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<ArenaError> for EditError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

// ── Seed ────────────────────────────────────────────────────────

/// An origin cell to plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed {
    /// Where to plant.
    pub pos: Pos,
    /// Lineage the new network belongs to.
    pub lineage: LineageId,
    /// Branch origins go in air, root origins in dirt.
    pub role: Role,
    /// Initial growth direction.
    pub heading: Heading,
    /// Starting resource, clamped into the storable range.
    pub resource: i16,
}

impl Seed {
    /// A branch origin growing straight up.
    pub fn branch(pos: Pos, lineage: LineageId, resource: i16) -> Self {
        Self {
            pos,
            lineage,
            role: Role::Branch,
            heading: Heading::UP,
            resource,
        }
    }

    /// A root origin growing straight down.
    pub fn root(pos: Pos, lineage: LineageId, resource: i16) -> Self {
        Self {
            pos,
            lineage,
            role: Role::Root,
            heading: Heading::DOWN,
            resource,
        }
    }
}

// ── StepReport ──────────────────────────────────────────────────

/// Result of a successful [`LockstepWorld::step()`] call.
pub struct StepReport<'w> {
    /// The tick that ran.
    pub tick: TickId,
    /// The phase that ran.
    pub phase: Phase,
    /// Timing and counters for this step.
    pub metrics: StepMetrics,
    /// Read-only view of the generation this step published.
    pub snapshot: Snapshot<'w>,
}

// ── LockstepWorld ───────────────────────────────────────────────

/// Synchronous world: one phase per [`step()`](LockstepWorld::step).
///
/// # Example
///
/// ```ignore
/// let mut world = LockstepWorld::new(WorldConfig::new(64, 64).with_ground(20))?;
/// world.plant(Seed::branch(Pos::new(32, 21), lineage, 100))?;
/// let totals = world.step_n(400)?;
/// println!("{} cells born", totals.births);
/// ```
pub struct LockstepWorld {
    grid: Grid2D,
    planes: PingPongPlanes,
    materials: Vec<Material>,
    fertility: Vec<u8>,
    params: KernelParams,
    features: Features,
    tick: TickId,
    scheduler: TickScheduler,
    last_metrics: StepMetrics,
}

impl LockstepWorld {
    /// Create a world from a [`WorldConfig`]. Every cell starts vacant.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid2D::new(config.width, config.height)?;
        let fertility = quantize_all(&config.fertility);
        tracing::info!(
            target: "arbor::engine",
            width = grid.width(),
            height = grid.height(),
            tick = config.initial_tick.0,
            "world created"
        );
        Ok(Self {
            planes: PingPongPlanes::new(grid.cell_count()),
            grid,
            materials: config.materials,
            fertility,
            params: config.params,
            features: config.features,
            tick: config.initial_tick,
            scheduler: TickScheduler::default(),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Run the phase selected by the current tick, then advance the tick.
    ///
    /// Every cell is evaluated in parallel against the published
    /// generation; the results become the next published generation.
    pub fn step(&mut self) -> Result<StepReport<'_>, StepError> {
        let start = Instant::now();
        let tick = self.tick;
        let phase = Phase::of(tick);
        let kernel = self.scheduler.kernel_for(phase);

        let guard = self.planes.begin_phase()?;
        let cells = guard.published.decode_all();
        let ctx = PhaseContext {
            grid: &self.grid,
            cells: &cells,
            materials: &self.materials,
            fertility: &self.fertility,
            params: &self.params,
            features: self.features,
            tick,
        };
        let outcomes: Vec<CellOutcome> = (0..cells.len())
            .into_par_iter()
            .map(|i| kernel.evaluate(&ctx, i))
            .collect();

        let mut tally = PhaseTally::default();
        let mut next = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            tally += outcome.tally;
            next.push(outcome.cell);
        }
        let occupied = next.iter().filter(|c| c.is_occupied()).count();

        if let Err(e) = guard.staging.encode_all(&next) {
            self.planes.cancel_phase();
            return Err(e.into());
        }
        self.planes.publish(tick)?;
        self.tick = tick.next();

        let total_us = start.elapsed().as_micros() as u64;
        let metrics = StepMetrics::from_tally(phase, total_us, &tally, occupied);
        tracing::debug!(
            target: "arbor::engine",
            tick = tick.0,
            phase = phase.name(),
            births = metrics.births,
            contested = metrics.contested_claims,
            starved = metrics.starved_claims,
            cost = metrics.cost_charged,
            occupied,
            total_us,
            "phase complete"
        );
        if metrics.saturated_writes > 0 {
            tracing::warn!(
                target: "arbor::engine",
                tick = tick.0,
                phase = phase.name(),
                saturated = metrics.saturated_writes,
                "resource writes clamped"
            );
        }
        self.last_metrics = metrics.clone();

        Ok(StepReport {
            tick,
            phase,
            metrics,
            snapshot: self.planes.snapshot(),
        })
    }

    /// Run `n` steps and return the summed counters.
    pub fn step_n(&mut self, n: u64) -> Result<PhaseTally, StepError> {
        let mut totals = PhaseTally::default();
        for _ in 0..n {
            let m = self.step()?.metrics;
            totals += PhaseTally {
                births: m.births,
                contested_claims: m.contested_claims,
                starved_claims: m.starved_claims,
                cost_charged: m.cost_charged,
                ambiguous_parents: m.ambiguous_parents,
                saturated_writes: m.saturated_writes,
            };
        }
        Ok(totals)
    }

    /// Plant an origin cell.
    ///
    /// Branch origins require air, root origins require dirt. The target
    /// keeps nothing of the vacant cell it replaces, including its resource.
    pub fn plant(&mut self, seed: Seed) -> Result<(), EditError> {
        let Pos { x, y } = seed.pos;
        let index = self
            .grid
            .index(seed.pos)
            .ok_or(PlantError::OutOfBounds { x, y })?;
        let found = self.materials[index];
        let planes = self.planes.published_mut()?;
        if planes.cell(index).is_some_and(|c| c.is_occupied()) {
            return Err(PlantError::Occupied { x, y }.into());
        }
        let medium = match seed.role {
            Role::Branch => Material::Air,
            Role::Root => Material::Dirt,
        };
        if found != medium {
            return Err(PlantError::WrongMedium { x, y, found }.into());
        }
        let (cell, _) = Cell::planted(seed.lineage, seed.role, seed.heading, 0)
            .with_resource(i32::from(seed.resource));
        planes.set_cell(index, &cell)?;
        tracing::info!(
            target: "arbor::engine",
            x,
            y,
            lineage = %seed.lineage,
            role = %seed.role,
            heading = %seed.heading,
            "origin planted"
        );
        Ok(())
    }

    /// Overwrite the resource of one cell, occupied or not.
    pub fn set_resource(&mut self, pos: Pos, resource: i32) -> Result<(), EditError> {
        let index = self.grid.index(pos).ok_or(PlantError::OutOfBounds {
            x: pos.x,
            y: pos.y,
        })?;
        let planes = self.planes.published_mut()?;
        let current = planes.cell(index).unwrap_or_default();
        let (cell, saturated) = current.with_resource(resource);
        if saturated {
            tracing::warn!(
                target: "arbor::engine",
                x = pos.x,
                y = pos.y,
                resource,
                "authored resource clamped"
            );
        }
        planes.set_cell(index, &cell)?;
        Ok(())
    }

    /// Replace the material map.
    pub fn set_materials(&mut self, materials: Vec<Material>) -> Result<(), EditError> {
        check_materials(&materials, self.grid.cell_count())?;
        self.materials = materials;
        Ok(())
    }

    /// Replace the fertility map.
    pub fn set_fertility(&mut self, fertility: &[f32]) -> Result<(), EditError> {
        check_fertility(fertility, self.grid.cell_count())?;
        self.fertility = quantize_all(fertility);
        Ok(())
    }

    /// Toggle optional behaviours.
    pub fn set_features(&mut self, features: Features) {
        self.features = features;
    }

    /// Replace the published generation with host-authored bytes.
    ///
    /// `state` holds four bytes per cell and `meta` one byte per cell.
    pub fn load_buffers(&mut self, state: Vec<u8>, meta: Vec<u8>) -> Result<(), EditError> {
        self.planes.load(state, meta)?;
        tracing::debug!(target: "arbor::engine", "planes loaded from host buffers");
        Ok(())
    }

    /// Borrow the published generation.
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.planes.snapshot()
    }

    /// Decode the published cell at `pos`.
    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.grid
            .index(pos)
            .and_then(|i| self.planes.published().cell(i))
    }

    /// Material map, row-major.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Quantised fertility map, row-major.
    pub fn fertility(&self) -> &[u8] {
        &self.fertility
    }

    /// Material at `pos`, if on the grid.
    pub fn material(&self, pos: Pos) -> Option<Material> {
        self.grid.index(pos).map(|i| self.materials[i])
    }

    /// The tick the next [`step()`](Self::step) will run.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// The phase the next [`step()`](Self::step) will run.
    pub fn next_phase(&self) -> Phase {
        Phase::of(self.tick)
    }

    /// Grid geometry.
    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    /// Kernel constants.
    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    /// Enabled behaviours.
    pub fn features(&self) -> Features {
        self.features
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

impl fmt::Debug for LockstepWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockstepWorld")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("tick", &self.tick)
            .field("generation", &self.planes.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage(n: u8) -> LineageId {
        LineageId::new(n).unwrap()
    }

    fn world(w: u32, h: u32, surface: u32) -> LockstepWorld {
        LockstepWorld::new(WorldConfig::new(w, h).with_ground(surface)).unwrap()
    }

    #[test]
    fn new_world_is_vacant() {
        let w = world(6, 6, 2);
        let snap = w.snapshot();
        assert_eq!(snap.occupied_count(), 0);
        assert_eq!(snap.total_resource(), 0);
        assert_eq!(w.current_tick(), TickId(0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = WorldConfig::new(4, 4);
        cfg.fertility.pop();
        assert!(matches!(
            LockstepWorld::new(cfg),
            Err(ConfigError::Input(InputError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn plant_checks_bounds_occupancy_and_medium() {
        let mut w = world(6, 6, 2);
        assert_eq!(
            w.plant(Seed::branch(Pos::new(9, 0), lineage(1), 50)),
            Err(EditError::Plant(PlantError::OutOfBounds { x: 9, y: 0 }))
        );
        assert_eq!(
            w.plant(Seed::branch(Pos::new(3, 1), lineage(1), 50)),
            Err(EditError::Plant(PlantError::WrongMedium {
                x: 3,
                y: 1,
                found: Material::Dirt
            }))
        );
        assert_eq!(
            w.plant(Seed::root(Pos::new(3, 4), lineage(1), 50)),
            Err(EditError::Plant(PlantError::WrongMedium {
                x: 3,
                y: 4,
                found: Material::Air
            }))
        );
        w.plant(Seed::branch(Pos::new(3, 3), lineage(1), 50)).unwrap();
        assert_eq!(
            w.plant(Seed::branch(Pos::new(3, 3), lineage(2), 50)),
            Err(EditError::Plant(PlantError::Occupied { x: 3, y: 3 }))
        );
        let c = w.cell(Pos::new(3, 3)).unwrap();
        assert!(c.origin);
        assert_eq!(c.lineage, Some(lineage(1)));
        assert_eq!(c.resource, 50);
    }

    #[test]
    fn step_cycles_through_phases() {
        let mut w = world(4, 4, 1);
        let phases: Vec<Phase> = (0..5).map(|_| w.step().unwrap().phase).collect();
        assert_eq!(
            phases,
            [
                Phase::SettleX,
                Phase::SettleY,
                Phase::SapExchange,
                Phase::Growth,
                Phase::SettleX
            ]
        );
        assert_eq!(w.current_tick(), TickId(5));
        assert_eq!(w.snapshot().generation(), 5);
        assert_eq!(w.snapshot().tick_id(), TickId(4));
    }

    #[test]
    fn initial_tick_selects_first_phase() {
        let mut cfg = WorldConfig::new(4, 4);
        cfg.initial_tick = TickId(3);
        let mut w = LockstepWorld::new(cfg).unwrap();
        assert_eq!(w.next_phase(), Phase::Growth);
        let report = w.step().unwrap();
        assert_eq!(report.phase, Phase::Growth);
        assert_eq!(report.tick, TickId(3));
    }

    #[test]
    fn seedling_grows_after_a_full_cycle() {
        let mut w = world(5, 8, 2);
        w.plant(Seed::branch(Pos::new(2, 3), lineage(1), 100)).unwrap();
        let totals = w.step_n(4).unwrap();
        assert!(totals.births >= 1);
        assert!(w.cell(Pos::new(2, 4)).is_some_and(|c| c.is_occupied()));
        assert!(w.last_metrics().occupied >= 2);
    }

    #[test]
    fn set_resource_clamps_and_reports() {
        let mut w = world(4, 4, 1);
        w.set_resource(Pos::new(1, 0), 1000).unwrap();
        assert_eq!(w.cell(Pos::new(1, 0)).unwrap().resource, 127);
        assert!(w.set_resource(Pos::new(4, 0), 1).is_err());
    }

    #[test]
    fn replacing_inputs_checks_lengths() {
        let mut w = world(4, 4, 1);
        assert!(matches!(
            w.set_materials(vec![Material::Air; 3]),
            Err(EditError::Input(InputError::LengthMismatch { .. }))
        ));
        assert!(matches!(
            w.set_fertility(&[f32::INFINITY; 16]),
            Err(EditError::Input(InputError::NonFiniteFertility { index: 0, .. }))
        ));
        w.set_materials(vec![Material::Stone; 16]).unwrap();
        assert_eq!(w.material(Pos::new(0, 3)), Some(Material::Stone));
        w.set_fertility(&[0.5; 16]).unwrap();
    }

    #[test]
    fn load_buffers_replaces_published() {
        let mut w = world(2, 2, 0);
        let mut state = vec![0, 0, 0, 127].repeat(4);
        state[3] = 140;
        w.load_buffers(state, vec![0; 4]).unwrap();
        assert_eq!(w.cell(Pos::new(0, 0)).unwrap().resource, 13);
        assert!(matches!(
            w.load_buffers(vec![0; 3], vec![0; 4]),
            Err(EditError::Arena(ArenaError::PlaneLength { .. }))
        ));
    }

    #[test]
    fn debug_is_compact() {
        let w = world(3, 3, 0);
        let s = format!("{w:?}");
        assert!(s.contains("LockstepWorld"));
        assert!(s.contains("width: 3"));
    }
}
