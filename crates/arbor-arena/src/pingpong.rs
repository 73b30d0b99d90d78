//! Double-buffered ping-pong planes.
//!
//! [`PingPongPlanes`] keeps two [`CellPlanes`] generations that alternate
//! between "staging" (written by the current phase) and "published" (read
//! by the current phase and by observers). The lifecycle per phase is:
//!
//! 1. `begin_phase()`: borrow published (read) and staging (write)
//! 2. every cell of staging is written from published
//! 3. `publish()`: swap roles, bump the generation
//! 4. `snapshot()`: borrow the published generation read-only
//!
//! Authoring calls ([`published_mut`](PingPongPlanes::published_mut),
//! [`load`](PingPongPlanes::load)) edit the published generation directly
//! between phases.

use arbor_core::TickId;

use crate::error::ArenaError;
use crate::planes::CellPlanes;
use crate::read::Snapshot;

/// Read + write access during a phase.
///
/// Created by [`PingPongPlanes::begin_phase()`] and released before
/// [`PingPongPlanes::publish()`].
#[must_use]
pub struct PhaseGuard<'a> {
    /// The previous generation. Immutable for the whole phase.
    pub published: &'a CellPlanes,
    /// The generation being built.
    pub staging: &'a mut CellPlanes,
}

/// Two alternating generations of cell planes.
///
/// ```text
/// plane_a  ←─── staging (even generations) / published (odd)
/// plane_b  ←─── published (even generations) / staging (odd)
/// ```
#[derive(Debug)]
pub struct PingPongPlanes {
    plane_a: CellPlanes,
    plane_b: CellPlanes,
    /// Which plane is currently staging (false = A staging, true = B staging).
    b_is_staging: bool,
    /// Whether `begin_phase()` was called without `publish()`.
    phase_in_progress: bool,
    generation: u32,
    last_tick_id: TickId,
}

impl PingPongPlanes {
    /// Create planes for `cell_count` empty cells.
    pub fn new(cell_count: usize) -> Self {
        Self::from_planes(CellPlanes::new(cell_count))
    }

    /// Start from an existing published generation.
    pub fn from_planes(published: CellPlanes) -> Self {
        Self {
            plane_a: published.clone(),
            plane_b: published,
            b_is_staging: false,
            phase_in_progress: false,
            generation: 0,
            last_tick_id: TickId(0),
        }
    }

    /// Number of cells per generation.
    pub fn cell_count(&self) -> usize {
        self.plane_a.cell_count()
    }

    /// Current generation (incremented on publish).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether a phase is open.
    pub fn is_phase_in_progress(&self) -> bool {
        self.phase_in_progress
    }

    /// The published generation.
    pub fn published(&self) -> &CellPlanes {
        if self.b_is_staging {
            &self.plane_a
        } else {
            &self.plane_b
        }
    }

    /// Mutable access to the published generation for authoring.
    ///
    /// Fails while a phase is in progress.
    pub fn published_mut(&mut self) -> Result<&mut CellPlanes, ArenaError> {
        if self.phase_in_progress {
            return Err(ArenaError::PhaseInProgress);
        }
        Ok(if self.b_is_staging {
            &mut self.plane_a
        } else {
            &mut self.plane_b
        })
    }

    /// Replace the published generation with externally authored bytes.
    pub fn load(&mut self, state: Vec<u8>, meta: Vec<u8>) -> Result<(), ArenaError> {
        let planes = CellPlanes::from_bytes(self.cell_count(), state, meta)?;
        *self.published_mut()? = planes;
        Ok(())
    }

    /// Open a phase, borrowing both generations.
    ///
    /// Returns `Err(PhaseInProgress)` if the previous phase was never
    /// published.
    pub fn begin_phase(&mut self) -> Result<PhaseGuard<'_>, ArenaError> {
        if self.phase_in_progress {
            return Err(ArenaError::PhaseInProgress);
        }
        self.phase_in_progress = true;
        let (published, staging) = if self.b_is_staging {
            (&self.plane_a, &mut self.plane_b)
        } else {
            (&self.plane_b, &mut self.plane_a)
        };
        Ok(PhaseGuard { published, staging })
    }

    /// Abandon an open phase without swapping. The staging contents are
    /// left as garbage and will be fully overwritten by the next phase.
    pub fn cancel_phase(&mut self) {
        self.phase_in_progress = false;
    }

    /// Swap staging and published.
    pub fn publish(&mut self, tick_id: TickId) -> Result<(), ArenaError> {
        if !self.phase_in_progress {
            return Err(ArenaError::NoPhaseInProgress);
        }
        self.phase_in_progress = false;
        self.b_is_staging = !self.b_is_staging;
        self.generation = self.generation.wrapping_add(1);
        self.last_tick_id = tick_id;
        Ok(())
    }

    /// Borrow the published generation.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(self.published(), self.last_tick_id, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::Cell;

    #[test]
    fn publish_swaps_generations() {
        let mut pp = PingPongPlanes::new(4);
        {
            let guard = pp.begin_phase().unwrap();
            let mut cells = guard.published.decode_all();
            cells[1] = Cell::vacant(33);
            guard.staging.encode_all(&cells).unwrap();
        }
        // Not visible until publish.
        assert_eq!(pp.published().cell(1), Some(Cell::vacant(0)));
        pp.publish(TickId(1)).unwrap();
        let snap = pp.snapshot();
        assert_eq!(snap.cell(1), Some(Cell::vacant(33)));
        assert_eq!(snap.generation(), 1);
        assert_eq!(snap.tick_id(), TickId(1));
    }

    #[test]
    fn double_begin_is_rejected() {
        let mut pp = PingPongPlanes::new(2);
        let _ = pp.begin_phase().unwrap();
        assert!(matches!(pp.begin_phase(), Err(ArenaError::PhaseInProgress)));
        assert_eq!(pp.published_mut().err(), Some(ArenaError::PhaseInProgress));
        pp.cancel_phase();
        assert!(pp.begin_phase().is_ok());
    }

    #[test]
    fn publish_without_begin_is_rejected() {
        let mut pp = PingPongPlanes::new(2);
        assert_eq!(pp.publish(TickId(0)), Err(ArenaError::NoPhaseInProgress));
    }

    #[test]
    fn load_replaces_published() {
        let mut pp = PingPongPlanes::new(1);
        pp.load(vec![9, 3, 0, 137], vec![1]).unwrap();
        let cell = pp.snapshot().cell(0).unwrap();
        assert!(cell.is_occupied());
        assert_eq!(cell.resource, 10);
        assert!(pp.load(vec![0; 3], vec![0]).is_err());
    }

    #[test]
    fn snapshot_totals() {
        let mut pp = PingPongPlanes::new(3);
        let planes = pp.published_mut().unwrap();
        planes.set_cell(0, &Cell::vacant(5)).unwrap();
        planes.set_cell(2, &Cell::vacant(-2)).unwrap();
        let snap = pp.snapshot();
        assert_eq!(snap.total_resource(), 3);
        assert_eq!(snap.occupied_count(), 0);
    }
}
