//! Per-step metrics for the world driver.
//!
//! [`StepMetrics`] captures timing and the kernel's diagnostic counters for
//! a single phase, for logging and profiling.

use arbor_kernel::{Phase, PhaseTally};

/// Timing and diagnostic counters collected during a single step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepMetrics {
    /// Which phase ran.
    pub phase: Phase,
    /// Wall-clock time for the whole step, in microseconds.
    pub total_us: u64,
    /// Cells born (growth phase only).
    pub births: u32,
    /// Candidates left empty because several proposals survived.
    pub contested_claims: u32,
    /// Proposals rejected for insufficient resource.
    pub starved_claims: u32,
    /// Total resource removed by creation costs.
    pub cost_charged: i64,
    /// Parent lookups that matched more than one neighbour.
    pub ambiguous_parents: u32,
    /// Resource writes clamped into the storable range.
    pub saturated_writes: u32,
    /// Occupied cells after the step.
    pub occupied: usize,
}

impl Default for StepMetrics {
    fn default() -> Self {
        Self::from_tally(Phase::SettleX, 0, &PhaseTally::default(), 0)
    }
}

impl StepMetrics {
    /// Flatten a phase tally into metrics.
    pub fn from_tally(phase: Phase, total_us: u64, tally: &PhaseTally, occupied: usize) -> Self {
        Self {
            phase,
            total_us,
            births: tally.births,
            contested_claims: tally.contested_claims,
            starved_claims: tally.starved_claims,
            cost_charged: tally.cost_charged,
            ambiguous_parents: tally.ambiguous_parents,
            saturated_writes: tally.saturated_writes,
            occupied,
        }
    }
}
