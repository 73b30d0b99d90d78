//! The [`PhaseKernel`] trait.

use crate::context::{CellOutcome, PhaseContext};

/// A stateless per-cell rule run for one phase.
///
/// # Contract
///
/// - `evaluate()` MUST be a pure function of `ctx` and `index`: it reads
///   only the previous generation and returns only the cell's own next
///   value.
/// - `&self`: kernels hold configuration, never per-tick state.
///
/// The engine evaluates every index of the grid, in parallel, and writes
/// the outcomes into the staging generation.
pub trait PhaseKernel: Send + Sync {
    /// Human-readable name for logging and metrics.
    fn name(&self) -> &str;

    /// Compute the next value of cell `index`.
    fn evaluate(&self, ctx: &PhaseContext<'_>, index: usize) -> CellOutcome;
}
