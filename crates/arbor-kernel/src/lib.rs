//! Per-cell phase kernels for the Arbor growth automaton.
//!
//! Every kernel is a pure function from a frozen [`PhaseContext`] and a
//! cell index to that cell's next value. Topology (who is whose parent) is
//! never stored; [`topology`] re-derives it from each cell's heading and
//! line error, using the same [`stepper`] that created the cell.
//!
//! Phase kernels:
//!
//! - [`Settle`]: resource transport along inferred edges, inhibition
//!   relaxation, and checkerboard substrate diffusion
//! - [`SapExchange`]: roots siphon from rich substrate
//! - [`GrowthResolver`]: at most one birth per empty cell

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod growth;
pub mod hash;
pub mod kernel;
pub mod params;
pub mod sap;
pub mod settle;
pub mod stepper;
pub mod topology;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{CellOutcome, Phase, PhaseContext, PhaseTally};
pub use growth::{GrowthResolver, Proposal, ProposalKind};
pub use kernel::PhaseKernel;
pub use params::{Features, KernelParams, CHANCE_ONE};
pub use sap::SapExchange;
pub use settle::{Axis, Settle};
pub use topology::{children_of, get_parent, is_child_of, ParentLookup};
