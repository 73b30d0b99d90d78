//! World driver for the Arbor growth automaton.
//!
//! [`LockstepWorld`] owns the double-buffered cell planes and the external
//! inputs (materials and fertility), and runs one phase of the four-tick
//! cycle per [`step()`](LockstepWorld::step). [`TickScheduler`] maps the
//! tick to its phase kernel; [`snapshot_digest`] fingerprints a published
//! generation for determinism checks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod digest;
pub mod lockstep;
pub mod metrics;
pub mod scheduler;

pub use config::{ConfigError, WorldConfig};
pub use digest::{planes_digest, snapshot_digest};
pub use lockstep::{EditError, LockstepWorld, Seed, StepError, StepReport};
pub use metrics::StepMetrics;
pub use scheduler::TickScheduler;
