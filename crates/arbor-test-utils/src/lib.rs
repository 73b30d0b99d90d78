//! Test fixtures and invariant checks for Arbor development.
//!
//! Provides a [`Fixture`] builder for hand-authored scenes, seeded
//! [`random_world`]s for property-style integration tests, and checks that
//! re-derive topology from a published generation.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod checks;
pub mod fixtures;
pub mod random;

pub use checks::{context_of, lineage_violations, max_inhibition, occupied_positions};
pub use fixtures::{lineage, Fixture};
pub use random::random_world;
