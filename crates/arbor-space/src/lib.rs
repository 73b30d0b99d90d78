//! Grid geometry for Arbor.
//!
//! A single backend, [`Grid2D`], describes the tile grid the automaton
//! runs on: row-major indexing with `y` growing upward, a fixed 8-way
//! neighbour scan order, and inward clamping for point samples.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid;

pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use grid::{Grid2D, Neighbour, Offset, Pos, OFFSETS_8};
