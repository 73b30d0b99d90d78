//! Double-buffered storage for Arbor cell planes.
//!
//! Every phase reads one generation and writes the other; nothing ever
//! reads and writes the same buffer. [`PingPongPlanes`] owns both
//! generations and enforces the begin/publish lifecycle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pingpong;
pub mod planes;
pub mod read;

pub use error::ArenaError;
pub use pingpong::{PhaseGuard, PingPongPlanes};
pub use planes::CellPlanes;
pub use read::Snapshot;
