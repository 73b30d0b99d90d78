//! Core types for the Arbor growth-and-transport automaton.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! per-cell record, its fixed-width byte encoding, the external material
//! classification, identifiers, and the input error types shared by the
//! rest of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod codec;
pub mod error;
pub mod id;
pub mod material;

pub use cell::{Cell, Heading, LineError, Role};
pub use codec::{
    decode_cell, encode_cell, FLAG_ORIGIN, META_STRIDE, RESOURCE_MAX, RESOURCE_MIN, STATE_STRIDE,
};
pub use error::{InputError, PlantError};
pub use id::{LineageId, TickId};
pub use material::{quantize_fertility, Material};
