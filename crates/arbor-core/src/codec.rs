//! Fixed-width byte encoding of [`Cell`] records.
//!
//! Two row-major planes are exchanged with the host:
//!
//! ```text
//! state: [lineage, packed heading, inhibition, resource]  (4 bytes/cell)
//! meta:  [flags:4 | role:4]                                (1 byte/cell)
//! ```
//!
//! `packed heading = bucket * 8 + error level`. Resource is stored with a
//! +127 offset. The only defined flag is [`FLAG_ORIGIN`]; other flag bits
//! are ignored on decode and written as zero.
//!
//! Decoding never fails: out-of-range values clamp and a zero lineage byte
//! always yields an unoccupied cell.

use crate::cell::{Cell, Heading, LineError, Role, ERROR_LEVELS};
use crate::id::LineageId;

pub use crate::cell::{RESOURCE_MAX, RESOURCE_MIN};

/// Bytes per cell in the state plane.
pub const STATE_STRIDE: usize = 4;

/// Bytes per cell in the meta plane.
pub const META_STRIDE: usize = 1;

/// Meta bit marking a planted origin cell.
pub const FLAG_ORIGIN: u8 = 0x10;

const RESOURCE_OFFSET: i16 = 127;

/// Encode a signed resource value into its offset byte.
#[inline]
pub fn encode_resource(v: i16) -> u8 {
    (v as i32 + RESOURCE_OFFSET as i32).clamp(0, 255) as u8
}

/// Decode an offset resource byte, clamped to the storable range.
#[inline]
pub fn decode_resource(b: u8) -> i16 {
    (b as i16 - RESOURCE_OFFSET).clamp(RESOURCE_MIN, RESOURCE_MAX)
}

/// Pack a heading and line error into one byte.
#[inline]
pub fn pack_heading(heading: Heading, error: LineError) -> u8 {
    heading.bucket() * ERROR_LEVELS + error.get()
}

/// Unpack a heading byte. Every byte value is valid.
#[inline]
pub fn unpack_heading(b: u8) -> (Heading, LineError) {
    (
        Heading::new(b / ERROR_LEVELS),
        LineError::new(b % ERROR_LEVELS),
    )
}

/// Decode one cell from its state bytes and meta byte.
///
/// `state` should hold [`STATE_STRIDE`] bytes; missing bytes read as zero.
pub fn decode_cell(state: &[u8], meta: u8) -> Cell {
    let byte = |i: usize| state.get(i).copied().unwrap_or(0);
    let resource = decode_resource(byte(3));
    match LineageId::new(byte(0)) {
        None => Cell::vacant(resource),
        Some(lineage) => {
            let (heading, line_error) = unpack_heading(byte(1));
            Cell {
                lineage: Some(lineage),
                origin: meta & FLAG_ORIGIN != 0,
                role: Role::from_nibble(meta),
                heading,
                line_error,
                inhibition: byte(2),
                resource,
            }
        }
    }
}

/// Encode one cell into its state bytes and meta byte.
///
/// Unoccupied cells write zero heading, inhibition and meta.
pub fn encode_cell(cell: &Cell) -> ([u8; STATE_STRIDE], u8) {
    let resource = encode_resource(cell.resource);
    match cell.lineage {
        None => ([0, 0, 0, resource], 0),
        Some(lineage) => (
            [
                lineage.get(),
                pack_heading(cell.heading, cell.line_error),
                cell.inhibition,
                resource,
            ],
            cell.role as u8 | if cell.origin { FLAG_ORIGIN } else { 0 },
        ),
    }
}
