//! One generation of encoded cell state.

use arbor_core::{decode_cell, encode_cell, Cell, META_STRIDE, STATE_STRIDE};
use rayon::prelude::*;

use crate::error::ArenaError;

/// The state and meta byte planes for every cell.
///
/// Both planes are row-major and always sized for exactly `cell_count`
/// cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellPlanes {
    cell_count: usize,
    state: Vec<u8>,
    meta: Vec<u8>,
}

impl CellPlanes {
    /// Planes where every cell is unoccupied with zero resource.
    pub fn new(cell_count: usize) -> Self {
        let (vacant, meta) = encode_cell(&Cell::vacant(0));
        let mut state = Vec::with_capacity(cell_count * STATE_STRIDE);
        for _ in 0..cell_count {
            state.extend_from_slice(&vacant);
        }
        Self {
            cell_count,
            state,
            meta: vec![meta; cell_count * META_STRIDE],
        }
    }

    /// Take ownership of externally authored planes.
    ///
    /// Lengths are checked; contents are not, since decoding is tolerant.
    pub fn from_bytes(
        cell_count: usize,
        state: Vec<u8>,
        meta: Vec<u8>,
    ) -> Result<Self, ArenaError> {
        check_len("state", cell_count * STATE_STRIDE, state.len())?;
        check_len("meta", cell_count * META_STRIDE, meta.len())?;
        Ok(Self {
            cell_count,
            state,
            meta,
        })
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// The raw state plane.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// The raw meta plane.
    pub fn meta(&self) -> &[u8] {
        &self.meta
    }

    /// Decode one cell.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        let start = index.checked_mul(STATE_STRIDE)?;
        let state = self.state.get(start..start + STATE_STRIDE)?;
        let meta = *self.meta.get(index * META_STRIDE)?;
        Some(decode_cell(state, meta))
    }

    /// Encode one cell in place.
    pub fn set_cell(&mut self, index: usize, cell: &Cell) -> Result<(), ArenaError> {
        if index >= self.cell_count {
            return Err(ArenaError::IndexOutOfRange {
                index,
                cell_count: self.cell_count,
            });
        }
        let (state, meta) = encode_cell(cell);
        let start = index * STATE_STRIDE;
        self.state[start..start + STATE_STRIDE].copy_from_slice(&state);
        self.meta[index * META_STRIDE] = meta;
        Ok(())
    }

    /// Decode every cell, in index order.
    pub fn decode_all(&self) -> Vec<Cell> {
        self.state
            .par_chunks_exact(STATE_STRIDE)
            .zip(self.meta.par_chunks_exact(META_STRIDE))
            .map(|(state, meta)| decode_cell(state, meta[0]))
            .collect()
    }

    /// Overwrite every cell from decoded values.
    ///
    /// `cells` must hold exactly `cell_count` entries.
    pub fn encode_all(&mut self, cells: &[Cell]) -> Result<(), ArenaError> {
        check_len("cells", self.cell_count, cells.len())?;
        self.state
            .par_chunks_exact_mut(STATE_STRIDE)
            .zip(self.meta.par_chunks_exact_mut(META_STRIDE))
            .zip(cells.par_iter())
            .for_each(|((state, meta), cell)| {
                let (s, m) = encode_cell(cell);
                state.copy_from_slice(&s);
                meta[0] = m;
            });
        Ok(())
    }
}

fn check_len(plane: &'static str, expected: usize, actual: usize) -> Result<(), ArenaError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ArenaError::PlaneLength {
            plane,
            expected,
            actual,
        })
    }
}
