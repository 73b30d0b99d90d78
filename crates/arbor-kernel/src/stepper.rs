//! Integer line stepper shared by creation and parent inference.
//!
//! Each heading bucket maps to a direction vector whose major component is
//! 8, so the minor/major ratio is `|minor|` eighths. A step is either the
//! axis-aligned *primary* step along the major axis or the *diagonal* step;
//! the line error accumulates the ratio and a diagonal is taken whenever it
//! reaches a full 8.
//!
//! ```text
//! advance:   acc = e + r; acc >= 8 ? (diagonal, acc - 8) : (primary, acc)
//! backward:  e' < r ? -diagonal : -primary
//! ```
//!
//! After a diagonal `e' = e + r - 8 < r`; after a primary `e' = e + r >= r`,
//! so [`backward_step`] recovers the forward step exactly from what the
//! child stores.

use arbor_core::{Heading, LineError};
use arbor_space::Offset;

/// Direction vector for each bucket, clockwise from +y.
const DIRECTIONS: [(i8, i8); 32] = [
    (0, 8),
    (2, 8),
    (3, 8),
    (5, 8),
    (8, 8),
    (8, 5),
    (8, 3),
    (8, 2),
    (8, 0),
    (8, -2),
    (8, -3),
    (8, -5),
    (8, -8),
    (5, -8),
    (3, -8),
    (2, -8),
    (0, -8),
    (-2, -8),
    (-3, -8),
    (-5, -8),
    (-8, -8),
    (-8, -5),
    (-8, -3),
    (-8, -2),
    (-8, 0),
    (-8, 2),
    (-8, 3),
    (-8, 5),
    (-8, 8),
    (-5, 8),
    (-3, 8),
    (-2, 8),
];

/// Unit compass directions, clockwise from +y.
const COMPASS: [Offset; 8] = [
    Offset::new(0, 1),
    Offset::new(1, 1),
    Offset::new(1, 0),
    Offset::new(1, -1),
    Offset::new(0, -1),
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
];

/// The result of advancing one cell along a heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Unit offset to the new cell.
    pub offset: Offset,
    /// Error the new cell stores.
    pub error: LineError,
}

/// The bucket's direction vector (major component 8).
pub fn direction(heading: Heading) -> Offset {
    let (dx, dy) = DIRECTIONS[heading.bucket() as usize];
    Offset::new(dx as i32, dy as i32)
}

fn ratio_eighths(heading: Heading) -> u8 {
    let d = direction(heading);
    d.dx.unsigned_abs().min(d.dy.unsigned_abs()) as u8
}

fn primary_and_diagonal(heading: Heading) -> (Offset, Offset) {
    let d = direction(heading);
    let (sx, sy) = (d.dx.signum(), d.dy.signum());
    let primary = if d.dy.abs() >= d.dx.abs() {
        Offset::new(0, sy)
    } else {
        Offset::new(sx, 0)
    };
    (primary, Offset::new(sx, sy))
}

/// Advance one cell from error `error` along `heading`.
pub fn advance(heading: Heading, error: LineError) -> Step {
    let r = ratio_eighths(heading);
    let (primary, diagonal) = primary_and_diagonal(heading);
    let acc = error.get() + r;
    if acc >= 8 {
        Step {
            offset: diagonal,
            error: LineError::new(acc - 8),
        }
    } else {
        Step {
            offset: primary,
            error: LineError::new(acc),
        }
    }
}

/// Offset from a cell back to the cell that created it.
pub fn backward_step(heading: Heading, error: LineError) -> Offset {
    let r = ratio_eighths(heading);
    let (primary, diagonal) = primary_and_diagonal(heading);
    if error.get() < r {
        -diagonal
    } else {
        -primary
    }
}

/// Nearest of the eight compass directions to `heading`.
pub fn compass_unit(heading: Heading) -> Offset {
    COMPASS[(((heading.bucket() + 2) / 4) % 8) as usize]
}
