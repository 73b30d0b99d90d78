//! Rectangular tile grid with an 8-connected neighbourhood.

use std::fmt;
use std::ops::{Add, Mul, Neg};

use smallvec::SmallVec;

use crate::edge::{resolve_axis, EdgeBehavior};
use crate::error::SpaceError;

// ── Pos / Offset ────────────────────────────────────────────────

/// A grid position. `y` grows upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos {
    /// Column.
    pub x: i32,
    /// Row, 0 at the bottom.
    pub y: i32,
}

impl Pos {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A displacement between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    /// Horizontal component.
    pub dx: i32,
    /// Vertical component (positive is up).
    pub dy: i32,
}

impl Offset {
    /// Construct an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// The zero offset.
    pub const ZERO: Offset = Offset::new(0, 0);
}

impl Add<Offset> for Pos {
    type Output = Pos;
    fn add(self, o: Offset) -> Pos {
        Pos::new(self.x + o.dx, self.y + o.dy)
    }
}

impl Add for Offset {
    type Output = Offset;
    fn add(self, o: Offset) -> Offset {
        Offset::new(self.dx + o.dx, self.dy + o.dy)
    }
}

impl Neg for Offset {
    type Output = Offset;
    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}

impl Mul<i32> for Offset {
    type Output = Offset;
    fn mul(self, k: i32) -> Offset {
        Offset::new(self.dx * k, self.dy * k)
    }
}

/// The fixed neighbour scan order: N, S, W, E, NW, NE, SW, SE.
///
/// Every scan that can tie-break (parent lookup in particular) walks
/// neighbours in this order.
pub const OFFSETS_8: [Offset; 8] = [
    Offset::new(0, 1),
    Offset::new(0, -1),
    Offset::new(-1, 0),
    Offset::new(1, 0),
    Offset::new(-1, 1),
    Offset::new(1, 1),
    Offset::new(-1, -1),
    Offset::new(1, -1),
];

/// An in-bounds neighbour produced by [`Grid2D::neighbours`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbour {
    /// Offset from the centre cell.
    pub offset: Offset,
    /// Position of the neighbour.
    pub pos: Pos,
    /// Row-major index of the neighbour.
    pub index: usize,
}

// ── Grid2D ──────────────────────────────────────────────────────

/// A `width * height` grid stored row-major from the bottom row up.
///
/// `index = y * width + x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid2D {
    width: u32,
    height: u32,
}

impl Grid2D {
    /// Largest accepted size along either axis.
    pub const MAX_DIM: u32 = 1 << 15;

    /// Returns `Err(SpaceError::EmptyGrid)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds [`MAX_DIM`](Self::MAX_DIM).
    pub fn new(width: u32, height: u32) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        if width > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether `p` lies on the grid.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width as i32 && p.y < self.height as i32
    }

    /// Row-major index of `p`, or `None` if off-grid.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        self.contains(p)
            .then(|| p.y as usize * self.width as usize + p.x as usize)
    }

    /// Position of a row-major index. The index is not range-checked.
    #[inline]
    pub fn pos(&self, index: usize) -> Pos {
        let w = self.width as usize;
        Pos::new((index % w) as i32, (index / w) as i32)
    }

    /// Resolve `p` under `edge`, returning the in-bounds position.
    pub fn resolve(&self, p: Pos, edge: EdgeBehavior) -> Option<Pos> {
        let x = resolve_axis(p.x, self.width, edge)?;
        let y = resolve_axis(p.y, self.height, edge)?;
        Some(Pos::new(x, y))
    }

    /// Clamp `p` onto the grid and return its index.
    ///
    /// This is [`resolve`](Self::resolve) under [`EdgeBehavior::Clamp`],
    /// which always lands on a non-empty grid.
    #[inline]
    pub fn clamped_index(&self, p: Pos) -> usize {
        self.resolve(p, EdgeBehavior::Clamp)
            .and_then(|q| self.index(q))
            .unwrap_or(0)
    }

    /// In-bounds neighbours of `p` in [`OFFSETS_8`] order.
    pub fn neighbours(&self, p: Pos) -> SmallVec<[Neighbour; 8]> {
        OFFSETS_8
            .iter()
            .filter_map(|&offset| {
                let pos = self.resolve(p + offset, EdgeBehavior::Absorb)?;
                let index = self.index(pos)?;
                Some(Neighbour { offset, pos, index })
            })
            .collect()
    }
}
