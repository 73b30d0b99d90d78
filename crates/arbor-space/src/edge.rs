//! Boundary behaviour for positions that fall off the grid.

/// How a lookup treats positions outside the grid.
///
/// Neighbourhood scans use [`Absorb`](EdgeBehavior::Absorb), so edge cells
/// simply have fewer neighbours. Point samples (occlusion cones, steering
/// look-ahead) use [`Clamp`](EdgeBehavior::Clamp) and read the nearest
/// in-bounds cell instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds positions map to the nearest boundary cell.
    Clamp,
    /// Out-of-bounds positions are omitted.
    Absorb,
}

/// Resolve a single axis value under the given edge behaviour.
/// Returns `Some(value)` in bounds, or `None` for Absorb out-of-bounds.
pub(crate) fn resolve_axis(val: i32, len: u32, edge: EdgeBehavior) -> Option<i32> {
    let n = len as i32;
    if val >= 0 && val < n {
        return Some(val);
    }
    match edge {
        EdgeBehavior::Absorb => None,
        EdgeBehavior::Clamp => Some(val.clamp(0, n - 1)),
    }
}
