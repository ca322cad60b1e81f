//! Grid primitives shared by the simulator, session and wire layer.
//!
//! - [`GridCoord`]: integer cell coordinate
//! - [`Heading`]: one of the four compass directions, cyclic for turning
//! - [`GridBounds`]: inclusive grid extent

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinates (integer cell indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Advance `step` cells along `heading`.
    ///
    /// Returns `Err` with the saturated coordinate when the result does not
    /// fit in `i32`.
    pub fn stepped(&self, heading: Heading, step: i32) -> Result<GridCoord, GridCoord> {
        let (dx, dy) = heading.offset();
        let x = self.x.checked_add(dx * step);
        let y = self.y.checked_add(dy * step);
        match (x, y) {
            (Some(x), Some(y)) => Ok(GridCoord::new(x, y)),
            _ => Err(GridCoord::new(
                self.x.saturating_add(dx * step),
                self.y.saturating_add(dy * step),
            )),
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Compass heading of the probe.
///
/// Declaration order is the clockwise turning order:
/// NORTH → EAST → SOUTH → WEST → NORTH.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings in clockwise order
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Position in the clockwise cycle (NORTH = 0)
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rotate by `steps` quarter turns (positive = clockwise)
    pub fn rotated(self, steps: i32) -> Heading {
        let idx = (self.index() as i32 + steps).rem_euclid(4);
        Self::ALL[idx as usize]
    }

    /// 90° clockwise
    #[inline]
    pub fn turned_right(self) -> Heading {
        self.rotated(1)
    }

    /// 90° counter-clockwise
    #[inline]
    pub fn turned_left(self) -> Heading {
        self.rotated(-1)
    }

    /// Unit cell offset for a forward step (NORTH = +y, EAST = +x)
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "NORTH",
            Heading::East => "EAST",
            Heading::South => "SOUTH",
            Heading::West => "WEST",
        };
        f.write_str(name)
    }
}

/// Grid extent.
///
/// Both bounds are INCLUSIVE: a `width` × `height` grid accepts
/// `0..=width` × `0..=height`, i.e. `(width + 1) * (height + 1)` cells.
/// Clients depend on this, so `x == width` stays a legal cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridBounds {
    /// Maximum x coordinate
    pub width: u32,
    /// Maximum y coordinate
    pub height: u32,
}

impl GridBounds {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check whether `coord` lies inside the grid
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && i64::from(coord.x) <= i64::from(self.width)
            && i64::from(coord.y) <= i64::from(self.height)
    }
}
