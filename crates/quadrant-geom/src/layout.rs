// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::cell::CellKey;
use crate::types::motion::Position;
use thiserror::Error;

/// Cell size used when no configuration is given.
pub const DEFAULT_CELL_SIZE: f64 = 10.0;

/// Rejected grid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LayoutError {
    /// Cell size must be a positive, finite number.
    #[error("cell size must be positive and finite, got {0}")]
    NonPositiveCellSize(f64),
    /// Offsets must be finite.
    #[error("grid offset must be finite, got ({0}, {1})")]
    NonFiniteOffset(f64, f64),
}

/// Fixed geometry of a uniform grid.
///
/// Invariants:
/// - `cell_size` is finite and strictly positive.
/// - `offset` components are finite.
/// - Neither changes after construction.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawLayout")
)]
pub struct GridLayout {
    cell_size: f64,
    offset: (f64, f64),
}

impl GridLayout {
    /// Creates a layout with the given cell size and no offset.
    pub fn new(cell_size: f64) -> Result<Self, LayoutError> {
        Self::with_offset(cell_size, 0.0, 0.0)
    }

    /// Creates a layout with the given cell size and coordinate offset.
    pub fn with_offset(cell_size: f64, offset_x: f64, offset_y: f64) -> Result<Self, LayoutError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(LayoutError::NonPositiveCellSize(cell_size));
        }
        if !(offset_x.is_finite() && offset_y.is_finite()) {
            return Err(LayoutError::NonFiniteOffset(offset_x, offset_y));
        }
        Ok(Self {
            cell_size,
            offset: (offset_x, offset_y),
        })
    }

    /// Side length of one cell.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Offset added to both coordinates before division.
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Maps a position to the cell containing it.
    ///
    /// Exact floor division of `x + offset_x` by `cell_size`, likewise for
    /// `y`. The quotient is taken through the remainder, so a coordinate just
    /// below a boundary stays in the lower cell even when the rounded quotient
    /// would land on the boundary (`1.0` over `0.1` is cell `9`). Flooring
    /// keeps `-0.5` and `0.5` in different cells. Pure and total: out-of-range
    /// quotients saturate and non-finite coordinates map to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, position: Position) -> CellKey {
        let x = floor_div(position.x() + self.offset.0, self.cell_size);
        let y = floor_div(position.y() + self.offset.1, self.cell_size);
        CellKey::new(x as i64, y as i64)
    }
}

/// `floor(a / b)` for finite, positive `b`, exact at cell boundaries.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem < 0.0 {
        div -= 1.0;
    }
    let floored = div.floor();
    // `a - rem` is a multiple of `b`; snap away the rounding of the division.
    if div - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            offset: (0.0, 0.0),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLayout {
    cell_size: f64,
    #[serde(default)]
    offset: (f64, f64),
}

#[cfg(feature = "serde")]
impl TryFrom<RawLayout> for GridLayout {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        Self::with_offset(raw.cell_size, raw.offset.0, raw.offset.1)
    }
}
