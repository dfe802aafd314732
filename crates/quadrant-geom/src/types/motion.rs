// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;

/// Immutable point on the plane.
///
/// Two positions are the same iff their coordinates compare equal; there is
/// no identity beyond the value.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Origin of the plane.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns the position reached after one step at `velocity`.
    ///
    /// Plain Euler step: `(x + dx, y + dy)`. No clamping and no time delta.
    #[must_use]
    pub fn move_to(&self, velocity: Velocity) -> Self {
        Self::new(self.x + velocity.dx, self.y + velocity.dy)
    }

    /// Returns the coordinates as an `[x, y]` array.
    #[must_use]
    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Per-step displacement of a moving object.
///
/// Fields are public: the owning object may change its velocity at will, the
/// grid and command layer only read it.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    /// Horizontal displacement per step.
    pub dx: f64,
    /// Vertical displacement per step.
    pub dy: f64,
}

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl From<(f64, f64)> for Velocity {
    fn from((dx, dy): (f64, f64)) -> Self {
        Self::new(dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_adds_components() {
        let p = Position::new(12.0, 5.0).move_to(Velocity::new(-7.0, 3.0));
        assert_eq!(p, Position::new(5.0, 8.0));
    }

    #[test]
    fn move_to_leaves_source_untouched() {
        let start = Position::new(1.5, -2.0);
        let _ = start.move_to(Velocity::new(10.0, 10.0));
        assert_eq!(start.to_array(), [1.5, -2.0]);
    }

    #[test]
    fn zero_velocity_is_identity() {
        let p = Position::new(-3.25, 7.0);
        assert_eq!(p.move_to(Velocity::ZERO), p);
    }
}
