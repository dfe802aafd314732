//! Core value types shared by the grid and the command layer.
//!
//! Positions are immutable values; advancing one produces a new `Position`.
//! Velocities are plain mutable components owned by the object they describe.

#[doc = "Integer grid cell coordinates."]
pub mod cell;
#[doc = "Positions, velocities and the Euler step between them."]
pub mod motion;
