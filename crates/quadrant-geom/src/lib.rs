// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![deny(
    clippy::all,
    clippy::pedantic,
    rust_2018_idioms,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![doc = r"Geometry primitives for Quadrant.

This crate provides:
- Immutable positions (`Position`) and velocities (`Velocity`) on the plane.
- Integer grid cell coordinates (`CellKey`).
- The uniform grid layout (`GridLayout`) that maps a position to its cell.

Design notes:
- Cell derivation is true floor division, so boundaries are consistent on
  both sides of the origin.
- `f64` throughout; no time delta, one Euler step is one unit of time.
"]

/// Uniform grid layout: cell size, offset and position to cell mapping.
pub mod layout;
/// Foundational geometric value types.
pub mod types;

pub use layout::{GridLayout, LayoutError, DEFAULT_CELL_SIZE};
pub use types::cell::CellKey;
pub use types::motion::{Position, Velocity};
