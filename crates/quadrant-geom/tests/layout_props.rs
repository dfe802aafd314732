// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Property tests for grid cell derivation.

use proptest::prelude::*;
use quadrant_geom::{CellKey, GridLayout, Position};

fn coord() -> impl Strategy<Value = f64> {
    -1.0e6f64..1.0e6f64
}

fn cell_size() -> impl Strategy<Value = f64> {
    0.5f64..500.0f64
}

proptest! {
    #[test]
    fn cell_of_is_deterministic(x in coord(), y in coord(), size in cell_size()) {
        let layout = GridLayout::new(size).unwrap();
        let p = Position::new(x, y);
        prop_assert_eq!(layout.cell_of(p), layout.cell_of(p));
    }

    #[test]
    fn position_lies_inside_its_cell(x in coord(), y in coord(), size in cell_size(),
                                     ox in -100.0f64..100.0, oy in -100.0f64..100.0) {
        let layout = GridLayout::with_offset(size, ox, oy).unwrap();
        let CellKey { x: cx, y: cy } = layout.cell_of(Position::new(x, y));
        // Rounded quotients may sit a hair outside the exact cell.
        let fx = (x + ox) / size - cx as f64;
        let fy = (y + oy) / size - cy as f64;
        prop_assert!((-1e-6..1.0 + 1e-6).contains(&fx), "x fraction {}", fx);
        prop_assert!((-1e-6..1.0 + 1e-6).contains(&fy), "y fraction {}", fy);
    }

    #[test]
    fn lattice_points_land_in_their_cell(i in -10_000i64..10_000, j in -10_000i64..10_000,
                                         ki in 0u32..1024, kj in 0u32..1024, pow in -4i32..8) {
        // Power-of-two cell sizes and 1/1024 steps keep every coordinate exact.
        let size = 2f64.powi(pow);
        let at = |cell: i64, k: u32| (cell as f64 * 1024.0 + f64::from(k)) * size / 1024.0;
        let layout = GridLayout::new(size).unwrap();
        prop_assert_eq!(layout.cell_of(Position::new(at(i, ki), at(j, kj))), CellKey::new(i, j));
    }

    #[test]
    fn cell_of_is_monotone(x1 in coord(), x2 in coord(), size in cell_size()) {
        let layout = GridLayout::new(size).unwrap();
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        prop_assert!(layout.cell_of(Position::new(lo, 0.0)).x <= layout.cell_of(Position::new(hi, 0.0)).x);
    }
}

#[test]
fn points_straddling_the_origin_land_in_distinct_cells() {
    let layout = GridLayout::new(1.0).unwrap();
    let left = layout.cell_of(Position::new(-0.25, 0.0));
    let right = layout.cell_of(Position::new(0.25, 0.0));
    assert_eq!(left, CellKey::new(-1, 0));
    assert_eq!(right, CellKey::new(0, 0));
}
