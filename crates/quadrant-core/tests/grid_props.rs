// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Grid membership invariants under arbitrary insert/remove sequences.

use proptest::prelude::*;
use quadrant_core::{GridLayout, ObjectHandle, SpatialGrid};
use quadrant_dry_tests::Body;

fn bodies(n: usize, coords: &[(f64, f64)]) -> Vec<ObjectHandle> {
    coords
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, (x, y))| Body::at(*x, *y).handle(&format!("b{i}")))
        .collect()
}

proptest! {
    #[test]
    fn insert_then_remove_round_trips(
        coords in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..24),
        size in 1.0f64..100.0,
    ) {
        let mut grid = SpatialGrid::new(GridLayout::new(size).unwrap());
        let objs = bodies(coords.len(), &coords);
        let cells: Vec<_> = objs.iter().map(|o| grid.insert(o).unwrap()).collect();
        prop_assert_eq!(grid.len(), objs.len());

        for (o, cell) in objs.iter().zip(&cells) {
            prop_assert!(grid.remove(o.id(), *cell));
            prop_assert!(!grid.contains(*cell, o.id()));
            prop_assert!(!grid.remove(o.id(), *cell));
            // No bucket is ever left present but empty.
            for (c, count) in grid.occupancy() {
                prop_assert!(count > 0, "empty bucket at {}", c);
            }
        }
        prop_assert!(grid.is_empty());
        prop_assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn every_object_sits_in_the_cell_of_its_position(
        coords in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..24),
    ) {
        let mut grid = SpatialGrid::new(GridLayout::new(25.0).unwrap());
        let objs = bodies(coords.len(), &coords);
        for o in &objs {
            let cell = grid.insert(o).unwrap();
            prop_assert_eq!(cell, grid.cell_of(o.position().unwrap()));
        }
        let total: usize = grid.occupancy().iter().map(|(_, n)| n).sum();
        prop_assert_eq!(total, objs.len());
    }
}
