// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Uniform spatial grid: cell membership bookkeeping.
//!
//! Invariants:
//! - A cell present in the map always has at least one occupant; the bucket
//!   is dropped as soon as its last occupant leaves.
//! - Occupants are deduplicated by [`ObjectId`] and held weakly.
//! - Within a bucket, occupants iterate in ascending id order.

use crate::error::CapabilityError;
use crate::ident::ObjectId;
use crate::object::{ObjectHandle, WeakObject};
use quadrant_geom::{CellKey, GridLayout, Position};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

type Bucket = BTreeMap<ObjectId, WeakObject>;

/// Maps cells of a fixed [`GridLayout`] to the objects registered in them.
///
/// Insert and remove are `O(log k)` in the bucket size on top of an `O(1)`
/// amortized cell lookup. The grid never decides on its own when an object
/// moves; [`NeighborhoodUpdate`](crate::NeighborhoodUpdate) drives that.
#[derive(Debug)]
pub struct SpatialGrid {
    layout: GridLayout,
    cells: FxHashMap<CellKey, Bucket>,
}

impl SpatialGrid {
    /// Creates an empty grid over `layout`.
    #[must_use]
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            cells: FxHashMap::default(),
        }
    }

    /// Layout fixed at construction.
    #[must_use]
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Cell containing `position`. Pure and total.
    #[must_use]
    pub fn cell_of(&self, position: Position) -> CellKey {
        self.layout.cell_of(position)
    }

    /// Registers `object` in the cell of its current position and returns that cell.
    ///
    /// Inserting an object that is already in the cell is a no-op.
    pub fn insert(&mut self, object: &ObjectHandle) -> Result<CellKey, CapabilityError> {
        let cell = self.cell_of(object.position()?);
        self.insert_at(object, cell);
        Ok(cell)
    }

    /// Registers `object` in `cell` without consulting its position.
    ///
    /// Used when the caller has already derived the cell and must not fail
    /// after mutating other state.
    pub fn insert_at(&mut self, object: &ObjectHandle, cell: CellKey) {
        self.cells
            .entry(cell)
            .or_default()
            .entry(object.id())
            .or_insert_with(|| object.downgrade());
    }

    /// Removes the object with `id` from `cell`, dropping the bucket if it empties.
    ///
    /// Missing objects and missing cells are ignored, so this is idempotent.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: ObjectId, cell: CellKey) -> bool {
        let Some(bucket) = self.cells.get_mut(&cell) else {
            return false;
        };
        let removed = bucket.remove(&id).is_some();
        if bucket.is_empty() {
            self.cells.remove(&cell);
        }
        removed
    }

    /// Snapshot of the occupants of `cell`, ascending by id.
    ///
    /// Unknown cells yield an empty vector. The snapshot is detached from the
    /// grid, so callers may mutate the grid while iterating it.
    #[must_use]
    pub fn objects_in(&self, cell: CellKey) -> Vec<WeakObject> {
        self.cells
            .get(&cell)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if `id` is registered in `cell`.
    #[must_use]
    pub fn contains(&self, cell: CellKey, id: ObjectId) -> bool {
        self.cells.get(&cell).is_some_and(|b| b.contains_key(&id))
    }

    /// Returns `true` if `cell` currently has a bucket.
    #[must_use]
    pub fn is_occupied(&self, cell: CellKey) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of registrations across all cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no object is registered anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells with their occupant counts, sorted by cell.
    #[must_use]
    pub fn occupancy(&self) -> Vec<(CellKey, usize)> {
        let mut out: Vec<(CellKey, usize)> =
            self.cells.iter().map(|(cell, b)| (*cell, b.len())).collect();
        out.sort_unstable_by_key(|(cell, _)| *cell);
        out
    }
}
