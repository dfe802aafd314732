// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grid + bundle map fixture for neighborhood tests.

use crate::bodies::Body;
use crate::handlers::RecordingHandler;
use quadrant_core::{
    BundleMap, CollisionBundle, GridLayout, NeighborhoodUpdate, ObjectHandle, ObjectId,
    SharedBundles, SharedGrid, SpatialGrid,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared grid, shared bundle map and a recording handler, wired together.
pub struct WorldFixture {
    /// Shared grid.
    pub grid: SharedGrid,
    /// Shared bundle map.
    pub bundles: SharedBundles,
    /// Handler every collision check delegates to.
    pub handler: RecordingHandler,
}

impl WorldFixture {
    /// Fixture over a grid with the given cell size and no offset.
    ///
    /// # Panics
    /// Panics if `cell_size` is not a valid cell size.
    #[allow(clippy::expect_used)]
    pub fn with_cell_size(cell_size: f64) -> Self {
        let layout = GridLayout::new(cell_size).expect("valid cell size");
        Self {
            grid: Rc::new(RefCell::new(SpatialGrid::new(layout))),
            bundles: BundleMap::shared(),
            handler: RecordingHandler::new(),
        }
    }

    /// Binds a neighborhood update to `object`.
    pub fn track(&self, object: ObjectHandle) -> NeighborhoodUpdate {
        NeighborhoodUpdate::new(
            object,
            Rc::clone(&self.grid),
            Rc::clone(&self.bundles),
            self.handler.shared(),
        )
    }

    /// Spawns `body` under `label` and binds a neighborhood update to it.
    pub fn track_body(&self, label: &str, body: Body) -> (NeighborhoodUpdate, Rc<RefCell<Body>>) {
        let (handle, typed) = body.spawn(label);
        (self.track(handle), typed)
    }

    /// Current bundle for `id`.
    pub fn bundle(&self, id: ObjectId) -> Option<Rc<CollisionBundle>> {
        self.bundles.borrow().get(id)
    }
}
