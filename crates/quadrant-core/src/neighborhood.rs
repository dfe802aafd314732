// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-object neighborhood tracking.
//!
//! A [`NeighborhoodUpdate`] is bound to one object, the shared grid, the
//! shared bundle map and the narrow-phase handler. It remembers the cell the
//! object was last confirmed in. Each update is cheap when the object stays
//! put; only a change of cell (or the very first update) touches the grid and
//! rebuilds the object's [`CollisionBundle`].

use crate::cmd::{CheckCollisionCommand, CollisionBundle, Command};
use crate::collision::CollisionHandler;
use crate::error::CommandError;
use crate::grid::SpatialGrid;
use crate::ident::ObjectId;
use crate::object::ObjectHandle;
use quadrant_geom::CellKey;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Grid shared by every object's neighborhood update.
pub type SharedGrid = Rc<RefCell<SpatialGrid>>;
/// Bundle map shared by every object's neighborhood update and owned by the caller.
pub type SharedBundles = Rc<RefCell<BundleMap>>;

/// Caller-owned mapping from object to its current candidate bundle.
///
/// The broad phase only inserts or overwrites entries. Eviction is the
/// owner's call (see [`NeighborhoodUpdate::detach`]).
#[derive(Debug, Default)]
pub struct BundleMap {
    bundles: BTreeMap<ObjectId, Rc<CollisionBundle>>,
}

impl BundleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh map for sharing between neighborhood updates.
    #[must_use]
    pub fn shared() -> SharedBundles {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Current bundle for `id`, if one was ever built.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<Rc<CollisionBundle>> {
        self.bundles.get(&id).cloned()
    }

    /// Stores `bundle` for `id`, returning the bundle it replaced.
    pub fn insert(&mut self, id: ObjectId, bundle: Rc<CollisionBundle>) -> Option<Rc<CollisionBundle>> {
        self.bundles.insert(id, bundle)
    }

    /// Drops the bundle for `id`.
    pub fn evict(&mut self, id: ObjectId) -> Option<Rc<CollisionBundle>> {
        self.bundles.remove(&id)
    }

    /// Number of objects with a bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Returns `true` if no bundle has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Bundles in ascending object id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Rc<CollisionBundle>)> + '_ {
        self.bundles.iter().map(|(id, b)| (*id, b))
    }

    /// Objects whose bundle holds a check against `target`.
    ///
    /// These are the bundles that go stale when `target` is despawned.
    #[must_use]
    pub fn referencing(&self, target: ObjectId) -> Vec<ObjectId> {
        self.bundles
            .iter()
            .filter(|(_, bundle)| bundle.pairs().iter().any(|(_, other)| *other == target))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Cloned handles to every bundle, for execution without holding a borrow.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rc<CollisionBundle>> {
        self.bundles.values().cloned().collect()
    }

    /// Executes every bundle in ascending object id order.
    ///
    /// Stops at the first failing bundle. Returns the number of candidate
    /// checks executed.
    pub fn execute_all(&self) -> Result<usize, CommandError> {
        let mut checks = 0;
        for bundle in self.bundles.values() {
            bundle.execute()?;
            checks += bundle.len();
        }
        Ok(checks)
    }
}

/// Outcome of one [`NeighborhoodUpdate::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// The object is still in the cell it was last confirmed in; nothing changed.
    Stayed(CellKey),
    /// The object stayed in `cell` but its bundle had been invalidated, so it
    /// was rebuilt against the cell's current occupants.
    Refreshed {
        /// Cell the object occupies.
        cell: CellKey,
        /// Number of checks in the rebuilt bundle.
        candidates: usize,
    },
    /// The object entered `to` and its bundle was rebuilt.
    Moved {
        /// Previous cell; `None` on the first update.
        from: Option<CellKey>,
        /// Cell the object now occupies.
        to: CellKey,
        /// Number of checks in the rebuilt bundle.
        candidates: usize,
    },
}

impl Migration {
    /// Returns `true` if the object changed cell (or joined the grid).
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// Returns `true` if the update built a new bundle.
    #[must_use]
    pub fn rebuilt(&self) -> bool {
        !matches!(self, Self::Stayed(_))
    }

    /// Cell the object occupies after the update.
    #[must_use]
    pub fn cell(&self) -> CellKey {
        match self {
            Self::Stayed(cell) | Self::Refreshed { cell, .. } | Self::Moved { to: cell, .. } => {
                *cell
            }
        }
    }
}

/// Keeps one object's grid membership and candidate bundle current.
///
/// State machine: uninitialised (`last_cell == None`) until the first
/// successful update, then tracking the confirmed cell. State only advances
/// on success, so a failed update leaves it as the last good one. An
/// [`invalidate`](Self::invalidate)d process rebuilds on its next update
/// even if the cell is unchanged.
pub struct NeighborhoodUpdate {
    object: ObjectHandle,
    grid: SharedGrid,
    bundles: SharedBundles,
    handler: Rc<dyn CollisionHandler>,
    last_cell: Cell<Option<CellKey>>,
    stale: Cell<bool>,
}

impl NeighborhoodUpdate {
    /// Binds a new, uninitialised update process to `object`.
    pub fn new(
        object: ObjectHandle,
        grid: SharedGrid,
        bundles: SharedBundles,
        handler: Rc<dyn CollisionHandler>,
    ) -> Self {
        Self {
            object,
            grid,
            bundles,
            handler,
            last_cell: Cell::new(None),
            stale: Cell::new(false),
        }
    }

    /// Object this process tracks.
    pub fn object(&self) -> &ObjectHandle {
        &self.object
    }

    /// Cell the object was last confirmed in.
    #[must_use]
    pub fn last_cell(&self) -> Option<CellKey> {
        self.last_cell.get()
    }

    /// Returns `true` if the next update will rebuild regardless of movement.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Forces the next [`update`](Self::update) to rebuild the bundle.
    ///
    /// Used when an object the bundle names has left the grid. The last cell
    /// is kept so the rebuild still removes the object from it if it moved.
    pub fn invalidate(&self) {
        self.stale.set(true);
    }

    /// Re-derives the object's cell and migrates it if the cell changed.
    ///
    /// On migration the object leaves its old bucket, joins the new one, and
    /// gets a brand-new bundle with one check per other occupant (ascending
    /// by id), replacing whatever bundle it had. Without migration nothing
    /// is touched.
    pub fn update(&self) -> Result<Migration, CommandError> {
        let id = self.object.id();
        let position = self.object.position()?;
        let mut grid = self
            .grid
            .try_borrow_mut()
            .map_err(|_| CommandError::Busy("spatial grid"))?;
        let new_cell = grid.cell_of(position);
        let from = self.last_cell.get();
        let stale = self.stale.get();
        if from == Some(new_cell) && !stale {
            trace!(object = %id, cell = %new_cell, "neighborhood unchanged");
            return Ok(Migration::Stayed(new_cell));
        }
        let mut bundles = self
            .bundles
            .try_borrow_mut()
            .map_err(|_| CommandError::Busy("bundle map"))?;

        if let Some(old) = from {
            grid.remove(id, old);
        }
        grid.insert_at(&self.object, new_cell);

        let me = self.object.downgrade();
        let bundle: CollisionBundle = grid
            .objects_in(new_cell)
            .into_iter()
            .filter(|other| other.id() != id)
            .map(|other| CheckCollisionCommand::new(me.clone(), other, Rc::clone(&self.handler)))
            .collect::<Result<_, _>>()?;
        let candidates = bundle.len();
        bundles.insert(id, Rc::new(bundle));
        self.last_cell.set(Some(new_cell));
        self.stale.set(false);

        debug!(
            object = %id,
            from = ?from,
            to = %new_cell,
            candidates,
            stale,
            "neighborhood rebuilt"
        );
        if from == Some(new_cell) {
            return Ok(Migration::Refreshed {
                cell: new_cell,
                candidates,
            });
        }
        Ok(Migration::Moved {
            from,
            to: new_cell,
            candidates,
        })
    }

    /// Removes the object from its last cell and evicts its bundle.
    ///
    /// Call this before dropping an object so neither the grid nor the bundle
    /// map keeps a dangling entry. The process returns to the uninitialised
    /// state; a later [`update`](Self::update) re-registers the object.
    pub fn detach(&self) -> Result<(), CommandError> {
        let id = self.object.id();
        let mut grid = self
            .grid
            .try_borrow_mut()
            .map_err(|_| CommandError::Busy("spatial grid"))?;
        let mut bundles = self
            .bundles
            .try_borrow_mut()
            .map_err(|_| CommandError::Busy("bundle map"))?;
        if let Some(cell) = self.last_cell.take() {
            grid.remove(id, cell);
        }
        self.stale.set(false);
        bundles.evict(id);
        debug!(object = %id, "neighborhood detached");
        Ok(())
    }
}

impl Command for NeighborhoodUpdate {
    fn execute(&self) -> Result<(), CommandError> {
        self.update().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::IgnoreCollisions;
    use crate::error::CapabilityError;
    use crate::object::MovingObject;
    use quadrant_geom::{GridLayout, Position};

    struct Dot(Position);

    impl MovingObject for Dot {
        fn position(&self) -> Result<Position, CapabilityError> {
            Ok(self.0)
        }
        fn set_position(&mut self, position: Position) -> Result<(), CapabilityError> {
            self.0 = position;
            Ok(())
        }
    }

    struct Fixture {
        grid: SharedGrid,
        bundles: SharedBundles,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                grid: Rc::new(RefCell::new(SpatialGrid::new(GridLayout::new(10.0).unwrap()))),
                bundles: BundleMap::shared(),
            }
        }

        fn track(&self, label: &str, x: f64, y: f64) -> NeighborhoodUpdate {
            let obj = ObjectHandle::new(label, Dot(Position::new(x, y)));
            NeighborhoodUpdate::new(
                obj,
                Rc::clone(&self.grid),
                Rc::clone(&self.bundles),
                Rc::new(IgnoreCollisions),
            )
        }

        fn bundle(&self, id: ObjectId) -> Rc<CollisionBundle> {
            self.bundles.borrow().get(id).unwrap()
        }
    }

    #[test]
    fn first_update_registers_and_builds_bundle() {
        let fx = Fixture::new();
        let n = fx.track("a", 1.0, 1.0);
        let m = n.update().unwrap();
        assert_eq!(
            m,
            Migration::Moved {
                from: None,
                to: CellKey::new(0, 0),
                candidates: 0
            }
        );
        assert!(fx.grid.borrow().contains(CellKey::new(0, 0), n.object().id()));
        assert!(fx.bundle(n.object().id()).is_empty());
        assert_eq!(n.last_cell(), Some(CellKey::new(0, 0)));
    }

    #[test]
    fn repeated_update_without_movement_keeps_bundle_identity() {
        let fx = Fixture::new();
        let n = fx.track("a", 1.0, 1.0);
        n.update().unwrap();
        let first = fx.bundle(n.object().id());
        assert_eq!(n.update().unwrap(), Migration::Stayed(CellKey::new(0, 0)));
        assert!(Rc::ptr_eq(&first, &fx.bundle(n.object().id())));
    }

    #[test]
    fn busy_grid_is_reported_and_state_kept() {
        let fx = Fixture::new();
        let n = fx.track("a", 1.0, 1.0);
        let guard = fx.grid.borrow_mut();
        assert!(matches!(n.update(), Err(CommandError::Busy("spatial grid"))));
        drop(guard);
        assert_eq!(n.last_cell(), None);
        assert!(fx.bundles.borrow().is_empty());
    }

    #[test]
    fn detach_clears_grid_and_bundle() {
        let fx = Fixture::new();
        let n = fx.track("a", 1.0, 1.0);
        n.update().unwrap();
        n.detach().unwrap();
        assert!(fx.grid.borrow().is_empty());
        assert!(fx.bundles.borrow().is_empty());
        assert_eq!(n.last_cell(), None);
        assert!(n.update().unwrap().is_move());
    }

    #[test]
    fn invalidated_update_rebuilds_in_place() {
        let fx = Fixture::new();
        let a = fx.track("a", 1.0, 1.0);
        let b = fx.track("b", 2.0, 2.0);
        a.update().unwrap();
        b.update().unwrap();
        let before = fx.bundle(b.object().id());
        assert_eq!(before.len(), 1);

        a.detach().unwrap();
        b.invalidate();
        assert!(b.is_stale());
        assert_eq!(
            b.update().unwrap(),
            Migration::Refreshed {
                cell: CellKey::new(0, 0),
                candidates: 0
            }
        );
        assert!(!b.is_stale());
        assert!(!Rc::ptr_eq(&before, &fx.bundle(b.object().id())));
        assert_eq!(fx.grid.borrow().len(), 1);
        assert_eq!(b.update().unwrap(), Migration::Stayed(CellKey::new(0, 0)));
    }

    #[test]
    fn invalidated_update_that_moved_leaves_old_cell() {
        let fx = Fixture::new();
        let a = fx.track("a", 1.0, 1.0);
        a.update().unwrap();
        a.invalidate();
        a.object().set_position(Position::new(25.0, 1.0)).unwrap();
        assert!(a.update().unwrap().is_move());
        let grid = fx.grid.borrow();
        assert!(!grid.is_occupied(CellKey::new(0, 0)));
        assert!(grid.contains(CellKey::new(2, 0), a.object().id()));
    }

    #[test]
    fn referencing_lists_bundles_that_name_the_target() {
        let fx = Fixture::new();
        let a = fx.track("a", 1.0, 1.0);
        let b = fx.track("b", 2.0, 2.0);
        let c = fx.track("c", 3.0, 3.0);
        for n in [&a, &b, &c] {
            n.update().unwrap();
        }
        let holders = fx.bundles.borrow().referencing(a.object().id());
        let mut expected = vec![b.object().id(), c.object().id()];
        expected.sort();
        assert_eq!(holders, expected);
        assert!(fx.bundles.borrow().referencing(c.object().id()).is_empty());
    }
}
