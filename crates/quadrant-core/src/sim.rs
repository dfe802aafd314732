// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tick driver.
//!
//! Runs the canonical tick order over every spawned object: move all, update
//! all neighborhoods, execute all candidate bundles. Objects are visited in
//! ascending id order so a tick is reproducible.

use crate::cmd::{Command, MoveCommand};
use crate::collision::CollisionHandler;
use crate::error::CommandError;
use crate::grid::SpatialGrid;
use crate::ident::ObjectId;
use crate::neighborhood::{BundleMap, Migration, NeighborhoodUpdate, SharedBundles, SharedGrid};
use crate::object::ObjectHandle;
use quadrant_geom::GridLayout;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, instrument};

/// What one [`Simulation::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// Objects moved this tick.
    pub moved: usize,
    /// Objects that changed cell (or joined the grid).
    pub migrations: usize,
    /// Objects whose bundle was rebuilt in place after an invalidation.
    pub refreshes: usize,
    /// Candidate checks executed across all bundles.
    pub checks: usize,
}

struct Tracked {
    mover: MoveCommand,
    neighborhood: NeighborhoodUpdate,
}

/// Owns the shared broad-phase state and one move/update pair per object.
pub struct Simulation {
    grid: SharedGrid,
    bundles: SharedBundles,
    handler: Rc<dyn CollisionHandler>,
    tracked: BTreeMap<ObjectId, Tracked>,
    tick: u64,
}

impl Simulation {
    /// Creates an empty simulation over a fresh grid.
    pub fn new(layout: GridLayout, handler: Rc<dyn CollisionHandler>) -> Self {
        Self {
            grid: Rc::new(RefCell::new(SpatialGrid::new(layout))),
            bundles: BundleMap::shared(),
            handler,
            tracked: BTreeMap::new(),
            tick: 0,
        }
    }

    /// Starts tracking `object`. Returns `false` if its id is already tracked.
    ///
    /// The object joins the grid on the next [`step`](Self::step).
    pub fn spawn(&mut self, object: ObjectHandle) -> bool {
        let id = object.id();
        if self.tracked.contains_key(&id) {
            return false;
        }
        let neighborhood = NeighborhoodUpdate::new(
            object.clone(),
            Rc::clone(&self.grid),
            Rc::clone(&self.bundles),
            Rc::clone(&self.handler),
        );
        self.tracked.insert(
            id,
            Tracked {
                mover: MoveCommand::new(object),
                neighborhood,
            },
        );
        true
    }

    /// Stops tracking `id`, removing it from the grid and the bundle map.
    ///
    /// Every other object whose bundle still names `id` is invalidated and
    /// rebuilds on the next [`step`](Self::step), so dropping the returned
    /// handle never leaves a dangling check behind.
    pub fn despawn(&mut self, id: ObjectId) -> Result<Option<ObjectHandle>, CommandError> {
        let Some(tracked) = self.tracked.get(&id) else {
            return Ok(None);
        };
        tracked.neighborhood.detach()?;
        let holders = self
            .bundles
            .try_borrow()
            .map_err(|_| CommandError::Busy("bundle map"))?
            .referencing(id);
        for holder in &holders {
            if let Some(other) = self.tracked.get(holder) {
                other.neighborhood.invalidate();
            }
        }
        debug!(object = %id, invalidated = holders.len(), "despawned");
        Ok(self.tracked.remove(&id).map(|t| t.mover.object().clone()))
    }

    /// Runs one tick.
    ///
    /// The first failure aborts the rest of the tick and is returned; objects
    /// already processed keep their new state.
    #[instrument(level = "debug", skip(self), fields(tick = self.tick + 1))]
    pub fn step(&mut self) -> Result<TickReport, CommandError> {
        for tracked in self.tracked.values() {
            tracked.mover.execute()?;
        }
        let mut migrations = 0;
        let mut refreshes = 0;
        for tracked in self.tracked.values() {
            match tracked.neighborhood.update()? {
                Migration::Moved { .. } => migrations += 1,
                Migration::Refreshed { .. } => refreshes += 1,
                Migration::Stayed(_) => {}
            }
        }
        let bundles = self
            .bundles
            .try_borrow()
            .map_err(|_| CommandError::Busy("bundle map"))?
            .snapshot();
        let mut checks = 0;
        for bundle in &bundles {
            bundle.execute()?;
            checks += bundle.len();
        }
        self.tick += 1;
        let report = TickReport {
            tick: self.tick,
            moved: self.tracked.len(),
            migrations,
            refreshes,
            checks,
        };
        debug!(?report, "tick complete");
        Ok(report)
    }

    /// Runs `ticks` ticks, returning each report.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>, CommandError> {
        (0..ticks).map(|_| self.step()).collect()
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of tracked objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Returns `true` if no object is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Handle to a tracked object.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&ObjectHandle> {
        self.tracked.get(&id).map(|t| t.mover.object())
    }

    /// Shared grid.
    #[must_use]
    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Shared bundle map.
    #[must_use]
    pub fn bundles(&self) -> &SharedBundles {
        &self.bundles
    }
}
