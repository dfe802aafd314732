// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! quadrant-core: uniform-grid broad phase with lazily rebuilt candidate bundles.
//!
//! Objects are bucketed into square cells of a [`SpatialGrid`]. Each object
//! gets a [`NeighborhoodUpdate`] that, every tick, checks whether the object
//! changed cell and only then migrates it and rebuilds its bundle of
//! [`CheckCollisionCommand`]s against the other occupants of its new cell.
//! The [`Simulation`] driver runs the canonical tick order: move everything,
//! update every neighborhood, execute every bundle.
//!
//! Everything here is single-threaded; shared state lives behind `Rc<RefCell<_>>`.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod cmd;
mod collision;
mod error;
mod grid;
mod ident;
mod neighborhood;
mod object;
mod sim;

/// Command abstraction and the concrete move / collision-check / macro commands.
pub use cmd::{CheckCollisionCommand, CollisionBundle, Command, FnCommand, MacroCommand, MoveCommand};
/// External narrow-phase boundary.
pub use collision::{CollisionHandler, IgnoreCollisions};
/// Error taxonomy.
pub use error::{CapabilityError, CollisionError, CommandError};
/// Cell membership bookkeeping.
pub use grid::SpatialGrid;
/// Stable object identifiers.
pub use ident::{make_object_id, Hash, ObjectId};
/// Per-object neighborhood tracking and the shared bundle map.
pub use neighborhood::{BundleMap, Migration, NeighborhoodUpdate, SharedBundles, SharedGrid};
/// Moving-object capability and identity-carrying handles.
pub use object::{MovingObject, ObjectHandle, WeakObject};
/// Tick driver.
pub use sim::{Simulation, TickReport};

pub use quadrant_geom::{CellKey, GridLayout, LayoutError, Position, Velocity, DEFAULT_CELL_SIZE};
