// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Quadrant crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`bodies`] - Moving objects, complete and capability-deficient
//! - [`handlers`] - Recording / failing collision handlers
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`world`] - Grid + bundle map fixture wiring neighborhood updates

pub mod bodies;
pub mod config;
pub mod handlers;
pub mod world;

pub use bodies::{Body, NoPosition, NoVelocity, ReadOnlyPosition};
pub use config::InMemoryConfigStore;
pub use handlers::RecordingHandler;
pub use world::WorldFixture;
