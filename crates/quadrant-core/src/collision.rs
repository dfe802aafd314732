// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Narrow-phase boundary.
//!
//! The core only proposes candidate pairs; what happens when two candidates
//! are compared belongs to the caller.

use crate::error::CollisionError;
use crate::object::ObjectHandle;

/// External narrow-phase check invoked once per candidate pair per tick.
pub trait CollisionHandler {
    /// Compares `first` against `second`, in that order.
    fn check(&self, first: &ObjectHandle, second: &ObjectHandle) -> Result<(), CollisionError>;
}

impl<F> CollisionHandler for F
where
    F: Fn(&ObjectHandle, &ObjectHandle) -> Result<(), CollisionError>,
{
    fn check(&self, first: &ObjectHandle, second: &ObjectHandle) -> Result<(), CollisionError> {
        self(first, second)
    }
}

/// Handler that accepts every pair and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreCollisions;

impl CollisionHandler for IgnoreCollisions {
    fn check(&self, _first: &ObjectHandle, _second: &ObjectHandle) -> Result<(), CollisionError> {
        Ok(())
    }
}
