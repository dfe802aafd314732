// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Moving objects for tests.
//!
//! [`Body`] supports every capability. The others each lack exactly one so
//! tests can check that the core surfaces the gap.

use quadrant_core::{CapabilityError, MovingObject, ObjectHandle, Position, Velocity};
use std::cell::RefCell;
use std::rc::Rc;

/// Fully capable moving object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    /// Current position.
    pub position: Position,
    /// Current velocity.
    pub velocity: Velocity,
}

impl Body {
    /// Body at `(x, y)` moving by `(dx, dy)` per step.
    pub fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self {
            position: Position::new(x, y),
            velocity: Velocity::new(dx, dy),
        }
    }

    /// Stationary body at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// Wraps the body in a handle labelled `label`, keeping a typed `Rc` for inspection.
    pub fn spawn(self, label: &str) -> (ObjectHandle, Rc<RefCell<Self>>) {
        let typed = Rc::new(RefCell::new(self));
        let shared: Rc<RefCell<dyn MovingObject>> = typed.clone();
        (ObjectHandle::from_shared(label, shared), typed)
    }

    /// Wraps the body in a handle labelled `label`.
    pub fn handle(self, label: &str) -> ObjectHandle {
        ObjectHandle::new(label, self)
    }
}

impl MovingObject for Body {
    fn position(&self) -> Result<Position, CapabilityError> {
        Ok(self.position)
    }

    fn set_position(&mut self, position: Position) -> Result<(), CapabilityError> {
        self.position = position;
        Ok(())
    }

    fn velocity(&self) -> Result<Velocity, CapabilityError> {
        Ok(self.velocity)
    }
}

/// Object with a velocity but no readable position.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosition {
    /// Velocity reported.
    pub velocity: Velocity,
}

impl MovingObject for NoPosition {
    fn velocity(&self) -> Result<Velocity, CapabilityError> {
        Ok(self.velocity)
    }
}

/// Object with a read/write position but no velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVelocity {
    /// Current position.
    pub position: Position,
}

impl MovingObject for NoVelocity {
    fn position(&self) -> Result<Position, CapabilityError> {
        Ok(self.position)
    }

    fn set_position(&mut self, position: Position) -> Result<(), CapabilityError> {
        self.position = position;
        Ok(())
    }
}

/// Object whose position can be read but not written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyPosition {
    /// Fixed position.
    pub position: Position,
    /// Velocity reported.
    pub velocity: Velocity,
}

impl MovingObject for ReadOnlyPosition {
    fn position(&self) -> Result<Position, CapabilityError> {
        Ok(self.position)
    }

    fn velocity(&self) -> Result<Velocity, CapabilityError> {
        Ok(self.velocity)
    }
}
