// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Moving-object capability and the handles the core passes around.

use crate::error::CapabilityError;
use crate::ident::{make_object_id, ObjectId};
use core::fmt;
use quadrant_geom::{Position, Velocity};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(0);

/// Capability every participant in the broad phase must expose.
///
/// Each method has a default that reports the capability as missing, so a
/// type only overrides what it actually supports and the core surfaces the
/// gap as a [`CapabilityError`] instead of silently skipping the object.
/// The core never writes velocity.
pub trait MovingObject {
    /// Current position.
    fn position(&self) -> Result<Position, CapabilityError> {
        Err(CapabilityError::ReadPosition)
    }

    /// Replaces the current position.
    fn set_position(&mut self, position: Position) -> Result<(), CapabilityError> {
        let _ = position;
        Err(CapabilityError::WritePosition)
    }

    /// Current velocity.
    fn velocity(&self) -> Result<Velocity, CapabilityError> {
        Err(CapabilityError::ReadVelocity)
    }
}

/// Owning, clonable handle to a moving object together with its identity.
///
/// Every construction mints a new [`ObjectId`] from the label and a
/// process-wide serial, so identity belongs to the handle, not to the label:
/// two objects built with the same label are still two objects. Clones share
/// the id. Equality, ordering and hashing look only at the id.
#[derive(Clone)]
pub struct ObjectHandle {
    id: ObjectId,
    label: Rc<str>,
    inner: Rc<RefCell<dyn MovingObject>>,
}

impl ObjectHandle {
    /// Wraps a freshly built object under a display `label`.
    pub fn new<T: MovingObject + 'static>(label: &str, object: T) -> Self {
        Self::from_shared(label, Rc::new(RefCell::new(object)))
    }

    /// Wraps an object the caller already shares (e.g. to keep a typed `Rc`).
    ///
    /// Each call mints a new identity; clone the returned handle rather than
    /// wrapping the same `Rc` twice.
    pub fn from_shared(label: &str, inner: Rc<RefCell<dyn MovingObject>>) -> Self {
        let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        Self {
            id: make_object_id(label, serial),
            label: Rc::from(label),
            inner,
        }
    }

    /// Identity of the wrapped object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Label given at construction. Not unique; for logs and tables only.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Borrows the object immutably, reporting re-entrant access as `Busy`.
    pub fn borrow(&self) -> Result<Ref<'_, dyn MovingObject + 'static>, CapabilityError> {
        self.inner
            .try_borrow()
            .map_err(|_| CapabilityError::Busy(self.id))
    }

    /// Borrows the object mutably, reporting re-entrant access as `Busy`.
    pub fn borrow_mut(&self) -> Result<RefMut<'_, dyn MovingObject + 'static>, CapabilityError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| CapabilityError::Busy(self.id))
    }

    /// Current position of the object.
    pub fn position(&self) -> Result<Position, CapabilityError> {
        self.borrow()?.position()
    }

    /// Current velocity of the object.
    pub fn velocity(&self) -> Result<Velocity, CapabilityError> {
        self.borrow()?.velocity()
    }

    /// Writes a new position into the object.
    pub fn set_position(&self, position: Position) -> Result<(), CapabilityError> {
        self.borrow_mut()?.set_position(position)
    }

    /// Non-owning counterpart of this handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakObject {
        WeakObject {
            id: self.id,
            label: Rc::clone(&self.label),
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectHandle {}

impl PartialOrd for ObjectHandle {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectHandle {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl core::hash::Hash for ObjectHandle {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("label", &self.label)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Non-owning reference to a moving object.
///
/// This is what the grid buckets and collision checks hold: they never keep
/// an object alive. Dropping the last [`ObjectHandle`] without detaching the
/// object leaves dangling entries that surface as
/// [`CommandError::Dangling`](crate::CommandError::Dangling) on use.
#[derive(Clone)]
pub struct WeakObject {
    id: ObjectId,
    label: Rc<str>,
    inner: Weak<RefCell<dyn MovingObject>>,
}

impl WeakObject {
    /// Identity of the referenced object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Recovers an owning handle if the object is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ObjectHandle> {
        self.inner.upgrade().map(|inner| ObjectHandle {
            id: self.id,
            label: Rc::clone(&self.label),
            inner,
        })
    }

    /// Returns `true` once the object has been dropped.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl fmt::Debug for WeakObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakObject").field(&self.id).finish()
    }
}
