// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Collision handler doubles.

use quadrant_core::{CollisionError, CollisionHandler, ObjectHandle, ObjectId};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Records every pair it is asked to check, optionally failing on some.
///
/// Clones share the same log, so a test can keep one clone while handing
/// another to the core as `Rc<dyn CollisionHandler>`.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<(ObjectId, ObjectId)>,
    fail_on: BTreeSet<ObjectId>,
}

impl RecordingHandler {
    /// Creates a handler that accepts every pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every check whose first object is `id` fail.
    pub fn fail_on(&self, id: ObjectId) {
        self.inner.borrow_mut().fail_on.insert(id);
    }

    /// Pairs checked so far, in call order.
    pub fn calls(&self) -> Vec<(ObjectId, ObjectId)> {
        self.inner.borrow().calls.clone()
    }

    /// Number of checks so far.
    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    /// Forgets recorded calls.
    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Shares this handler as the trait object the core expects.
    pub fn shared(&self) -> Rc<dyn CollisionHandler> {
        Rc::new(self.clone())
    }
}

impl CollisionHandler for RecordingHandler {
    fn check(&self, first: &ObjectHandle, second: &ObjectHandle) -> Result<(), CollisionError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push((first.id(), second.id()));
        if inner.fail_on.contains(&first.id()) {
            return Err(CollisionError::new(format!("refused {}", first.id())));
        }
        Ok(())
    }
}
