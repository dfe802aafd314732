// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Commands: small executable operations with a single `execute` action.
//!
//! The set is closed and shallow: moving an object, checking one candidate
//! pair, and replaying a fixed sequence of other commands. Commands take
//! `&self` so bundles shared behind `Rc` can be executed every tick.

use crate::collision::CollisionHandler;
use crate::error::CommandError;
use crate::ident::ObjectId;
use crate::object::{ObjectHandle, WeakObject};
use core::fmt;
use std::rc::Rc;

/// An executable operation.
pub trait Command {
    /// Runs the operation to completion.
    fn execute(&self) -> Result<(), CommandError>;
}

impl<C: Command + ?Sized> Command for Box<C> {
    fn execute(&self) -> Result<(), CommandError> {
        (**self).execute()
    }
}

impl<C: Command + ?Sized> Command for Rc<C> {
    fn execute(&self) -> Result<(), CommandError> {
        (**self).execute()
    }
}

/// Adapts a closure into a [`Command`].
pub struct FnCommand<F>(pub F);

impl<F> Command for FnCommand<F>
where
    F: Fn() -> Result<(), CommandError>,
{
    fn execute(&self) -> Result<(), CommandError> {
        (self.0)()
    }
}

/// Advances one object by its own velocity.
#[derive(Debug, Clone)]
pub struct MoveCommand {
    object: ObjectHandle,
}

impl MoveCommand {
    /// Binds the command to `object`.
    pub fn new(object: ObjectHandle) -> Self {
        Self { object }
    }

    /// The object this command moves.
    pub fn object(&self) -> &ObjectHandle {
        &self.object
    }
}

impl Command for MoveCommand {
    /// Reads position and velocity, then writes `position.move_to(velocity)`.
    ///
    /// Both reads happen before the write, so a failing read leaves the
    /// object untouched.
    fn execute(&self) -> Result<(), CommandError> {
        let position = self.object.position()?;
        let velocity = self.object.velocity()?;
        self.object.set_position(position.move_to(velocity))?;
        Ok(())
    }
}

/// Delegates one ordered candidate pair to the narrow-phase handler.
#[derive(Clone)]
pub struct CheckCollisionCommand {
    first: WeakObject,
    second: WeakObject,
    handler: Rc<dyn CollisionHandler>,
}

impl CheckCollisionCommand {
    /// Builds a check for `(first, second)`.
    ///
    /// Fails with [`CommandError::SelfPair`] if both refer to the same object.
    pub fn new(
        first: WeakObject,
        second: WeakObject,
        handler: Rc<dyn CollisionHandler>,
    ) -> Result<Self, CommandError> {
        if first.id() == second.id() {
            return Err(CommandError::SelfPair(first.id()));
        }
        Ok(Self {
            first,
            second,
            handler,
        })
    }

    /// Ids of the pair, in invocation order.
    #[must_use]
    pub fn pair(&self) -> (ObjectId, ObjectId) {
        (self.first.id(), self.second.id())
    }
}

impl Command for CheckCollisionCommand {
    fn execute(&self) -> Result<(), CommandError> {
        let first = self
            .first
            .upgrade()
            .ok_or(CommandError::Dangling(self.first.id()))?;
        let second = self
            .second
            .upgrade()
            .ok_or(CommandError::Dangling(self.second.id()))?;
        self.handler.check(&first, &second)?;
        Ok(())
    }
}

impl fmt::Debug for CheckCollisionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckCollisionCommand")
            .field("first", &self.first.id())
            .field("second", &self.second.id())
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable sequence of commands replayed as one.
///
/// Execution stops at the first failing command and reports it as
/// [`CommandError::Bundle`]; later commands do not run.
pub struct MacroCommand<C = Box<dyn Command>> {
    commands: Vec<C>,
}

/// The per-object bundle of candidate checks built by the neighborhood update.
pub type CollisionBundle = MacroCommand<CheckCollisionCommand>;

impl<C> MacroCommand<C> {
    /// Freezes `commands` into a bundle.
    pub fn new(commands: Vec<C>) -> Self {
        Self { commands }
    }

    /// Number of contained commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if the bundle holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Read-only view of the contained commands.
    #[must_use]
    pub fn commands(&self) -> &[C] {
        &self.commands
    }
}

impl<C> Default for MacroCommand<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<C> FromIterator<C> for MacroCommand<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl CollisionBundle {
    /// Candidate pairs in execution order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(ObjectId, ObjectId)> {
        self.commands.iter().map(CheckCollisionCommand::pair).collect()
    }
}

impl<C: Command> Command for MacroCommand<C> {
    fn execute(&self) -> Result<(), CommandError> {
        for (index, command) in self.commands.iter().enumerate() {
            command.execute().map_err(|source| CommandError::Bundle {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for MacroCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroCommand")
            .field("len", &self.commands.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CapabilityError, CollisionError};
    use crate::object::MovingObject;
    use quadrant_geom::{Position, Velocity};
    use std::cell::{Cell, RefCell};

    struct Body {
        position: Position,
        velocity: Velocity,
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

    struct Frozen {
        position: Position,
    }

    impl MovingObject for Frozen {
        fn position(&self) -> Result<Position, CapabilityError> {
            Ok(self.position)
        }
        fn velocity(&self) -> Result<Velocity, CapabilityError> {
            Ok(Velocity::new(1.0, 1.0))
        }
    }

    fn body(label: &str, x: f64, y: f64, dx: f64, dy: f64) -> ObjectHandle {
        ObjectHandle::new(
            label,
            Body {
                position: Position::new(x, y),
                velocity: Velocity::new(dx, dy),
            },
        )
    }

    #[test]
    fn move_from_12_5_with_velocity_minus_7_3_lands_on_5_8() {
        let o = body("ship", 12.0, 5.0, -7.0, 3.0);
        MoveCommand::new(o.clone()).execute().unwrap();
        assert_eq!(o.position().unwrap(), Position::new(5.0, 8.0));
    }

    #[test]
    fn move_without_write_capability_leaves_position() {
        let o = ObjectHandle::new(
            "frozen",
            Frozen {
                position: Position::new(3.0, 4.0),
            },
        );
        let err = MoveCommand::new(o.clone()).execute().unwrap_err();
        assert!(matches!(
            err,
            CommandError::Capability(CapabilityError::WritePosition)
        ));
        assert_eq!(o.position().unwrap(), Position::new(3.0, 4.0));
    }

    #[test]
    fn macro_runs_commands_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let commands: Vec<Box<dyn Command>> = (0..3)
            .map(|i| {
                let log = Rc::clone(&log);
                Box::new(FnCommand(move || -> Result<(), CommandError> {
                    log.borrow_mut().push(i);
                    Ok(())
                })) as Box<dyn Command>
            })
            .collect();
        MacroCommand::new(commands).execute().unwrap();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn empty_macro_executes() {
        let m: MacroCommand = MacroCommand::default();
        assert!(m.is_empty());
        m.execute().unwrap();
    }

    #[test]
    fn macro_stops_at_first_failure() {
        let ran = Rc::new(Cell::new(0));
        let after = Rc::clone(&ran);
        let commands: Vec<Box<dyn Command>> = vec![
            Box::new(FnCommand(|| -> Result<(), CommandError> { Ok(()) })),
            Box::new(FnCommand(|| -> Result<(), CommandError> {
                Err(CommandError::Other("boom".into()))
            })),
            Box::new(FnCommand(move || -> Result<(), CommandError> {
                after.set(after.get() + 1);
                Ok(())
            })),
        ];
        let err = MacroCommand::new(commands).execute().unwrap_err();
        assert!(matches!(err, CommandError::Bundle { index: 1, .. }));
        assert!(matches!(err.root(), CommandError::Other(msg) if msg == "boom"));
        assert_eq!(ran.get(), 0);
    }

    #[test]
    fn check_rejects_self_pair() {
        let o = body("solo", 0.0, 0.0, 0.0, 0.0);
        let handler: Rc<dyn CollisionHandler> = Rc::new(crate::IgnoreCollisions);
        let err = CheckCollisionCommand::new(o.downgrade(), o.downgrade(), handler).unwrap_err();
        assert!(matches!(err, CommandError::SelfPair(id) if id == o.id()));
    }

    #[test]
    fn check_passes_pair_in_order_and_surfaces_handler_errors() {
        let a = body("a", 0.0, 0.0, 0.0, 0.0);
        let b = body("b", 0.0, 0.0, 0.0, 0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handler: Rc<dyn CollisionHandler> = Rc::new(
            move |x: &ObjectHandle, y: &ObjectHandle| -> Result<(), CollisionError> {
                sink.borrow_mut().push((x.id(), y.id()));
                Err(CollisionError::new("overlap"))
            },
        );
        let check = CheckCollisionCommand::new(a.downgrade(), b.downgrade(), handler).unwrap();
        let err = check.execute().unwrap_err();
        assert!(matches!(err, CommandError::Collision(_)));
        assert_eq!(*seen.borrow(), vec![(a.id(), b.id())]);
    }

    #[test]
    fn check_against_dropped_object_is_dangling() {
        let a = body("a", 0.0, 0.0, 0.0, 0.0);
        let b = body("b", 0.0, 0.0, 0.0, 0.0);
        let b_id = b.id();
        let check = CheckCollisionCommand::new(
            a.downgrade(),
            b.downgrade(),
            Rc::new(crate::IgnoreCollisions),
        )
        .unwrap();
        drop(b);
        assert!(matches!(check.execute(), Err(CommandError::Dangling(id)) if id == b_id));
    }
}
