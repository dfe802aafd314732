// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Move command arithmetic and capability failures.

use quadrant_core::{CapabilityError, Command, CommandError, MoveCommand, ObjectHandle, Position, Velocity};
use quadrant_dry_tests::{Body, NoPosition, NoVelocity, ReadOnlyPosition};

#[test]
fn move_from_12_5_with_velocity_minus_7_3() {
    let (handle, body) = Body::new(12.0, 5.0, -7.0, 3.0).spawn("ship");
    assert_eq!(body.borrow().position, Position::new(12.0, 5.0));
    MoveCommand::new(handle).execute().expect("move");
    assert_eq!(body.borrow().position, Position::new(5.0, 8.0));
    assert_eq!(body.borrow().velocity, Velocity::new(-7.0, 3.0), "velocity is read-only");
}

#[test]
fn move_without_position_fails() {
    let h = ObjectHandle::new("x", NoPosition::default());
    let err = MoveCommand::new(h).execute().expect_err("must fail");
    assert!(matches!(err, CommandError::Capability(CapabilityError::ReadPosition)));
}

#[test]
fn move_without_velocity_fails_and_keeps_position() {
    let h = ObjectHandle::new(
        "x",
        NoVelocity {
            position: Position::new(1.0, 1.0),
        },
    );
    let err = MoveCommand::new(h.clone()).execute().expect_err("must fail");
    assert!(matches!(err, CommandError::Capability(CapabilityError::ReadVelocity)));
    assert_eq!(h.position(), Ok(Position::new(1.0, 1.0)));
}

#[test]
fn move_without_position_setter_fails() {
    let h = ObjectHandle::new(
        "x",
        ReadOnlyPosition {
            position: Position::new(1.0, 1.0),
            velocity: Velocity::new(1.0, 0.0),
        },
    );
    let err = MoveCommand::new(h.clone()).execute().expect_err("must fail");
    assert!(matches!(err, CommandError::Capability(CapabilityError::WritePosition)));
    assert_eq!(h.position(), Ok(Position::new(1.0, 1.0)));
}

#[test]
fn repeated_moves_accumulate() {
    let (handle, body) = Body::new(0.0, 0.0, 1.5, -2.0).spawn("drift");
    let mv = MoveCommand::new(handle);
    for _ in 0..4 {
        mv.execute().expect("move");
    }
    assert_eq!(body.borrow().position, Position::new(6.0, -8.0));
}
