// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for the broad phase.
//!
//! None of these are transient: they signal a malformed participant or a
//! misbehaving collaborator, so nothing in the core retries.

use crate::ident::ObjectId;
use thiserror::Error;

/// A participant cannot perform an operation the core requires of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The object does not expose its position.
    #[error("object cannot report its position")]
    ReadPosition,
    /// The object does not expose its velocity.
    #[error("object cannot report its velocity")]
    ReadVelocity,
    /// The object does not accept a new position.
    #[error("object cannot accept a new position")]
    WritePosition,
    /// The object is already borrowed (re-entrant access from a handler).
    #[error("object {0} is already borrowed")]
    Busy(ObjectId),
}

/// Failure reported by the external narrow-phase handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("collision handler failed: {0}")]
pub struct CollisionError(pub String);

impl CollisionError {
    /// Builds an error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error surfaced by executing any [`Command`](crate::Command).
#[derive(Debug, Error)]
pub enum CommandError {
    /// A participant lacks a required capability.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    /// The narrow-phase handler rejected a pair.
    #[error(transparent)]
    Collision(#[from] CollisionError),
    /// A weak handle outlived the object it pointed to.
    #[error("object {0} was dropped while still referenced")]
    Dangling(ObjectId),
    /// A collision check was requested between an object and itself.
    #[error("object {0} cannot be paired with itself")]
    SelfPair(ObjectId),
    /// Shared grid or bundle map was already borrowed by the caller.
    #[error("{0} is already borrowed")]
    Busy(&'static str),
    /// An operation inside a bundle failed; the rest of the bundle was skipped.
    #[error("bundle operation #{index} failed: {source}")]
    Bundle {
        /// Position of the failing operation within the bundle.
        index: usize,
        /// The underlying failure.
        #[source]
        source: Box<CommandError>,
    },
    /// Failure from an ad-hoc command.
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    /// Unwraps nested bundle errors down to the operation that actually failed.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Bundle { source, .. } => source.root(),
            other => other,
        }
    }
}
