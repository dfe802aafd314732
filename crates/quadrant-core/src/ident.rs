// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier and hashing utilities.
use blake3::Hasher;
use core::fmt;

/// Canonical 256-bit hash used to address objects.
pub type Hash = [u8; 32];

/// Strongly typed identity of a moving object.
///
/// The grid and the bundle map deduplicate by this id, never by value, and
/// candidate lists are ordered by it so that bundle contents are reproducible
/// regardless of container iteration order.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ObjectId(pub Hash);

impl ObjectId {
    /// Returns the canonical byte representation of this id.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// First eight bytes, hex encoded. Used in logs and tables.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// Produces a domain-separated object identifier (prefix `b"object:"`) using BLAKE3.
///
/// `serial` distinguishes objects that share a label; [`ObjectHandle::new`]
/// hands out a fresh one per allocation, so two handles built separately never
/// collide even when their labels match.
///
/// [`ObjectHandle::new`]: crate::ObjectHandle::new
pub fn make_object_id(label: &str, serial: u64) -> ObjectId {
    let mut hasher = Hasher::new();
    hasher.update(b"object:");
    hasher.update(&(label.len() as u64).to_le_bytes());
    hasher.update(label.as_bytes());
    hasher.update(&serial.to_le_bytes());
    ObjectId(hasher.finalize().into())
}
