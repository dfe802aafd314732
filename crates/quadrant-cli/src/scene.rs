// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Seeded scene generation and the CLI's concrete object and handler types.

use quadrant_app_core::prefs::SimPrefs;
use quadrant_core::{
    CapabilityError, CollisionError, CollisionHandler, MovingObject, ObjectHandle,
    Position, Velocity,
};
use std::cell::Cell;

/// `xoroshiro128+` generator seeded through SplitMix64.
///
/// Not cryptographically secure; only used to scatter bodies reproducibly.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: [u64; 2],
}

impl Prng {
    /// Expands a single 64-bit seed into generator state.
    pub fn from_seed_u64(seed: u64) -> Self {
        fn splitmix64(state: &mut u64) -> u64 {
            *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = *state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        }

        let mut sm_state = seed;
        let mut state = [splitmix64(&mut sm_state), splitmix64(&mut sm_state)];
        if state == [0, 0] {
            state[0] = 0x9e37_79b9_7f4a_7c15;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.state[1] = s1.rotate_left(36);

        result
    }

    /// Next float in `[0, 1)` built from the high 53 bits.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Next float in `[-half, half)`.
    pub fn symmetric(&mut self, half: f64) -> f64 {
        self.next_f64().mul_add(2.0 * half, -half)
    }
}

/// Point body used by the CLI scenes.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    position: Position,
    velocity: Velocity,
}

impl MovingObject for Particle {
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

/// Builds `prefs.objects` particles scattered over `[-extent, extent)²`.
pub fn build(prefs: &SimPrefs) -> Vec<ObjectHandle> {
    let mut rng = Prng::from_seed_u64(prefs.seed);
    (0..prefs.objects)
        .map(|i| {
            let position = Position::new(rng.symmetric(prefs.extent), rng.symmetric(prefs.extent));
            let velocity = Velocity::new(rng.symmetric(prefs.max_speed), rng.symmetric(prefs.max_speed));
            ObjectHandle::new(
                &format!("particle-{i}"),
                Particle { position, velocity },
            )
        })
        .collect()
}

/// Narrow-phase stand-in: counts candidate pairs closer than `radius`.
#[derive(Debug)]
pub struct ProximityCounter {
    radius: f64,
    contacts: Cell<u64>,
}

impl ProximityCounter {
    /// Counter with the given contact radius.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            contacts: Cell::new(0),
        }
    }

    /// Contacts seen so far.
    pub fn contacts(&self) -> u64 {
        self.contacts.get()
    }
}

impl CollisionHandler for ProximityCounter {
    fn check(&self, first: &ObjectHandle, second: &ObjectHandle) -> Result<(), CollisionError> {
        let a = first.position().map_err(|e| CollisionError::new(e.to_string()))?;
        let b = second.position().map_err(|e| CollisionError::new(e.to_string()))?;
        if (a.x() - b.x()).hypot(a.y() - b.y()) <= self.radius {
            self.contacts.set(self.contacts.get() + 1);
        }
        Ok(())
    }
}
