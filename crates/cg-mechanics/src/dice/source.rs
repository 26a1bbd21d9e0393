//! Sources of die values.
//!
//! Production rolls read the operating system's secure entropy source.
//! Seeded and fixed sources exist so sessions can be replayed and tests
//! can assert exact outcomes.

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

use crate::error::{MechError, MechResult};

/// Produces uniformly distributed die values.
pub trait RandomSource {
    /// Return a value in `[1, sides]`.
    ///
    /// Fails with [`MechError::InvalidDice`] when `sides` is zero.
    fn roll_die(&mut self, sides: u32) -> MechResult<u32>;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        (**self).roll_die(sides)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        (**self).roll_die(sides)
    }
}

fn check_sides(sides: u32) -> MechResult<()> {
    if sides == 0 {
        return Err(MechError::InvalidDice("a die needs at least one side".to_string()));
    }
    Ok(())
}

/// Secure source backed by the operating system's entropy pool.
///
/// Holds no state. Entropy failures surface as
/// [`MechError::RandomGeneration`]; there is no fallback generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureRandom;

impl RandomSource for SecureRandom {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        check_sides(sides)?;
        // Values at or above the largest multiple of `sides` are rejected
        // so the modulo below stays unbiased.
        let zone = u32::MAX - (u32::MAX % sides);
        let mut os = OsRng;
        loop {
            let value = os
                .try_next_u32()
                .map_err(|e| MechError::RandomGeneration(e.to_string()))?;
            if value < zone {
                return Ok(value % sides + 1);
            }
        }
    }
}

/// Deterministic source for reproducible sessions.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source seeded from a `u64`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        check_sides(sides)?;
        Ok(self.rng.random_range(1..=sides))
    }
}

/// Replays a fixed list of values, cycling when it runs out.
///
/// Values are clamped into `[1, sides]` so a sequence written for one
/// die size never produces an impossible face on another.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<u32>,
    index: usize,
}

impl FixedSequence {
    /// Create a source that returns `values` in order.
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Create a source that always returns the same value.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedSequence {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        check_sides(sides)?;
        if self.values.is_empty() {
            return Err(MechError::RandomGeneration(
                "fixed sequence has no values".to_string(),
            ));
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        Ok(value.clamp(1, sides))
    }
}

/// The source selected by a [`RollerConfig`](crate::config::RollerConfig).
#[derive(Debug, Clone)]
pub enum EngineRng {
    /// Operating-system entropy.
    Secure(SecureRandom),
    /// Seeded pseudo-random generator.
    Seeded(SeededRandom),
}

impl EngineRng {
    /// Pick the secure source, or a seeded one when a seed is given.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(SeededRandom::new(seed)),
            None => Self::Secure(SecureRandom),
        }
    }
}

impl RandomSource for EngineRng {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        match self {
            Self::Secure(source) => source.roll_die(sides),
            Self::Seeded(source) => source.roll_die(sides),
        }
    }
}
