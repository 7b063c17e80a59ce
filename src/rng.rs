//! Injectable randomness for battle resolution.
//!
//! Every random draw the engine makes goes through [`BattleRng`], so a test
//! can seed a deterministic source and replay a battle exactly.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Trait for random number generation in battles.
pub trait BattleRng {
    /// Generate a random u32.
    fn next_u32(&mut self) -> u32;

    /// Uniform draw in `[0, 1)`.
    fn value(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Generate a random number in range `[0, max)`.
    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }
}

/// XorShift32 RNG - simple, fast, deterministic.
///
/// Suitable for game logic where cryptographic security is not needed. The
/// same seed always produces the same sequence.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Create a new RNG from a u64 seed.
    ///
    /// The seed is combined into a u32, ensuring state is never 0.
    pub fn seed_from_u64(seed: u64) -> Self {
        let state = ((seed as u32) ^ ((seed >> 32) as u32)).max(1);
        Self { state }
    }
}

impl BattleRng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

/// Adapter over `rand`'s standard RNG for drivers that want entropy-seeded
/// battles.
pub struct StdBattleRng {
    inner: StdRng,
}

impl StdBattleRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }
}

impl BattleRng for StdBattleRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}
