//! Random rolls for gameplay decisions.
//!
//! Block chances, loot drops and cast staggering all draw from a [`RollSource`].
//! Production code uses [`SeededRng`]; tests script the exact outcomes with
//! [`ScriptedRolls`] so every branch can be forced deterministically.

use std::collections::VecDeque;
use std::fmt;

/// Source of uniform rolls in `[0, 1)`.
pub trait RollSource: fmt::Debug {
    /// Next uniform value in `[0, 1)`.
    fn roll(&mut self) -> f32;

    /// Returns true with probability `p`.
    ///
    /// Certain outcomes (`p <= 0` or `p >= 1`) are decided without consuming a roll.
    fn chance(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.roll() < p
    }

    /// Uniform integer in `[low, high)`. Returns `low` for an empty range.
    fn range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = high - low;
        let offset = (self.roll() * span as f32) as u32;
        low + offset.min(span - 1)
    }
}

/// Seeded production RNG.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: fastrand::Rng,
}

impl SeededRng {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl RollSource for SeededRng {
    fn roll(&mut self) -> f32 {
        self.rng.f32()
    }

    fn range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.u32(low..high)
    }
}

/// Replays a fixed list of rolls, then repeats a fallback value.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    queue: VecDeque<f32>,
    fallback: f32,
    consumed: usize,
}

impl Default for ScriptedRolls {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ScriptedRolls {
    /// Value returned once the script runs dry. High enough that every
    /// chance below 1.0 fails.
    pub const DEFAULT_FALLBACK: f32 = 0.999;

    /// Creates a script from explicit rolls.
    #[must_use]
    pub fn new(rolls: Vec<f32>) -> Self {
        Self {
            queue: rolls.into(),
            fallback: Self::DEFAULT_FALLBACK,
            consumed: 0,
        }
    }

    /// A script whose every roll is `value`.
    #[must_use]
    pub fn always(value: f32) -> Self {
        Self::new(Vec::new()).with_fallback(value)
    }

    /// Builder: sets the value used after the script is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Appends more rolls to the end of the script.
    pub fn push(&mut self, roll: f32) {
        self.queue.push_back(roll);
    }

    /// Number of rolls handed out so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Rolls left before the fallback kicks in.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self) -> f32 {
        self.consumed += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.roll().to_bits(), b.roll().to_bits());
        }
    }

    #[test]
    fn test_seeded_rolls_in_unit_range() {
        let mut rng = SeededRng::new(7);
        for _ in 0..1000 {
            let r = rng.roll();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_seeded_range_bounds() {
        let mut rng = SeededRng::new(3);
        for _ in 0..500 {
            let v = rng.range(60, 120);
            assert!((60..120).contains(&v));
        }
        assert_eq!(rng.range(5, 5), 5);
    }

    #[test]
    fn test_scripted_rolls_replay_then_fallback() {
        let mut rolls = ScriptedRolls::new(vec![0.1, 0.9]);
        assert!(rolls.chance(0.5));
        assert!(!rolls.chance(0.5));
        assert_eq!(rolls.roll(), ScriptedRolls::DEFAULT_FALLBACK);
        assert_eq!(rolls.consumed(), 3);
    }

    #[test]
    fn test_scripted_range() {
        let mut rolls = ScriptedRolls::new(vec![0.0, 0.5, 0.99999]);
        assert_eq!(rolls.range(60, 120), 60);
        assert_eq!(rolls.range(60, 120), 90);
        assert_eq!(rolls.range(60, 120), 119);
    }

    #[test]
    fn test_certain_chances_skip_the_roll() {
        let mut rolls = ScriptedRolls::new(vec![0.5]);
        assert!(!rolls.chance(0.0));
        assert!(rolls.chance(1.0));
        assert_eq!(rolls.consumed(), 0);
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn test_always() {
        let mut rolls = ScriptedRolls::always(0.0);
        assert!(rolls.chance(0.01));
        assert_eq!(rolls.remaining(), 0);
    }
}
