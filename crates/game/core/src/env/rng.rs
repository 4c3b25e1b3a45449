//! RNG oracle for combat rolls.
//!
//! Combat draws every random number through [`RngOracle`]: uniform integers in
//! a half-open range. Production wires a seeded [`PcgRng`] (or an OS-seeded
//! generator in the runtime); tests script exact sequences with [`ScriptedRng`].

use std::collections::VecDeque;

/// Source of uniform integer draws.
pub trait RngOracle: Send + Sync {
    /// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
    fn range(&mut self, min: i32, max: i32) -> i32;

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Percentage checks succeed when the roll is strictly below the score, so
    /// a score of 100 passes on every roll but the last face.
    fn roll_d100(&mut self) -> u32 {
        self.range(1, 101) as u32
    }

    /// Roll a die with `sides` faces (1-sides inclusive).
    fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.min(i32::MAX as u32 - 1) as i32;
        self.range(1, sides + 1).max(1) as u32
    }

    /// True with `percent` chance out of 100.
    fn chance(&mut self, percent: u32) -> bool {
        (self.range(0, 100) as u32) < percent
    }

    /// Uniform index into a collection of `len` elements.
    fn pick(&mut self, len: usize) -> usize {
        let len = len.min(i32::MAX as usize) as i32;
        self.range(0, len).max(0) as usize
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed ^ Self::INCREMENT),
        }
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

impl RngOracle for PcgRng {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min)) as u64;
        let offset = u64::from(self.next_u32()) % span;
        (i64::from(min) + offset as i64) as i32
    }
}

/// Replays a fixed sequence of draws.
///
/// Each draw is clamped into the requested range. Once the script runs out the
/// fallback value is used (clamped the same way), or `min` if there is none.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    script: VecDeque<i32>,
    fallback: Option<i32>,
    drawn: usize,
}

impl ScriptedRng {
    pub fn new(script: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: None,
            drawn: 0,
        }
    }

    /// Answers every draw with `value`.
    pub fn constant(value: i32) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: Some(value),
            drawn: 0,
        }
    }

    #[must_use]
    pub fn then_constant(mut self, value: i32) -> Self {
        self.fallback = Some(value);
        self
    }

    /// Number of draws answered so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RngOracle for ScriptedRng {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        self.drawn += 1;
        let value = self.script.pop_front().or(self.fallback).unwrap_or(min);
        if max <= min {
            min
        } else {
            value.clamp(min, max - 1)
        }
    }
}
