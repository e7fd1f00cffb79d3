//! Randomness source and dice rolling.
//!
//! Every draw in the engine goes through a [`DieRoller`], which yields a
//! uniform integer in `[1, sides]`. Sessions use a seeded or OS-seeded
//! [`StdRng`]; tests use [`FixedRolls`] to script exact outcomes.

pub mod roll;

pub use roll::{DieResult, RollResult};

use rand::Rng;
use rand::rngs::StdRng;

/// A source of uniform die rolls.
pub trait DieRoller {
    /// Roll one die with `sides` faces, returning a value in `[1, sides]`.
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Roll `count` dice of `sides` faces, keeping each die.
    fn roll_pool(&mut self, count: u32, sides: u32) -> RollResult {
        let dice = (0..count)
            .map(|_| DieResult {
                sides,
                value: self.roll_die(sides),
            })
            .collect();
        RollResult { dice }
    }

    /// Roll a single six-sided die.
    fn d6(&mut self) -> u32 {
        self.roll_die(6)
    }

    /// Roll two independent six-sided dice.
    fn two_d6(&mut self) -> RollResult {
        self.roll_pool(2, 6)
    }
}

impl DieRoller for StdRng {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.random_range(1..=sides.max(1))
    }
}

/// A scripted roller that replays a fixed sequence, cycling when exhausted.
///
/// Values are clamped into `[1, sides]` for the die being rolled.
#[derive(Debug, Clone)]
pub struct FixedRolls {
    values: Vec<u32>,
    index: usize,
}

impl FixedRolls {
    /// Replay `values` in order.
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Always roll the same value.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// Number of dice drawn so far.
    pub fn drawn(&self) -> usize {
        self.index
    }
}

impl DieRoller for FixedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        if self.values.is_empty() {
            return 1;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value.clamp(1, sides)
    }
}

/// A dice expression such as `2d6` or `d20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    /// Number of dice.
    pub count: u32,
    /// Sides per die.
    pub sides: u32,
}

impl DiceExpr {
    /// Parse `NdS` or `dS` (case-insensitive). A bare number is `1dS`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let (count, sides) = match s.split_once('d') {
            Some(("", sides)) => (1, sides.parse::<u32>().ok()?),
            Some((count, sides)) => (count.parse::<u32>().ok()?, sides.parse::<u32>().ok()?),
            None => (1, s.parse::<u32>().ok()?),
        };
        if count == 0 || sides < 2 {
            return None;
        }
        Some(Self { count, sides })
    }
}

impl std::fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
