//! Dice roll results and aggregation.

use serde::{Deserialize, Serialize};

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// Number of sides on the die that was rolled.
    pub sides: u32,
    /// The value rolled (1 to `sides`).
    pub value: u32,
}

/// The result of rolling several dice together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual die results, in the order they were drawn.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of all die values, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.dice
            .iter()
            .fold(0u32, |sum, d| sum.saturating_add(d.value))
    }

    /// Individual die values in draw order.
    pub fn values(&self) -> Vec<u32> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Sides of the dice in this roll, or 0 if empty.
    pub fn sides(&self) -> u32 {
        self.dice.first().map(|d| d.sides).unwrap_or(0)
    }

    /// Readable label in the freeform roller's wording.
    ///
    /// `Rolled 1d20: 17` for one die, `Rolled 2d6: 3 + 5 = 8` for more.
    pub fn label(&self) -> String {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        if self.dice.len() == 1 {
            format!("Rolled 1d{}: {}", self.sides(), values.join(""))
        } else {
            format!(
                "Rolled {}d{}: {} = {}",
                self.count(),
                self.sides(),
                values.join(" + "),
                self.total()
            )
        }
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}
