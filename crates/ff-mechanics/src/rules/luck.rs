//! Testing your luck.
//!
//! Roll 2d6 and compare against current LUCK: at or under is lucky. Every
//! test costs one LUCK point whatever the result, and the comparison uses
//! LUCK from before the deduction.

use serde::{Deserialize, Serialize};

use crate::dice::{DieRoller, RollResult};
use crate::error::RuleResult;
use crate::log::LogKind;
use crate::sheet::CharacterSheet;
use crate::state::GameState;

use super::refuse;

/// The result of one luck test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckTest {
    /// The 2d6 roll.
    pub roll: RollResult,
    /// LUCK before the test, the number to roll at or under.
    pub threshold: i32,
    /// Whether the roll was at or under the threshold.
    pub lucky: bool,
    /// LUCK after the one-point deduction.
    pub luck_after: i32,
}

impl LuckTest {
    /// `LUCKY` or `UNLUCKY`.
    pub fn verdict(&self) -> &'static str {
        if self.lucky { "LUCKY" } else { "UNLUCKY" }
    }

    /// `rolled 7 vs LUCK 9 → LUCKY. LUCK now 8.`
    pub fn describe(&self) -> String {
        format!(
            "rolled {} vs LUCK {} → {}. LUCK now {}.",
            self.roll.total(),
            self.threshold,
            self.verdict(),
            self.luck_after
        )
    }
}

/// Roll-under comparison: lucky when `roll <= threshold`.
pub fn is_lucky(roll: u32, threshold: i32) -> bool {
    i64::from(roll) <= i64::from(threshold)
}

/// Roll against the sheet's LUCK and spend one point.
///
/// Callers must check the stats are rolled first.
pub(crate) fn spend_luck(player: &mut CharacterSheet, dice: &mut dyn DieRoller) -> LuckTest {
    let roll = dice.two_d6();
    let threshold = player.luck.current_or_zero();
    let lucky = is_lucky(roll.total(), threshold);
    let luck_after = player.luck.adjust(-1).unwrap_or(0);
    LuckTest {
        roll,
        threshold,
        lucky,
        luck_after,
    }
}

/// Test your luck.
///
/// Fails with `StatsNotRolled` before the initial roll.
pub fn test_luck(state: &mut GameState, dice: &mut dyn DieRoller) -> RuleResult<LuckTest> {
    if let Err(e) = state.player.require_rolled() {
        return refuse(state, LogKind::Luck, e);
    }

    let test = spend_luck(&mut state.player, dice);
    state
        .logs
        .record(LogKind::Luck, format!("Test Your Luck: {}", test.describe()));
    tracing::debug!(
        roll = test.roll.total(),
        threshold = test.threshold,
        lucky = test.lucky,
        "luck tested"
    );
    Ok(test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedRolls;
    use crate::error::RuleError;
    use crate::sheet::Stat;

    fn rolled_state(luck: i32) -> GameState {
        let mut state = GameState::new("Tester");
        state.player.skill = Stat::rolled(10);
        state.player.stamina = Stat::rolled(20);
        state.player.luck = Stat::rolled(luck);
        state
    }

    #[test]
    fn roll_under_comparison() {
        assert!(is_lucky(7, 7));
        assert!(is_lucky(2, 7));
        assert!(!is_lucky(8, 7));
        assert!(!is_lucky(2, 0));
    }

    #[test]
    fn lucky_roll_costs_a_point() {
        let mut state = rolled_state(9);
        let mut dice = FixedRolls::new(vec![3, 4]);
        let test = test_luck(&mut state, &mut dice).unwrap();
        assert!(test.lucky);
        assert_eq!(test.threshold, 9);
        assert_eq!(test.luck_after, 8);
        assert_eq!(state.player.luck.current, Some(8));
        assert_eq!(state.player.luck.initial, Some(9));
    }

    #[test]
    fn unlucky_roll_costs_a_point() {
        let mut state = rolled_state(7);
        let mut dice = FixedRolls::new(vec![6, 6]);
        let test = test_luck(&mut state, &mut dice).unwrap();
        assert!(!test.lucky);
        assert_eq!(state.player.luck.current, Some(6));
    }

    #[test]
    fn threshold_uses_luck_before_deduction() {
        // 2d6 = 7 against LUCK 7 is lucky even though LUCK drops to 6.
        let mut state = rolled_state(7);
        let mut dice = FixedRolls::new(vec![3, 4]);
        assert!(test_luck(&mut state, &mut dice).unwrap().lucky);
    }

    #[test]
    fn luck_floors_at_zero() {
        let mut state = rolled_state(7);
        state.player.luck.current = Some(0);
        let mut dice = FixedRolls::constant(1);
        let test = test_luck(&mut state, &mut dice).unwrap();
        assert!(!test.lucky);
        assert_eq!(test.luck_after, 0);
    }

    #[test]
    fn logs_the_test() {
        let mut state = rolled_state(9);
        let mut dice = FixedRolls::new(vec![3, 4]);
        test_luck(&mut state, &mut dice).unwrap();
        let line = state.logs.latest(LogKind::Luck).unwrap();
        assert!(line.contains("Test Your Luck: rolled 7 vs LUCK 9 → LUCKY. LUCK now 8."));
    }

    #[test]
    fn unrolled_stats_refused_and_logged() {
        let mut state = GameState::default();
        let mut dice = FixedRolls::constant(1);
        assert_eq!(
            test_luck(&mut state, &mut dice),
            Err(RuleError::StatsNotRolled)
        );
        assert_eq!(dice.drawn(), 0);
        assert!(state.logs.latest(LogKind::Luck).unwrap().ends_with("Roll stats first."));
    }
}
