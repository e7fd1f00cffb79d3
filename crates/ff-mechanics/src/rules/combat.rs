//! Combat rounds against the active encounter.
//!
//! Each side rolls 2d6 and adds its SKILL to get an Attack Strength. The
//! higher Attack Strength wounds the other side for 2 STAMINA; equal
//! strengths miss. When luck is used on a decisive round it scales the
//! damage but never changes who won.

use serde::{Deserialize, Serialize};

use crate::dice::{DieRoller, RollResult};
use crate::encounter::{EncounterId, EncounterStatus};
use crate::error::{RuleError, RuleResult};
use crate::log::LogKind;
use crate::state::GameState;

use super::luck::{LuckTest, spend_luck};
use super::refuse;

/// Damage dealt by a decisive round without luck.
pub const BASE_DAMAGE: i32 = 2;

/// Who won a combat round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatOutcome {
    /// The adventurer wounded the monster.
    Player,
    /// The monster wounded the adventurer.
    Monster,
    /// Equal Attack Strengths; nobody is hurt.
    Tie,
}

impl CombatOutcome {
    /// Compare two Attack Strengths.
    pub fn from_attack_strengths(player: i32, monster: i32) -> Self {
        match player.cmp(&monster) {
            std::cmp::Ordering::Greater => Self::Player,
            std::cmp::Ordering::Less => Self::Monster,
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }
}

impl std::fmt::Display for CombatOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Monster => write!(f, "monster"),
            Self::Tie => write!(f, "tie"),
        }
    }
}

/// Damage for a round, given the outcome and an optional luck result.
///
/// | outcome | no luck | lucky | unlucky |
/// |---------|---------|-------|---------|
/// | player  | 2       | 4     | 1       |
/// | monster | 2       | 1     | 3       |
/// | tie     | 0       | 0     | 0       |
pub fn round_damage(outcome: CombatOutcome, lucky: Option<bool>) -> i32 {
    match (outcome, lucky) {
        (CombatOutcome::Tie, _) => 0,
        (_, None) => BASE_DAMAGE,
        (CombatOutcome::Player, Some(true)) => 4,
        (CombatOutcome::Player, Some(false)) => 1,
        (CombatOutcome::Monster, Some(true)) => 1,
        (CombatOutcome::Monster, Some(false)) => 3,
    }
}

/// Everything that happened in one combat round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRound {
    /// The encounter fought.
    pub encounter: EncounterId,
    /// The adventurer's 2d6.
    pub player_roll: RollResult,
    /// The adventurer's SKILL used.
    pub player_skill: i32,
    /// The monster's 2d6.
    pub monster_roll: RollResult,
    /// The monster's SKILL.
    pub monster_skill: i32,
    /// Who won.
    pub outcome: CombatOutcome,
    /// The luck test, if luck was used on a decisive round.
    pub luck: Option<LuckTest>,
    /// STAMINA lost by the loser.
    pub damage: i32,
    /// True if this round reduced the monster to zero STAMINA.
    pub defeated: bool,
}

impl CombatRound {
    /// The adventurer's Attack Strength.
    pub fn player_attack(&self) -> i32 {
        attack_strength(&self.player_roll, self.player_skill)
    }

    /// The monster's Attack Strength.
    pub fn monster_attack(&self) -> i32 {
        attack_strength(&self.monster_roll, self.monster_skill)
    }

    /// The combat-log line for this round.
    pub fn describe(&self) -> String {
        let player = format!(
            "Player AS {} (2d6={}+SKILL={})",
            self.player_attack(),
            self.player_roll.total(),
            self.player_skill
        );
        let monster = format!(
            "Monster AS {} (2d6={}+SKILL={})",
            self.monster_attack(),
            self.monster_roll.total(),
            self.monster_skill
        );
        match self.outcome {
            CombatOutcome::Player => format!(
                "Player wins: {player} vs {monster}. Damage to monster: {}.",
                self.damage
            ),
            CombatOutcome::Monster => format!(
                "Monster wins: {monster} vs {player}. Damage to player: {}.",
                self.damage
            ),
            CombatOutcome::Tie => format!(
                "Tie: Player AS {} vs Monster AS {}. No damage.",
                self.player_attack(),
                self.monster_attack()
            ),
        }
    }
}

/// 2d6 plus SKILL.
pub fn attack_strength(roll: &RollResult, skill: i32) -> i32 {
    i32::try_from(roll.total())
        .unwrap_or(i32::MAX)
        .saturating_add(skill)
}

/// Fight one round against the active encounter.
///
/// Fails, logging to the combat channel and changing nothing else, with
/// `StatsNotRolled`, `NoActiveEncounter`, or `EncounterNotActive`. Dice are
/// drawn in order: adventurer 2d6, monster 2d6, then luck 2d6 when
/// `use_luck` is set and the round was decisive.
pub fn combat_round(
    state: &mut GameState,
    dice: &mut dyn DieRoller,
    use_luck: bool,
) -> RuleResult<CombatRound> {
    if let Err(e) = state.player.require_rolled() {
        return refuse(state, LogKind::Combat, e);
    }
    let Some(encounter) = state.registry.active() else {
        return refuse(state, LogKind::Combat, RuleError::NoActiveEncounter);
    };
    if encounter.status != EncounterStatus::Active {
        return refuse(state, LogKind::Combat, RuleError::EncounterNotActive);
    }
    let encounter_id = encounter.id.clone();
    let monster_skill = encounter.skill;
    let player_skill = state.player.skill.current_or_zero();

    let player_roll = dice.two_d6();
    let monster_roll = dice.two_d6();
    let outcome = CombatOutcome::from_attack_strengths(
        attack_strength(&player_roll, player_skill),
        attack_strength(&monster_roll, monster_skill),
    );

    let luck = if use_luck && outcome != CombatOutcome::Tie {
        let test = spend_luck(&mut state.player, dice);
        state
            .logs
            .record(LogKind::Combat, format!("Luck used: {}", test.describe()));
        Some(test)
    } else {
        None
    };
    let damage = round_damage(outcome, luck.as_ref().map(|t| t.lucky));

    let mut defeated = false;
    match outcome {
        CombatOutcome::Player => {
            if let Some(encounter) = state.registry.get_mut(&encounter_id) {
                encounter.take_damage(damage);
                defeated = encounter.status == EncounterStatus::Defeated;
            }
        }
        CombatOutcome::Monster => {
            state.player.stamina.adjust(-damage);
        }
        CombatOutcome::Tie => {}
    }
    state.enforce_caps();

    let round = CombatRound {
        encounter: encounter_id,
        player_roll,
        player_skill,
        monster_roll,
        monster_skill,
        outcome,
        luck,
        damage,
        defeated,
    };
    state.logs.record(LogKind::Combat, round.describe());
    tracing::debug!(
        player_attack = round.player_attack(),
        monster_attack = round.monster_attack(),
        outcome = %round.outcome,
        damage = round.damage,
        "combat round resolved"
    );
    Ok(round)
}
