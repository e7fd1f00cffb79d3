//! The rules engine.
//!
//! Stateless functions over a [`GameState`]: stat rolls, provisions,
//! potions, inventory, encounter bookkeeping, luck tests, combat rounds,
//! and the freeform dice roller. Each returns a [`RuleResult`]. Precondition
//! failures of the luck, potion, provision and combat rules are also written
//! to the event log so the adventure keeps a readable audit trail.

pub mod combat;
pub mod luck;

pub use combat::{CombatOutcome, CombatRound, combat_round, round_damage};
pub use luck::{LuckTest, test_luck};

use serde::{Deserialize, Serialize};

use crate::dice::{DieRoller, RollResult};
use crate::encounter::{Encounter, EncounterId, EncounterStatus};
use crate::error::{RuleError, RuleResult};
use crate::log::LogKind;
use crate::sheet::{ItemList, MAX_GOLD, MAX_PROVISIONS, PotionChoice, Stat, StatKind};
use crate::state::GameState;

/// STAMINA restored by eating one provision.
pub const PROVISION_STAMINA: i32 = 4;

/// Log the refusal in the adventure's words and return the error.
pub(crate) fn refuse<T>(state: &mut GameState, kind: LogKind, error: RuleError) -> RuleResult<T> {
    let message = match &error {
        RuleError::StatsNotRolled => "Roll stats first.".to_string(),
        RuleError::NoProvisions => "No provisions left.".to_string(),
        RuleError::AlreadyUsed => "Potion already used this adventure.".to_string(),
        RuleError::NoPotionChosen => "Choose a potion first.".to_string(),
        RuleError::NoActiveEncounter => "No active monster selected.".to_string(),
        RuleError::EncounterNotActive => "Active monster is not in 'active' status.".to_string(),
        other => format!("{other}."),
    };
    state.logs.record(kind, message);
    tracing::debug!(%error, channel = %kind, "rule refused");
    Err(error)
}

// ---------------------------------------------------------------------------
// Stat rolls
// ---------------------------------------------------------------------------

/// The three rolled stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialStats {
    /// Initial SKILL.
    pub skill: i32,
    /// Initial STAMINA.
    pub stamina: i32,
    /// Initial LUCK.
    pub luck: i32,
}

fn to_stat_value(total: u32) -> i32 {
    i32::try_from(total).unwrap_or(i32::MAX)
}

/// Roll SKILL: 1d6 + 6, with `current = initial`.
pub fn roll_skill(state: &mut GameState, dice: &mut dyn DieRoller) -> i32 {
    let value = to_stat_value(dice.d6()) + 6;
    state.player.skill = Stat::rolled(value);
    value
}

/// Roll STAMINA: 2d6 + 12, with `current = initial`.
pub fn roll_stamina(state: &mut GameState, dice: &mut dyn DieRoller) -> i32 {
    let value = to_stat_value(dice.two_d6().total()) + 12;
    state.player.stamina = Stat::rolled(value);
    value
}

/// Roll LUCK: 1d6 + 6, with `current = initial`.
pub fn roll_luck(state: &mut GameState, dice: &mut dyn DieRoller) -> i32 {
    let value = to_stat_value(dice.d6()) + 6;
    state.player.luck = Stat::rolled(value);
    value
}

/// Roll all three stats and note it in the luck log.
///
/// Overwrites any earlier roll; keeping to one roll per adventure is the
/// caller's business.
pub fn roll_initial_stats(state: &mut GameState, dice: &mut dyn DieRoller) -> InitialStats {
    let stats = InitialStats {
        skill: roll_skill(state, dice),
        stamina: roll_stamina(state, dice),
        luck: roll_luck(state, dice),
    };
    state.logs.record(
        LogKind::Luck,
        format!(
            "Rolled initial stats: SKILL {}, STAMINA {}, LUCK {}.",
            stats.skill, stats.stamina, stats.luck
        ),
    );
    tracing::debug!(?stats, "initial stats rolled");
    stats
}

// ---------------------------------------------------------------------------
// Provisions and potions
// ---------------------------------------------------------------------------

/// Eat one provision, restoring 4 STAMINA up to its initial value.
///
/// Returns STAMINA afterwards.
pub fn eat_provision(state: &mut GameState) -> RuleResult<i32> {
    if let Err(e) = state.player.require_rolled() {
        return refuse(state, LogKind::Luck, e);
    }
    if state.player.provisions <= 0 {
        return refuse(state, LogKind::Luck, RuleError::NoProvisions);
    }

    state.player.provisions -= 1;
    let stamina = state
        .player
        .stamina
        .adjust(PROVISION_STAMINA)
        .unwrap_or(0);
    tracing::debug!(stamina, provisions = state.player.provisions, "provision eaten");
    Ok(stamina)
}

/// Choose the adventure's potion.
pub fn choose_potion(state: &mut GameState, choice: PotionChoice) {
    state.player.potion.choice = choice;
}

/// Drink the chosen potion. Returns which one was drunk.
///
/// Skill and Strength restore their stat to its initial value. Fortune
/// raises initial LUCK by one and restores LUCK. Only one potion can be
/// drunk per adventure, whichever was chosen.
pub fn use_potion(state: &mut GameState) -> RuleResult<PotionChoice> {
    if let Err(e) = state.player.require_rolled() {
        return refuse(state, LogKind::Luck, e);
    }
    if state.player.potion.used {
        return refuse(state, LogKind::Luck, RuleError::AlreadyUsed);
    }
    let choice = state.player.potion.choice;
    let message = match choice {
        PotionChoice::None => return refuse(state, LogKind::Luck, RuleError::NoPotionChosen),
        PotionChoice::Skill => {
            state.player.skill.restore();
            "Used Potion of Skill: SKILL restored to Initial."
        }
        PotionChoice::Strength => {
            state.player.stamina.restore();
            "Used Potion of Strength: STAMINA restored to Initial."
        }
        PotionChoice::Fortune => {
            let raised = state.player.luck.initial.unwrap_or(0).saturating_add(1);
            state.player.luck = Stat::rolled(raised);
            "Used Potion of Fortune: Initial LUCK +1, LUCK restored."
        }
    };

    state.player.potion.used = true;
    state.player.enforce_caps();
    state.logs.record(LogKind::Luck, message);
    tracing::debug!(potion = ?choice, "potion used");
    Ok(choice)
}

// ---------------------------------------------------------------------------
// Manual adjustments and inventory
// ---------------------------------------------------------------------------

/// Step a stat's current value, clamped to `[0, initial]`.
///
/// Returns the new value. Fails quietly with `StatsNotRolled`.
pub fn adjust_stat(state: &mut GameState, kind: StatKind, delta: i32) -> RuleResult<i32> {
    state.player.require_rolled()?;
    state
        .player
        .stat_mut(kind)
        .adjust(delta)
        .ok_or(RuleError::StatsNotRolled)
}

/// Step provisions, clamped to `[0, 999]`. Returns the new count.
pub fn adjust_provisions(state: &mut GameState, delta: i32) -> i32 {
    let player = &mut state.player;
    player.provisions = player.provisions.saturating_add(delta).clamp(0, MAX_PROVISIONS);
    player.provisions
}

/// Step gold, clamped to `[0, 999999]`. Returns the new amount.
pub fn adjust_gold(state: &mut GameState, delta: i32) -> i32 {
    let player = &mut state.player;
    player.gold = player.gold.saturating_add(delta).clamp(0, MAX_GOLD);
    player.gold
}

/// Append an item to an inventory list. Text is trimmed; empty is refused.
pub fn add_item(state: &mut GameState, list: ItemList, text: &str) -> RuleResult<()> {
    let clean = text.trim();
    if clean.is_empty() {
        return Err(RuleError::InvalidInput(format!("{list} item is empty")));
    }
    state.player.items_mut(list).push(clean.to_string());
    Ok(())
}

/// Remove the item at a 0-based position. Returns the removed item.
pub fn remove_item(state: &mut GameState, list: ItemList, index: usize) -> RuleResult<String> {
    let items = state.player.items_mut(list);
    if index >= items.len() {
        return Err(RuleError::InvalidInput(format!(
            "no {list} item at position {}",
            index.saturating_add(1)
        )));
    }
    Ok(items.remove(index))
}

// ---------------------------------------------------------------------------
// Encounters
// ---------------------------------------------------------------------------

/// Add a monster and make it the active encounter. Returns its id.
///
/// Refuses, without logging, an empty name or non-finite numbers.
pub fn add_encounter(
    state: &mut GameState,
    name: &str,
    skill: f64,
    stamina: f64,
) -> RuleResult<EncounterId> {
    let encounter = Encounter::new(name, skill, stamina)?;
    tracing::debug!(name = %encounter.name, skill = encounter.skill, stamina = %encounter.stamina, "encounter added");
    Ok(state.registry.add(encounter))
}

/// Make an encounter the active one.
pub fn set_active_encounter(state: &mut GameState, id: &EncounterId) -> RuleResult<()> {
    state.registry.set_active(id)
}

/// Damage an encounter by hand. Returns its STAMINA afterwards.
pub fn damage_encounter(state: &mut GameState, id: &EncounterId, amount: i32) -> RuleResult<i32> {
    let stamina = state.registry.damage(id, amount)?;
    Ok(stamina.current)
}

/// Remove an encounter, clearing the active id if it was active.
pub fn remove_encounter(state: &mut GameState, id: &EncounterId) -> RuleResult<Encounter> {
    state.registry.remove(id)
}

/// Flip an encounter between escaped and active.
pub fn toggle_encounter_escaped(
    state: &mut GameState,
    id: &EncounterId,
) -> RuleResult<EncounterStatus> {
    state.registry.toggle_escaped(id)
}

// ---------------------------------------------------------------------------
// Freeform dice
// ---------------------------------------------------------------------------

/// Roll one or two dice of any size and note it in the dice log.
///
/// Never touches the sheet or the encounters.
pub fn roll_dice(
    state: &mut GameState,
    dice: &mut dyn DieRoller,
    count: u32,
    sides: u32,
) -> RuleResult<RollResult> {
    if !(1..=2).contains(&count) {
        return Err(RuleError::InvalidInput(format!(
            "can roll 1 or 2 dice, not {count}"
        )));
    }
    if sides < 2 {
        return Err(RuleError::InvalidInput(format!(
            "a die needs at least 2 sides, not {sides}"
        )));
    }
    let roll = dice.roll_pool(count, sides);
    state.logs.record(LogKind::Dice, roll.label());
    Ok(roll)
}

/// Empty the dice log.
pub fn clear_dice_log(state: &mut GameState) {
    state.logs.clear(LogKind::Dice);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedRolls;

    fn rolled_state() -> GameState {
        let mut state = GameState::new("Tester");
        roll_initial_stats(&mut state, &mut FixedRolls::constant(4));
        state
    }

    #[test]
    fn initial_roll_with_fours() {
        let mut state = GameState::default();
        let stats = roll_initial_stats(&mut state, &mut FixedRolls::constant(4));
        assert_eq!(
            stats,
            InitialStats {
                skill: 10,
                stamina: 20,
                luck: 10
            }
        );
        assert_eq!(state.player.skill, Stat::rolled(10));
        assert_eq!(state.player.stamina, Stat::rolled(20));
        assert_eq!(state.player.luck, Stat::rolled(10));
        assert_eq!(state.logs.entries(LogKind::Luck).len(), 1);
    }

    #[test]
    fn initial_roll_ranges() {
        let mut state = GameState::default();
        let low = roll_initial_stats(&mut state, &mut FixedRolls::constant(1));
        assert_eq!((low.skill, low.stamina, low.luck), (7, 14, 7));
        let high = roll_initial_stats(&mut state, &mut FixedRolls::constant(6));
        assert_eq!((high.skill, high.stamina, high.luck), (12, 24, 12));
    }

    #[test]
    fn per_stat_rolls() {
        let mut state = GameState::default();
        let mut dice = FixedRolls::new(vec![2, 3, 4, 5]);
        assert_eq!(roll_skill(&mut state, &mut dice), 8);
        assert_eq!(roll_stamina(&mut state, &mut dice), 19);
        assert_eq!(roll_luck(&mut state, &mut dice), 11);
        assert!(state.player.stats_rolled());
        assert!(state.logs.entries(LogKind::Luck).is_empty());
    }

    #[test]
    fn eat_provision_restores_stamina() {
        let mut state = rolled_state();
        state.player.stamina.current = Some(10);
        assert_eq!(eat_provision(&mut state), Ok(14));
        assert_eq!(state.player.provisions, 9);
        assert_eq!(state.logs.luck.len(), 1);
    }

    #[test]
    fn eat_provision_caps_at_initial() {
        let mut state = rolled_state();
        state.player.stamina.current = Some(18);
        assert_eq!(eat_provision(&mut state), Ok(20));
    }

    #[test]
    fn eat_provision_refusals() {
        let mut unrolled = GameState::default();
        assert_eq!(eat_provision(&mut unrolled), Err(RuleError::StatsNotRolled));
        assert_eq!(unrolled.player.provisions, 10);

        let mut state = rolled_state();
        state.player.provisions = 0;
        state.player.stamina.current = Some(5);
        assert_eq!(eat_provision(&mut state), Err(RuleError::NoProvisions));
        assert_eq!(state.player.stamina.current, Some(5));
        assert!(state.logs.latest(LogKind::Luck).unwrap().ends_with("No provisions left."));
    }

    #[test]
    fn skill_potion_on_full_skill() {
        let mut state = rolled_state();
        choose_potion(&mut state, PotionChoice::Skill);
        assert_eq!(use_potion(&mut state), Ok(PotionChoice::Skill));
        assert_eq!(state.player.skill.current, Some(10));
        assert!(state.player.potion.used);
    }

    #[test]
    fn strength_potion_restores_stamina() {
        let mut state = rolled_state();
        state.player.stamina.current = Some(3);
        choose_potion(&mut state, PotionChoice::Strength);
        use_potion(&mut state).unwrap();
        assert_eq!(state.player.stamina.current, Some(20));
    }

    #[test]
    fn fortune_potion_raises_initial_luck() {
        let mut state = rolled_state();
        state.player.luck.current = Some(4);
        choose_potion(&mut state, PotionChoice::Fortune);
        use_potion(&mut state).unwrap();
        assert_eq!(state.player.luck, Stat::rolled(11));
    }

    #[test]
    fn potion_refusals() {
        let mut unrolled = GameState::default();
        choose_potion(&mut unrolled, PotionChoice::Skill);
        assert_eq!(use_potion(&mut unrolled), Err(RuleError::StatsNotRolled));
        assert!(!unrolled.player.potion.used);

        let mut state = rolled_state();
        assert_eq!(use_potion(&mut state), Err(RuleError::NoPotionChosen));
        assert!(!state.player.potion.used);
        assert!(state.logs.latest(LogKind::Luck).unwrap().ends_with("Choose a potion first."));

        choose_potion(&mut state, PotionChoice::Strength);
        use_potion(&mut state).unwrap();
        choose_potion(&mut state, PotionChoice::Fortune);
        assert_eq!(use_potion(&mut state), Err(RuleError::AlreadyUsed));
        assert_eq!(state.player.luck.initial, Some(10));
    }

    #[test]
    fn adjust_stat_clamps_and_requires_roll() {
        let mut unrolled = GameState::default();
        assert_eq!(
            adjust_stat(&mut unrolled, StatKind::Skill, 1),
            Err(RuleError::StatsNotRolled)
        );
        assert!(unrolled.logs.entries(LogKind::Luck).is_empty());

        let mut state = rolled_state();
        assert_eq!(adjust_stat(&mut state, StatKind::Luck, 1), Ok(10));
        assert_eq!(adjust_stat(&mut state, StatKind::Luck, -3), Ok(7));
        assert_eq!(adjust_stat(&mut state, StatKind::Stamina, -50), Ok(0));
    }

    #[test]
    fn provisions_and_gold_clamp() {
        let mut state = GameState::default();
        assert_eq!(adjust_provisions(&mut state, -20), 0);
        assert_eq!(adjust_provisions(&mut state, 5000), MAX_PROVISIONS);
        assert_eq!(adjust_gold(&mut state, -1), 0);
        assert_eq!(adjust_gold(&mut state, 25), 25);
        assert_eq!(adjust_gold(&mut state, i32::MAX), MAX_GOLD);
    }

    #[test]
    fn inventory_add_and_remove() {
        let mut state = GameState::default();
        add_item(&mut state, ItemList::Equipment, "  Sword ").unwrap();
        add_item(&mut state, ItemList::Equipment, "Sword").unwrap();
        add_item(&mut state, ItemList::Treasure, "Gold ring").unwrap();
        assert_eq!(state.player.equipment, vec!["Sword", "Sword"]);
        assert!(add_item(&mut state, ItemList::Equipment, "   ").is_err());

        assert_eq!(remove_item(&mut state, ItemList::Treasure, 0), Ok("Gold ring".to_string()));
        assert!(remove_item(&mut state, ItemList::Treasure, 0).is_err());
    }

    #[test]
    fn remove_item_far_out_of_range() {
        let mut state = GameState::default();
        add_item(&mut state, ItemList::Equipment, "Rope").unwrap();
        assert_eq!(
            remove_item(&mut state, ItemList::Equipment, usize::MAX),
            Err(RuleError::InvalidInput(format!(
                "no equipment item at position {}",
                usize::MAX
            )))
        );
        assert_eq!(state.player.equipment, vec!["Rope"]);
    }

    #[test]
    fn damage_encounter_at_integer_extremes() {
        let mut state = GameState::default();
        let id = add_encounter(&mut state, "Orc", 8.0, 8.0).unwrap();
        assert_eq!(damage_encounter(&mut state, &id, 5), Ok(3));
        assert_eq!(damage_encounter(&mut state, &id, i32::MIN), Ok(8));
        assert_eq!(damage_encounter(&mut state, &id, i32::MAX), Ok(0));
        assert_eq!(
            state.registry.get(&id).unwrap().status,
            EncounterStatus::Defeated
        );
    }

    #[test]
    fn encounter_lifecycle() {
        let mut state = GameState::default();
        let id = add_encounter(&mut state, "Orc", 8.0, 8.0).unwrap();
        assert_eq!(state.registry.active().map(|e| &e.id), Some(&id));
        assert_eq!(damage_encounter(&mut state, &id, 10), Ok(0));
        assert_eq!(
            state.registry.get(&id).unwrap().status,
            EncounterStatus::Defeated
        );
        assert_eq!(
            toggle_encounter_escaped(&mut state, &id),
            Ok(EncounterStatus::Escaped)
        );
        remove_encounter(&mut state, &id).unwrap();
        assert!(state.registry.active().is_none());
        assert_eq!(
            set_active_encounter(&mut state, &id),
            Err(RuleError::EncounterNotFound(id))
        );
    }

    #[test]
    fn add_encounter_rejects_invalid_input_silently() {
        let mut state = GameState::default();
        assert!(add_encounter(&mut state, "", 8.0, 8.0).is_err());
        assert!(add_encounter(&mut state, "Orc", f64::NAN, 8.0).is_err());
        assert!(state.registry.is_empty());
        assert!(state.logs.entries(LogKind::Luck).is_empty());
    }

    #[test]
    fn freeform_dice_only_touches_dice_log() {
        let mut state = rolled_state();
        let before = state.clone();
        let roll = roll_dice(&mut state, &mut FixedRolls::new(vec![3, 5]), 2, 6).unwrap();
        assert_eq!(roll.total(), 8);
        assert_eq!(state.player, before.player);
        assert_eq!(state.registry, before.registry);
        assert!(state.logs.latest(LogKind::Dice).unwrap().ends_with("Rolled 2d6: 3 + 5 = 8"));

        roll_dice(&mut state, &mut FixedRolls::constant(17), 1, 20).unwrap();
        assert!(state.logs.latest(LogKind::Dice).unwrap().ends_with("Rolled 1d20: 17"));

        clear_dice_log(&mut state);
        assert!(state.logs.entries(LogKind::Dice).is_empty());
    }

    #[test]
    fn freeform_dice_validates() {
        let mut state = GameState::default();
        let mut dice = FixedRolls::constant(1);
        assert!(roll_dice(&mut state, &mut dice, 3, 6).is_err());
        assert!(roll_dice(&mut state, &mut dice, 0, 6).is_err());
        assert!(roll_dice(&mut state, &mut dice, 1, 1).is_err());
        assert_eq!(dice.drawn(), 0);
    }
}
