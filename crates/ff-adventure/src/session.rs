//! Adventure session management.
//!
//! `Adventure` owns one [`GameState`], the dice, and a [`SaveStore`]. Every
//! mutating method applies a rule from `ff_mechanics::rules` and then writes
//! a fresh snapshot, so the store always reflects the last accepted action.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use ff_mechanics::rules::{self, InitialStats};
use ff_mechanics::{
    CharacterSheet, CombatRound, DiceExpr, DieRoller, Encounter, EncounterId,
    EncounterRegistry, EncounterStatus, EventLog, GameState, ItemList, LogKind, LuckTest,
    PotionChoice, RollResult, RuleResult, StatKind,
};

use crate::config::AdventureConfig;
use crate::error::{AdventureError, AdventureResult};
use crate::snapshot;
use crate::store::SaveStore;

/// Damage dealt by `monster hit` when no amount is given. A negative
/// amount heals, up to the monster's initial STAMINA.
const DEFAULT_HIT: i32 = 2;

/// A running Fighting Fantasy adventure.
pub struct Adventure<S: SaveStore, R: DieRoller = StdRng> {
    state: GameState,
    dice: R,
    store: S,
}

impl<S: SaveStore> Adventure<S, StdRng> {
    /// Open the adventure kept in `store`, or start fresh if there is none.
    ///
    /// A store that cannot be read, or holds a malformed snapshot, also
    /// yields a fresh adventure.
    pub fn open(store: S, config: &AdventureConfig) -> Self {
        let dice = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_roller(store, dice)
    }
}

impl<S: SaveStore, R: DieRoller> Adventure<S, R> {
    /// Open the adventure kept in `store` with a specific die roller.
    pub fn with_roller(store: S, dice: R) -> Self {
        let state = match store.load() {
            Ok(Some(raw)) => snapshot::decode(&raw),
            Ok(None) => GameState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read save, starting fresh");
                GameState::default()
            }
        };
        tracing::info!(
            name = %state.player.name,
            rolled = state.player.stats_rolled(),
            encounters = state.registry.len(),
            "adventure opened"
        );
        Self { state, dice, store }
    }

    /// The whole game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The character sheet.
    pub fn player(&self) -> &CharacterSheet {
        &self.state.player
    }

    /// The encounter registry.
    pub fn registry(&self) -> &EncounterRegistry {
        &self.state.registry
    }

    /// The event log.
    pub fn logs(&self) -> &EventLog {
        &self.state.logs
    }

    /// The save store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The save store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Whether the store holds a snapshot.
    pub fn has_save(&self) -> bool {
        self.store.has_save()
    }

    /// Write the current state to the store.
    pub fn persist(&mut self) -> AdventureResult<()> {
        let raw = snapshot::encode(&self.state)?;
        self.store.save(&raw).inspect_err(|e| {
            tracing::warn!(error = %e, "snapshot write failed, keeping in-memory state");
        })
    }

    /// Persist, then report the rule outcome. A write failure wins.
    fn commit<T>(&mut self, outcome: RuleResult<T>) -> AdventureResult<T> {
        self.persist()?;
        Ok(outcome?)
    }

    // -----------------------------------------------------------------------
    // Adventurer
    // -----------------------------------------------------------------------

    /// Throw away the current adventure and start a new one.
    pub fn new_adventure(&mut self, name: &str) -> AdventureResult<()> {
        self.state = GameState::new(name);
        tracing::info!(name = %self.state.player.name, "new adventure");
        self.commit(Ok(()))
    }

    /// Rename the adventurer.
    pub fn set_name(&mut self, name: &str) -> AdventureResult<()> {
        self.state.player.name = name.trim().to_string();
        self.commit(Ok(()))
    }

    /// Roll SKILL, STAMINA and LUCK.
    pub fn roll_initial_stats(&mut self) -> AdventureResult<InitialStats> {
        let stats = rules::roll_initial_stats(&mut self.state, &mut self.dice);
        self.commit(Ok(stats))
    }

    /// Roll a single stat.
    pub fn roll_stat(&mut self, kind: StatKind) -> AdventureResult<i32> {
        let value = match kind {
            StatKind::Skill => rules::roll_skill(&mut self.state, &mut self.dice),
            StatKind::Stamina => rules::roll_stamina(&mut self.state, &mut self.dice),
            StatKind::Luck => rules::roll_luck(&mut self.state, &mut self.dice),
        };
        self.commit(Ok(value))
    }

    /// Eat a provision.
    pub fn eat_provision(&mut self) -> AdventureResult<i32> {
        let outcome = rules::eat_provision(&mut self.state);
        self.commit(outcome)
    }

    /// Test your luck.
    pub fn test_luck(&mut self) -> AdventureResult<LuckTest> {
        let outcome = rules::test_luck(&mut self.state, &mut self.dice);
        self.commit(outcome)
    }

    /// Choose the adventure's potion.
    pub fn choose_potion(&mut self, choice: PotionChoice) -> AdventureResult<()> {
        rules::choose_potion(&mut self.state, choice);
        self.commit(Ok(()))
    }

    /// Drink the chosen potion.
    pub fn use_potion(&mut self) -> AdventureResult<PotionChoice> {
        let outcome = rules::use_potion(&mut self.state);
        self.commit(outcome)
    }

    /// Step a stat's current value.
    pub fn adjust_stat(&mut self, kind: StatKind, delta: i32) -> AdventureResult<i32> {
        let outcome = rules::adjust_stat(&mut self.state, kind, delta);
        self.commit(outcome)
    }

    /// Step provisions.
    pub fn adjust_provisions(&mut self, delta: i32) -> AdventureResult<i32> {
        let value = rules::adjust_provisions(&mut self.state, delta);
        self.commit(Ok(value))
    }

    /// Step gold.
    pub fn adjust_gold(&mut self, delta: i32) -> AdventureResult<i32> {
        let value = rules::adjust_gold(&mut self.state, delta);
        self.commit(Ok(value))
    }

    /// Add an inventory item.
    pub fn add_item(&mut self, list: ItemList, text: &str) -> AdventureResult<()> {
        let outcome = rules::add_item(&mut self.state, list, text);
        self.commit(outcome)
    }

    /// Remove an inventory item by 0-based position.
    pub fn remove_item(&mut self, list: ItemList, index: usize) -> AdventureResult<String> {
        let outcome = rules::remove_item(&mut self.state, list, index);
        self.commit(outcome)
    }

    // -----------------------------------------------------------------------
    // Encounters and combat
    // -----------------------------------------------------------------------

    /// Add a monster and make it active.
    pub fn add_encounter(
        &mut self,
        name: &str,
        skill: f64,
        stamina: f64,
    ) -> AdventureResult<EncounterId> {
        let outcome = rules::add_encounter(&mut self.state, name, skill, stamina);
        self.commit(outcome)
    }

    /// Make an encounter the active one.
    pub fn set_active_encounter(&mut self, id: &EncounterId) -> AdventureResult<()> {
        let outcome = rules::set_active_encounter(&mut self.state, id);
        self.commit(outcome)
    }

    /// Damage an encounter by hand.
    pub fn damage_encounter(&mut self, id: &EncounterId, amount: i32) -> AdventureResult<i32> {
        let outcome = rules::damage_encounter(&mut self.state, id, amount);
        self.commit(outcome)
    }

    /// Remove an encounter.
    pub fn remove_encounter(&mut self, id: &EncounterId) -> AdventureResult<Encounter> {
        let outcome = rules::remove_encounter(&mut self.state, id);
        self.commit(outcome)
    }

    /// Flip an encounter between escaped and active.
    pub fn toggle_encounter_escaped(
        &mut self,
        id: &EncounterId,
    ) -> AdventureResult<EncounterStatus> {
        let outcome = rules::toggle_encounter_escaped(&mut self.state, id);
        self.commit(outcome)
    }

    /// Fight one round against the active encounter.
    pub fn combat_round(&mut self, use_luck: bool) -> AdventureResult<CombatRound> {
        let outcome = rules::combat_round(&mut self.state, &mut self.dice, use_luck);
        self.commit(outcome)
    }

    // -----------------------------------------------------------------------
    // Dice and export
    // -----------------------------------------------------------------------

    /// Roll freeform dice.
    pub fn roll_dice(&mut self, count: u32, sides: u32) -> AdventureResult<RollResult> {
        let outcome = rules::roll_dice(&mut self.state, &mut self.dice, count, sides);
        self.commit(outcome)
    }

    /// Empty the dice log.
    pub fn clear_dice_log(&mut self) -> AdventureResult<()> {
        rules::clear_dice_log(&mut self.state);
        self.commit(Ok(()))
    }

    /// The current snapshot as pretty-printed JSON.
    pub fn export_json(&self) -> AdventureResult<String> {
        snapshot::encode_pretty(&self.state)
    }

    /// Write the current snapshot to a file.
    pub fn export_to(&self, path: &Path) -> AdventureResult<()> {
        let json = self.export_json()?;
        std::fs::write(path, json).map_err(|e| {
            AdventureError::Persistence(format!("exporting to {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "adventure exported");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Command interpreter
    // -----------------------------------------------------------------------

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> AdventureResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let (cmd, rest) = split_word(trimmed);
        match cmd.to_lowercase().as_str() {
            "new" => self.do_new(rest),
            "name" => self.do_name(rest),
            "roll" => self.do_roll(rest),
            "luck" => self.do_luck(),
            "eat" => self.do_eat(),
            "potion" => self.do_potion(rest),
            "drink" => self.do_drink(),
            "adjust" => self.do_adjust(rest),
            "gear" | "equipment" => self.do_items(ItemList::Equipment, rest),
            "treasure" => self.do_items(ItemList::Treasure, rest),
            "monster" => self.do_monster(rest),
            "monsters" => Ok(self.render_encounters()),
            "fight" => self.do_fight(rest),
            "dice" => self.do_dice(rest),
            "log" => self.do_log(rest),
            "status" | "sheet" => Ok(self.render_status()),
            "export" => self.do_export(rest),
            "help" => Ok(help_text(rest)),
            "quit" | "q" => Ok("Farewell, adventurer.".to_string()),
            other => Err(AdventureError::InvalidCommand(format!(
                "unknown command '{other}', type 'help' for a list"
            ))),
        }
    }

    fn do_new(&mut self, name: &str) -> AdventureResult<String> {
        self.new_adventure(name)?;
        let name = &self.state.player.name;
        Ok(if name.is_empty() {
            "New adventure started. Roll your stats with 'roll'.".to_string()
        } else {
            format!("New adventure started for {name}. Roll your stats with 'roll'.")
        })
    }

    fn do_name(&mut self, name: &str) -> AdventureResult<String> {
        if name.is_empty() {
            return Err(usage("name <adventurer name>"));
        }
        self.set_name(name)?;
        Ok(format!("Adventurer renamed to {}.", self.state.player.name))
    }

    fn do_roll(&mut self, rest: &str) -> AdventureResult<String> {
        if rest.is_empty() {
            let stats = self.roll_initial_stats()?;
            return Ok(format!(
                "Rolled initial stats: SKILL {}, STAMINA {}, LUCK {}.",
                stats.skill, stats.stamina, stats.luck
            ));
        }
        let kind = StatKind::parse(rest).ok_or_else(|| usage("roll [skill|stamina|luck]"))?;
        let value = self.roll_stat(kind)?;
        Ok(format!("Rolled {kind}: {value}."))
    }

    fn do_luck(&mut self) -> AdventureResult<String> {
        let test = self.test_luck()?;
        Ok(format!("Test Your Luck: {}", test.describe()))
    }

    fn do_eat(&mut self) -> AdventureResult<String> {
        let stamina = self.eat_provision()?;
        Ok(format!(
            "Ate a provision: STAMINA now {stamina}. Provisions left: {}.",
            self.state.player.provisions
        ))
    }

    fn do_potion(&mut self, rest: &str) -> AdventureResult<String> {
        if rest.is_empty() {
            let potion = self.state.player.potion;
            return Ok(format!(
                "Potion: {} ({})",
                potion.choice,
                if potion.used { "used" } else { "unused" }
            ));
        }
        let choice: PotionChoice = rest.parse()?;
        self.choose_potion(choice)?;
        Ok(format!("Potion chosen: {choice}."))
    }

    fn do_drink(&mut self) -> AdventureResult<String> {
        self.use_potion()?;
        Ok(self
            .state
            .logs
            .latest(LogKind::Luck)
            .map(strip_stamp)
            .unwrap_or_default()
            .to_string())
    }

    fn do_adjust(&mut self, rest: &str) -> AdventureResult<String> {
        const USAGE: &str = "adjust <skill|stamina|luck|provisions|gold> <+/-amount>";
        let (target, amount) = split_word(rest);
        let delta: i32 = amount.parse().map_err(|_| usage(USAGE))?;
        match target.to_lowercase().as_str() {
            "provisions" => {
                let value = self.adjust_provisions(delta)?;
                Ok(format!("Provisions: {value}."))
            }
            "gold" => {
                let value = self.adjust_gold(delta)?;
                Ok(format!("Gold: {value}."))
            }
            other => {
                let kind = StatKind::parse(other).ok_or_else(|| usage(USAGE))?;
                let value = self.adjust_stat(kind, delta)?;
                let initial = self.state.player.stat(kind).initial.unwrap_or(value);
                Ok(format!("{kind}: {value}/{initial}"))
            }
        }
    }

    fn do_items(&mut self, list: ItemList, rest: &str) -> AdventureResult<String> {
        let (sub, arg) = split_word(rest);
        match sub.to_lowercase().as_str() {
            "" | "list" => Ok(render_items(list, self.state.player.items(list))),
            "add" if !arg.is_empty() => {
                self.add_item(list, arg)?;
                Ok(format!("Added to {list}: {}", arg.trim()))
            }
            "remove" | "rm" => {
                let index =
                    parse_position(arg).ok_or_else(|| usage(&format!("{list} remove <n>")))?;
                let item = self.remove_item(list, index)?;
                Ok(format!("Removed from {list}: {item}"))
            }
            _ => Err(usage(&format!("{list} [list|add <item>|remove <n>]"))),
        }
    }

    fn do_monster(&mut self, rest: &str) -> AdventureResult<String> {
        let (sub, arg) = split_word(rest);
        match sub.to_lowercase().as_str() {
            "" | "list" => Ok(self.render_encounters()),
            "add" => {
                let (name, skill, stamina) = parse_monster(arg)
                    .ok_or_else(|| usage("monster add <name> <skill> <stamina>"))?;
                let id = self.add_encounter(name, skill, stamina)?;
                let added = self.encounter(&id)?;
                Ok(format!("Added {added} (now active)."))
            }
            "target" | "select" => {
                let id = self.resolve(arg)?;
                self.set_active_encounter(&id)?;
                Ok(format!("Active monster: {}.", self.encounter(&id)?.name))
            }
            "hit" | "damage" => {
                let (reference, amount) = split_word(arg);
                let id = self.resolve(reference)?;
                let amount = if amount.is_empty() {
                    DEFAULT_HIT
                } else {
                    amount
                        .parse()
                        .map_err(|_| usage("monster hit <n|id> [amount]"))?
                };
                self.damage_encounter(&id, amount)?;
                Ok(self.encounter(&id)?.to_string())
            }
            "escape" => {
                let id = self.resolve(arg)?;
                self.toggle_encounter_escaped(&id)?;
                Ok(self.encounter(&id)?.to_string())
            }
            "remove" | "rm" => {
                let id = self.resolve(arg)?;
                let removed = self.remove_encounter(&id)?;
                Ok(format!("Removed {}.", removed.name))
            }
            _ => Err(usage(
                "monster [list|add <name> <skill> <stamina>|target <n>|hit <n> [amount]|escape <n>|remove <n>]",
            )),
        }
    }

    fn do_fight(&mut self, rest: &str) -> AdventureResult<String> {
        let use_luck = match rest.to_lowercase().as_str() {
            "" => false,
            "luck" => true,
            _ => return Err(usage("fight [luck]")),
        };
        let round = self.combat_round(use_luck)?;
        let mut out = String::new();
        if let Some(test) = &round.luck {
            out.push_str(&format!("Luck used: {}\n", test.describe()));
        }
        out.push_str(&round.describe());
        if round.defeated {
            out.push_str("\nThe monster is defeated!");
        }
        if self.state.player.stamina.current == Some(0) {
            out.push_str("\nYour STAMINA is 0. Your adventure ends here.");
        }
        Ok(out)
    }

    fn do_dice(&mut self, rest: &str) -> AdventureResult<String> {
        if rest.eq_ignore_ascii_case("clear") {
            self.clear_dice_log()?;
            return Ok("Dice log cleared.".to_string());
        }
        let expr = if rest.is_empty() {
            DiceExpr {
                count: 2,
                sides: 6,
            }
        } else {
            DiceExpr::parse(rest).ok_or_else(|| usage("dice [NdS|clear], e.g. dice 2d6"))?
        };
        let roll = self.roll_dice(expr.count, expr.sides)?;
        Ok(roll.label())
    }

    fn do_log(&self, rest: &str) -> AdventureResult<String> {
        if rest.is_empty() {
            let sections: Vec<String> = LogKind::ALL
                .iter()
                .map(|&kind| format!("== {kind} ==\n{}", self.state.logs.render(kind)))
                .collect();
            return Ok(sections.join("\n\n"));
        }
        let kind = LogKind::parse(rest).ok_or_else(|| usage("log [luck|combat|dice]"))?;
        Ok(self.state.logs.render(kind))
    }

    fn do_export(&self, rest: &str) -> AdventureResult<String> {
        let file_name = if rest.is_empty() {
            snapshot::export_file_name()
        } else {
            rest.to_string()
        };
        self.export_to(Path::new(&file_name))?;
        Ok(format!("Exported to {file_name}."))
    }

    fn resolve(&self, reference: &str) -> AdventureResult<EncounterId> {
        if reference.is_empty() {
            return Err(usage("give a monster number or id"));
        }
        self.state
            .registry
            .resolve(reference)
            .ok_or_else(|| {
                AdventureError::InvalidCommand(format!("no monster matches '{reference}'"))
            })
    }

    fn encounter(&self, id: &EncounterId) -> AdventureResult<&Encounter> {
        self.state
            .registry
            .get(id)
            .ok_or_else(|| ff_mechanics::RuleError::EncounterNotFound(id.clone()).into())
    }

    /// Plain-text character sheet and active monster.
    pub fn render_status(&self) -> String {
        let p = &self.state.player;
        let name = if p.name.is_empty() { "(unnamed)" } else { &p.name };
        let mut out = format!("Adventurer: {name}\n");
        out.push_str(&format!(
            "SKILL {} | STAMINA {} | LUCK {}\n",
            p.skill, p.stamina, p.luck
        ));
        out.push_str(&format!("Provisions: {} | Gold: {}\n", p.provisions, p.gold));
        out.push_str(&format!(
            "Potion: {} ({})\n",
            p.potion.choice,
            if p.potion.used { "used" } else { "unused" }
        ));
        out.push_str(&format!("Equipment: {}\n", join_or_dash(&p.equipment)));
        out.push_str(&format!("Treasure: {}\n", join_or_dash(&p.treasure)));
        match self.state.registry.active() {
            Some(e) => out.push_str(&format!("Active monster: {e}")),
            None => out.push_str("No active monster."),
        }
        out
    }

    /// Plain-text numbered list of encounters, newest first.
    pub fn render_encounters(&self) -> String {
        let registry = &self.state.registry;
        if registry.is_empty() {
            return "No monsters yet. Add one with 'monster add <name> <skill> <stamina>'."
                .to_string();
        }
        let mut out = format!("Monsters ({}):\n", registry.len());
        for (i, e) in registry.iter().enumerate() {
            let marker = if registry.active_encounter_id.as_ref() == Some(&e.id) {
                '*'
            } else {
                ' '
            };
            out.push_str(&format!("{marker} {}. [{}] {e}\n", i + 1, e.id));
        }
        out.trim_end().to_string()
    }
}

fn usage(text: &str) -> AdventureError {
    AdventureError::InvalidCommand(format!("usage: {text}"))
}

/// Split off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (input, ""),
    }
}

/// A 1-based position as a 0-based index.
fn parse_position(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok()?.checked_sub(1)
}

/// `<name words...> <skill> <stamina>`
fn parse_monster(input: &str) -> Option<(&str, f64, f64)> {
    let mut parts = input.trim().rsplitn(3, char::is_whitespace);
    let stamina = parts.next()?.parse().ok()?;
    let skill = parts.next()?.parse().ok()?;
    let name = parts.next()?.trim();
    Some((name, skill, stamina))
}

fn strip_stamp(line: &str) -> &str {
    line.split_once("] ").map_or(line, |(_, msg)| msg)
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "—".to_string()
    } else {
        items.join(", ")
    }
}

fn render_items(list: ItemList, items: &[String]) -> String {
    if items.is_empty() {
        return format!("No {list} yet.");
    }
    let mut out = format!("{} ({}):\n", capitalize(&list.to_string()), items.len());
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("  {}. {item}\n", i + 1));
    }
    out.trim_end().to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn help_text(topic: &str) -> String {
    match topic.to_lowercase().as_str() {
        "combat" | "fight" | "monster" | "monsters" => "\
Combat Commands:
  monster add <name> <skill> <stamina>   Add a monster (becomes active)
  monsters                               List monsters (* = active)
  monster target <n|id>                  Make a monster the active one
  monster hit <n|id> [amount]            Damage a monster by hand (default 2, <0 heals)
  monster escape <n|id>                  Mark escaped / un-escape
  monster remove <n|id>                  Delete a monster
  fight                                  One combat round vs the active monster
  fight luck                             Same, testing luck to change damage"
            .to_string(),
        "sheet" | "stats" | "character" => "\
Character Commands:
  new [name]                             Start a fresh adventure
  name <name>                            Rename the adventurer
  roll [skill|stamina|luck]              Roll all stats, or just one
  adjust <stat|provisions|gold> <+/-n>   Step a value up or down
  luck                                   Test your luck (costs 1 LUCK)
  eat                                    Eat a provision (+4 STAMINA)
  potion <skill|strength|fortune>        Choose the adventure's potion
  drink                                  Drink the chosen potion (once)
  gear|treasure [add <item>|remove <n>]  Manage inventory"
            .to_string(),
        _ => "\
Fighting Fantasy Commands:
  new [name]                             Start a fresh adventure
  roll [stat]                            Roll initial stats
  status                                 Show the character sheet
  luck | eat | drink                     Test luck, eat, drink potion
  potion <choice>                        Choose potion
  adjust <target> <+/-n>                 Step a stat, provisions or gold
  gear | treasure                        Manage inventory
  monster ... | monsters                 Manage monsters
  fight [luck]                           Fight one combat round
  dice [NdS|clear]                       Roll freeform dice (default 2d6)
  log [luck|combat|dice]                 Show recent log entries
  export [file]                          Export the save as JSON
  help [sheet|combat]                    Show help on a topic
  quit                                   Exit"
            .to_string(),
    }
}
