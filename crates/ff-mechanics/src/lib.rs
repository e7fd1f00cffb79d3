//! Rules engine for Fighting Fantasy gamebook adventures.
//!
//! Provides dice, the adventurer's character sheet, monster encounters,
//! luck tests, combat rounds with optional luck, potions and provisions,
//! and a timestamped event log. Everything lives in one serializable
//! [`GameState`]; the rule functions in [`rules`] mutate it and never
//! touch storage or presentation.

pub mod dice;
pub mod encounter;
pub mod error;
pub mod log;
pub mod rules;
pub mod sheet;
pub mod state;

pub use dice::{DiceExpr, DieResult, DieRoller, FixedRolls, RollResult};
pub use encounter::{Encounter, EncounterId, EncounterRegistry, EncounterStatus};
pub use error::{RuleError, RuleResult};
pub use log::{EventLog, LOG_CAPACITY, LogKind};
pub use rules::{CombatOutcome, CombatRound, InitialStats, LuckTest};
pub use sheet::{CharacterSheet, Gauge, ItemList, Potion, PotionChoice, Stat, StatKind};
pub use state::{GameState, SNAPSHOT_VERSION};
