//! The game state aggregate owned by a running adventure.

use serde::{Deserialize, Serialize};

use crate::encounter::EncounterRegistry;
use crate::log::EventLog;
use crate::sheet::CharacterSheet;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Sheet, encounters and log of one adventure.
///
/// Serializes to the snapshot document: `version`, `player`, `encounters`,
/// `activeEncounterId` and `logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Snapshot format version.
    pub version: u32,
    /// The adventurer's sheet.
    pub player: CharacterSheet,
    /// Monsters met so far and the active one.
    #[serde(flatten)]
    pub registry: EncounterRegistry,
    /// Luck, combat and dice channels.
    pub logs: EventLog,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            player: CharacterSheet::default(),
            registry: EncounterRegistry::default(),
            logs: EventLog::default(),
        }
    }
}

impl GameState {
    /// A fresh adventure for the named adventurer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            player: CharacterSheet::new(name),
            ..Self::default()
        }
    }

    /// Re-clamp every bounded value in the aggregate. Idempotent.
    pub fn enforce_caps(&mut self) {
        self.player.enforce_caps();
        self.registry.enforce_caps();
        self.logs.enforce_caps();
    }
}
