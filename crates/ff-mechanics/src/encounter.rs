//! Monster encounters and the registry that tracks which one is active.
//!
//! The registry keeps encounters newest first. At most one encounter is
//! active, and the active id always refers to an encounter in the registry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RuleError, RuleResult};
use crate::sheet::Gauge;

/// Bounds for a monster's SKILL.
pub const SKILL_RANGE: (i32, i32) = (1, 99);
/// Upper bound for a monster's STAMINA.
pub const MAX_STAMINA: i32 = 999;

/// Opaque unique identifier of an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncounterId(pub String);

impl EncounterId {
    /// Generate a new random encounter id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl Default for EncounterId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for EncounterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for EncounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short: String = self.0.chars().take(8).collect();
        write!(f, "{short}")
    }
}

/// Where an encounter stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterStatus {
    /// Still in the fight.
    #[default]
    Active,
    /// Stamina was reduced to zero.
    Defeated,
    /// The adventurer fled or the monster was left behind.
    Escaped,
}

impl std::fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Defeated => write!(f, "defeated"),
            Self::Escaped => write!(f, "escaped"),
        }
    }
}

/// A tracked monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// Unique id.
    pub id: EncounterId,
    /// Monster name.
    pub name: String,
    /// Monster SKILL, in `[1, 99]`.
    pub skill: i32,
    /// Monster STAMINA.
    pub stamina: Gauge,
    /// Lifecycle status.
    pub status: EncounterStatus,
}

impl Encounter {
    /// Create an encounter from raw input.
    ///
    /// SKILL is clamped to `[1, 99]`. Initial STAMINA is clamped to
    /// `[1, 999]` and current STAMINA starts at the raw value clamped to
    /// `[0, 999]`. Fractions are truncated. Fails on an empty name or a
    /// non-finite number.
    pub fn new(name: &str, skill: f64, stamina: f64) -> RuleResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuleError::InvalidInput("monster name is empty".to_string()));
        }
        if !skill.is_finite() || !stamina.is_finite() {
            return Err(RuleError::InvalidInput(
                "monster SKILL and STAMINA must be numbers".to_string(),
            ));
        }
        let skill = truncate(skill).clamp(SKILL_RANGE.0, SKILL_RANGE.1);
        let stamina = truncate(stamina);
        Ok(Self {
            id: EncounterId::new(),
            name: name.to_string(),
            skill,
            stamina: Gauge::with_current(
                stamina.clamp(1, MAX_STAMINA),
                stamina.clamp(0, MAX_STAMINA),
            ),
            status: EncounterStatus::Active,
        })
    }

    /// Apply damage, marking the encounter defeated when STAMINA reaches 0.
    pub fn take_damage(&mut self, amount: i32) {
        self.stamina.adjust(amount.saturating_neg());
        if self.stamina.is_empty() {
            self.status = EncounterStatus::Defeated;
        }
    }

    /// Re-clamp SKILL and STAMINA.
    pub fn enforce_caps(&mut self) {
        self.skill = self.skill.clamp(SKILL_RANGE.0, SKILL_RANGE.1);
        self.stamina = Gauge::with_current(
            self.stamina.initial.clamp(1, MAX_STAMINA),
            self.stamina.current,
        );
    }
}

impl std::fmt::Display for Encounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | SKILL {} | STAMINA {} | Status: {}",
            self.name, self.skill, self.stamina, self.status
        )
    }
}

/// Truncate a finite float toward zero, saturating at the `i32` range.
///
/// Encounter creation and snapshot repair both read numbers this way.
pub fn truncate(value: f64) -> i32 {
    value.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// All encounters of the adventure, newest first, plus the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterRegistry {
    /// Encounters, most recently added first.
    pub encounters: Vec<Encounter>,
    /// The encounter combat rounds are fought against.
    pub active_encounter_id: Option<EncounterId>,
}

impl EncounterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an encounter and make it active. Returns its id.
    pub fn add(&mut self, encounter: Encounter) -> EncounterId {
        let id = encounter.id.clone();
        self.encounters.insert(0, encounter);
        self.active_encounter_id = Some(id.clone());
        id
    }

    /// Look up an encounter by id.
    pub fn get(&self, id: &EncounterId) -> Option<&Encounter> {
        self.encounters.iter().find(|e| &e.id == id)
    }

    /// Look up an encounter by id, mutably.
    pub fn get_mut(&mut self, id: &EncounterId) -> Option<&mut Encounter> {
        self.encounters.iter_mut().find(|e| &e.id == id)
    }

    fn require_mut(&mut self, id: &EncounterId) -> RuleResult<&mut Encounter> {
        self.encounters
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| RuleError::EncounterNotFound(id.clone()))
    }

    /// The active encounter. A dangling active id counts as none.
    pub fn active(&self) -> Option<&Encounter> {
        self.active_encounter_id.as_ref().and_then(|id| self.get(id))
    }

    /// Make an existing encounter the active one.
    pub fn set_active(&mut self, id: &EncounterId) -> RuleResult<()> {
        if self.get(id).is_none() {
            return Err(RuleError::EncounterNotFound(id.clone()));
        }
        self.active_encounter_id = Some(id.clone());
        Ok(())
    }

    /// Damage an encounter. Returns its STAMINA afterwards.
    pub fn damage(&mut self, id: &EncounterId, amount: i32) -> RuleResult<Gauge> {
        let encounter = self.require_mut(id)?;
        encounter.take_damage(amount);
        Ok(encounter.stamina)
    }

    /// Remove an encounter, clearing the active id if it pointed there.
    pub fn remove(&mut self, id: &EncounterId) -> RuleResult<Encounter> {
        let index = self
            .encounters
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| RuleError::EncounterNotFound(id.clone()))?;
        if self.active_encounter_id.as_ref() == Some(id) {
            self.active_encounter_id = None;
        }
        Ok(self.encounters.remove(index))
    }

    /// Flip between escaped and active. Returns the new status.
    ///
    /// Anything not escaped becomes escaped, so a defeated encounter is
    /// marked escaped and its defeat is lost.
    pub fn toggle_escaped(&mut self, id: &EncounterId) -> RuleResult<EncounterStatus> {
        let encounter = self.require_mut(id)?;
        encounter.status = match encounter.status {
            EncounterStatus::Escaped => EncounterStatus::Active,
            EncounterStatus::Active | EncounterStatus::Defeated => EncounterStatus::Escaped,
        };
        Ok(encounter.status)
    }

    /// Resolve a user reference: a 1-based list position or an id prefix.
    pub fn resolve(&self, reference: &str) -> Option<EncounterId> {
        let reference = reference.trim();
        if let Ok(position) = reference.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|i| self.encounters.get(i))
                .map(|e| e.id.clone());
        }
        if reference.is_empty() {
            return None;
        }
        let mut matches = self.encounters.iter().filter(|e| e.id.0.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(e), None) => Some(e.id.clone()),
            _ => None,
        }
    }

    /// Re-clamp every encounter and drop a dangling active id.
    pub fn enforce_caps(&mut self) {
        for encounter in &mut self.encounters {
            encounter.enforce_caps();
        }
        if self.active().is_none() {
            self.active_encounter_id = None;
        }
    }

    /// Iterate encounters, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Encounter> {
        self.encounters.iter()
    }

    /// Number of encounters.
    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }
}
