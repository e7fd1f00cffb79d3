//! The adventurer's character sheet: stats, provisions, gold, inventory,
//! and the adventure's single potion.

pub mod stat;

pub use stat::{Gauge, Stat};

use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};

/// Upper bound for provisions.
pub const MAX_PROVISIONS: i32 = 999;
/// Upper bound for gold.
pub const MAX_GOLD: i32 = 999_999;
/// Provisions carried at the start of an adventure.
pub const STARTING_PROVISIONS: i32 = 10;

/// One of the three core stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Fighting ability.
    Skill,
    /// Health and endurance.
    Stamina,
    /// Fortune, spent when tested.
    Luck,
}

impl StatKind {
    /// All stats in sheet order.
    pub const ALL: [Self; 3] = [Self::Skill, Self::Stamina, Self::Luck];

    /// Parse a stat name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "skill" => Some(Self::Skill),
            "stamina" => Some(Self::Stamina),
            "luck" => Some(Self::Luck),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skill => write!(f, "SKILL"),
            Self::Stamina => write!(f, "STAMINA"),
            Self::Luck => write!(f, "LUCK"),
        }
    }
}

/// Which potion the adventurer set out with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotionChoice {
    /// No potion chosen yet.
    #[default]
    None,
    /// Restores SKILL to its initial value.
    Skill,
    /// Restores STAMINA to its initial value.
    Strength,
    /// Raises initial LUCK by one and restores LUCK.
    Fortune,
}

impl PotionChoice {
    /// Parse a potion name as stored in snapshots (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "skill" => Some(Self::Skill),
            "strength" => Some(Self::Strength),
            "fortune" => Some(Self::Fortune),
            _ => None,
        }
    }
}

impl std::str::FromStr for PotionChoice {
    type Err = RuleError;

    fn from_str(s: &str) -> RuleResult<Self> {
        Self::parse(s).ok_or_else(|| {
            RuleError::InvalidInput(format!(
                "unknown potion '{s}', use: none, skill, strength, fortune"
            ))
        })
    }
}

impl std::fmt::Display for PotionChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Skill => write!(f, "Potion of Skill"),
            Self::Strength => write!(f, "Potion of Strength"),
            Self::Fortune => write!(f, "Potion of Fortune"),
        }
    }
}

/// The adventure's potion and whether it has been drunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potion {
    /// Chosen potion.
    pub choice: PotionChoice,
    /// True once drunk; one potion per adventure.
    pub used: bool,
}

/// Which inventory list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemList {
    /// Weapons, armour, and other carried gear.
    Equipment,
    /// Jewels, keys, and other valuables.
    Treasure,
}

impl ItemList {
    /// Parse a list name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equipment" | "gear" => Some(Self::Equipment),
            "treasure" => Some(Self::Treasure),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equipment => write!(f, "equipment"),
            Self::Treasure => write!(f, "treasure"),
        }
    }
}

/// The adventurer's mechanical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Adventurer name, may be empty.
    pub name: String,
    /// SKILL stat.
    pub skill: Stat,
    /// STAMINA stat.
    pub stamina: Stat,
    /// LUCK stat.
    pub luck: Stat,
    /// Meals carried, in `[0, 999]`.
    pub provisions: i32,
    /// Gold pieces, in `[0, 999999]`.
    pub gold: i32,
    /// Carried gear in insertion order. Duplicates allowed.
    pub equipment: Vec<String>,
    /// Valuables in insertion order. Duplicates allowed.
    pub treasure: Vec<String>,
    /// The adventure's potion.
    pub potion: Potion,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self {
            name: String::new(),
            skill: Stat::default(),
            stamina: Stat::default(),
            luck: Stat::default(),
            provisions: STARTING_PROVISIONS,
            gold: 0,
            equipment: Vec::new(),
            treasure: Vec::new(),
            potion: Potion::default(),
        }
    }
}

impl CharacterSheet {
    /// A fresh, unrolled sheet for the named adventurer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ..Self::default()
        }
    }

    /// True once SKILL, STAMINA and LUCK have all been rolled.
    pub fn stats_rolled(&self) -> bool {
        StatKind::ALL.iter().all(|&k| self.stat(k).is_rolled())
    }

    /// Fail with [`RuleError::StatsNotRolled`] unless all stats are rolled.
    pub fn require_rolled(&self) -> RuleResult<()> {
        if self.stats_rolled() {
            Ok(())
        } else {
            Err(RuleError::StatsNotRolled)
        }
    }

    /// A stat by kind.
    pub fn stat(&self, kind: StatKind) -> &Stat {
        match kind {
            StatKind::Skill => &self.skill,
            StatKind::Stamina => &self.stamina,
            StatKind::Luck => &self.luck,
        }
    }

    /// A mutable stat by kind.
    pub fn stat_mut(&mut self, kind: StatKind) -> &mut Stat {
        match kind {
            StatKind::Skill => &mut self.skill,
            StatKind::Stamina => &mut self.stamina,
            StatKind::Luck => &mut self.luck,
        }
    }

    /// An inventory list by kind.
    pub fn items(&self, list: ItemList) -> &[String] {
        match list {
            ItemList::Equipment => &self.equipment,
            ItemList::Treasure => &self.treasure,
        }
    }

    /// A mutable inventory list by kind.
    pub fn items_mut(&mut self, list: ItemList) -> &mut Vec<String> {
        match list {
            ItemList::Equipment => &mut self.equipment,
            ItemList::Treasure => &mut self.treasure,
        }
    }

    /// Re-clamp every bounded field. Applying it twice changes nothing.
    pub fn enforce_caps(&mut self) {
        for kind in StatKind::ALL {
            self.stat_mut(kind).enforce_cap();
        }
        self.provisions = self.provisions.clamp(0, MAX_PROVISIONS);
        self.gold = self.gold.clamp(0, MAX_GOLD);
    }
}
