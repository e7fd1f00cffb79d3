//! The event log: readable, timestamped records of luck tests, combat
//! rounds and dice rolls, newest first.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Entries kept per channel. Older entries fall off the end.
pub const LOG_CAPACITY: usize = 200;

/// One channel of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Stat rolls, luck tests, provisions and potions.
    Luck,
    /// Combat rounds.
    Combat,
    /// Freeform dice rolls.
    Dice,
}

impl LogKind {
    /// All channels.
    pub const ALL: [Self; 3] = [Self::Luck, Self::Combat, Self::Dice];

    /// How many entries a reader shows at once.
    pub fn display_window(self) -> usize {
        match self {
            Self::Luck => 12,
            Self::Combat => 14,
            Self::Dice => 10,
        }
    }

    /// Text shown when the channel is empty.
    pub fn empty_message(self) -> &'static str {
        match self {
            Self::Luck => "No luck tests yet.",
            Self::Combat => "No combat rounds yet.",
            Self::Dice => "No rolls yet.",
        }
    }

    /// Parse a channel name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "luck" => Some(Self::Luck),
            "combat" | "fight" => Some(Self::Combat),
            "dice" | "roll" | "rolls" => Some(Self::Dice),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Luck => write!(f, "luck"),
            Self::Combat => write!(f, "combat"),
            Self::Dice => write!(f, "dice"),
        }
    }
}

/// Three independent channels of timestamped lines, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// Luck channel.
    pub luck: Vec<String>,
    /// Combat channel.
    pub combat: Vec<String>,
    /// Dice channel.
    pub dice: Vec<String>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a message stamped with the local time.
    pub fn record(&mut self, kind: LogKind, message: impl AsRef<str>) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let entries = self.channel_mut(kind);
        entries.insert(0, format!("[{stamp}] {}", message.as_ref()));
        entries.truncate(LOG_CAPACITY);
    }

    /// Every stored entry of a channel, newest first.
    pub fn entries(&self, kind: LogKind) -> &[String] {
        match kind {
            LogKind::Luck => &self.luck,
            LogKind::Combat => &self.combat,
            LogKind::Dice => &self.dice,
        }
    }

    /// The newest entries of a channel, limited to its display window.
    pub fn recent(&self, kind: LogKind) -> &[String] {
        let entries = self.entries(kind);
        &entries[..entries.len().min(kind.display_window())]
    }

    /// The newest entry of a channel.
    pub fn latest(&self, kind: LogKind) -> Option<&str> {
        self.entries(kind).first().map(String::as_str)
    }

    /// Empty one channel.
    pub fn clear(&mut self, kind: LogKind) {
        self.channel_mut(kind).clear();
    }

    /// Drop entries beyond the capacity of each channel.
    pub fn enforce_caps(&mut self) {
        for kind in LogKind::ALL {
            self.channel_mut(kind).truncate(LOG_CAPACITY);
        }
    }

    /// Render a channel's display window as plain text.
    pub fn render(&self, kind: LogKind) -> String {
        let recent = self.recent(kind);
        if recent.is_empty() {
            kind.empty_message().to_string()
        } else {
            recent.join("\n")
        }
    }

    fn channel_mut(&mut self, kind: LogKind) -> &mut Vec<String> {
        match kind {
            LogKind::Luck => &mut self.luck,
            LogKind::Combat => &mut self.combat,
            LogKind::Dice => &mut self.dice,
        }
    }
}
