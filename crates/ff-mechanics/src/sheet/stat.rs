//! Rolled stats and bounded gauges.
//!
//! A [`Gauge`] is a current value clamped to `[0, initial]`. A [`Stat`] is a
//! player stat that stays unrolled (both fields null) until the adventure's
//! initial roll, after which it behaves like a gauge.

use serde::{Deserialize, Serialize};

/// A value that fluctuates between 0 and a fixed ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gauge {
    /// Ceiling for `current`.
    pub initial: i32,
    /// Current value, always in `[0, initial]`.
    pub current: i32,
}

impl Gauge {
    /// Create a gauge starting full.
    pub fn new(initial: i32) -> Self {
        let initial = initial.max(0);
        Self {
            initial,
            current: initial,
        }
    }

    /// Create a gauge with an explicit starting value, clamped to bounds.
    pub fn with_current(initial: i32, current: i32) -> Self {
        let initial = initial.max(0);
        Self {
            initial,
            current: current.clamp(0, initial),
        }
    }

    /// Adjust by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self.current.saturating_add(delta).clamp(0, self.initial);
        self.current
    }

    /// Returns true if the gauge is at zero.
    pub fn is_empty(&self) -> bool {
        self.current <= 0
    }

    /// Returns true if the gauge is at its ceiling.
    pub fn is_full(&self) -> bool {
        self.current >= self.initial
    }
}

impl std::fmt::Display for Gauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.initial)
    }
}

/// A player stat: unrolled until the initial roll, then a [`Gauge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Rolled ceiling, or `None` before the initial roll.
    pub initial: Option<i32>,
    /// Current value, or `None` before the initial roll.
    pub current: Option<i32>,
}

impl Stat {
    /// A freshly rolled stat with `current == initial`.
    pub fn rolled(initial: i32) -> Self {
        Self::from(Gauge::new(initial))
    }

    /// Returns true once both fields are set.
    pub fn is_rolled(&self) -> bool {
        self.initial.is_some() && self.current.is_some()
    }

    /// The stat as a gauge, if rolled.
    pub fn gauge(&self) -> Option<Gauge> {
        match (self.initial, self.current) {
            (Some(initial), Some(current)) => Some(Gauge::with_current(initial, current)),
            _ => None,
        }
    }

    /// Current value, or 0 while unrolled.
    pub fn current_or_zero(&self) -> i32 {
        self.current.unwrap_or(0)
    }

    /// Adjust the current value, clamped to `[0, initial]`.
    ///
    /// Returns the new value, or `None` if the stat is unrolled.
    pub fn adjust(&mut self, delta: i32) -> Option<i32> {
        let mut gauge = self.gauge()?;
        let value = gauge.adjust(delta);
        *self = gauge.into();
        Some(value)
    }

    /// Set `current` back to `initial`. No-op while unrolled.
    pub fn restore(&mut self) {
        if let Some(mut gauge) = self.gauge() {
            gauge.current = gauge.initial;
            *self = gauge.into();
        }
    }

    /// Re-clamp `current` into `[0, initial]` when both are set.
    pub fn enforce_cap(&mut self) {
        if let Some(gauge) = self.gauge() {
            *self = gauge.into();
        }
    }
}

impl From<Gauge> for Stat {
    fn from(gauge: Gauge) -> Self {
        Self {
            initial: Some(gauge.initial),
            current: Some(gauge.current),
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.gauge() {
            Some(gauge) => write!(f, "{gauge}"),
            None => write!(f, "—"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_starts_full() {
        let g = Gauge::new(10);
        assert_eq!(g.current, 10);
        assert!(g.is_full());
        assert!(!g.is_empty());
    }

    #[test]
    fn gauge_adjust_clamps() {
        let mut g = Gauge::new(5);
        assert_eq!(g.adjust(10), 5);
        assert_eq!(g.adjust(-20), 0);
        assert!(g.is_empty());
        assert_eq!(g.adjust(3), 3);
    }

    #[test]
    fn gauge_with_current_clamps() {
        assert_eq!(Gauge::with_current(8, 100).current, 8);
        assert_eq!(Gauge::with_current(8, -3).current, 0);
    }

    #[test]
    fn unrolled_stat_ignores_adjustments() {
        let mut s = Stat::default();
        assert!(!s.is_rolled());
        assert_eq!(s.adjust(4), None);
        s.restore();
        s.enforce_cap();
        assert_eq!(s, Stat::default());
    }

    #[test]
    fn rolled_stat_adjusts_within_bounds() {
        let mut s = Stat::rolled(12);
        assert_eq!(s.adjust(-5), Some(7));
        assert_eq!(s.adjust(99), Some(12));
        assert_eq!(s.adjust(-99), Some(0));
        s.restore();
        assert_eq!(s.current, Some(12));
    }

    #[test]
    fn enforce_cap_is_fixed_point() {
        let mut s = Stat {
            initial: Some(7),
            current: Some(11),
        };
        s.enforce_cap();
        let once = s;
        s.enforce_cap();
        assert_eq!(s, once);
        assert_eq!(s.current, Some(7));
    }

    #[test]
    fn display() {
        assert_eq!(Stat::rolled(9).to_string(), "9/9");
        assert_eq!(Stat::default().to_string(), "—");
    }

    #[test]
    fn serde_shape_matches_snapshot() {
        let json = serde_json::to_value(Stat::default()).unwrap();
        assert_eq!(json, serde_json::json!({"initial": null, "current": null}));
    }
}
