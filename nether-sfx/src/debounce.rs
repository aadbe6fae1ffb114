//! Debounce cooldowns for grouped sound triggers
//!
//! A [`Debounce`] is a plain `(id, duration)` descriptor. The pool keeps one
//! [`DebounceGate`] that remembers when each id last played and suppresses triggers
//! arriving sooner than `duration` seconds after it.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Named cooldown key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debounce {
    /// Cooldown group; triggers sharing an id share the cooldown
    pub id: u32,
    /// Minimum seconds between two honored triggers
    pub duration: f64,
}

impl Debounce {
    pub const fn new(id: u32, duration: f64) -> Self {
        Self { id, duration }
    }

    /// Same cooldown group with a different duration
    pub const fn with_duration(self, duration: f64) -> Self {
        Self {
            id: self.id,
            duration,
        }
    }
}

/// Built-in pre-tuned cooldowns
pub mod debounces {
    use super::Debounce;

    /// Foot scraping along the ground
    pub const FOOT_SCUFF: Debounce = Debounce::new(1, 0.5);
    /// Projectile hitting a surface
    pub const ARROW_IMPACT: Debounce = Debounce::new(2, 0.1);
    /// Body landing after a fall
    pub const LANDING_THUMP: Debounce = Debounce::new(3, 0.3);
    /// Footstep played on landing
    pub const LANDING_FOOTSTEP: Debounce = Debounce::new(4, 0.3);

    /// Every built-in cooldown with its catalog name
    pub const BUILTIN: [(&str, Debounce); 4] = [
        ("foot_scuff", FOOT_SCUFF),
        ("arrow_impact", ARROW_IMPACT),
        ("landing_thump", LANDING_THUMP),
        ("landing_footstep", LANDING_FOOTSTEP),
    ];
}

/// Lookup table from cooldown name to descriptor
#[derive(Debug, Clone, Default)]
pub struct DebounceCatalog {
    entries: HashMap<String, Debounce>,
}

impl DebounceCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with [`debounces::BUILTIN`]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (name, debounce) in debounces::BUILTIN {
            catalog.insert(name, debounce);
        }
        catalog
    }

    /// Insert or replace a named cooldown
    pub fn insert(&mut self, name: impl Into<String>, debounce: Debounce) -> Option<Debounce> {
        self.entries.insert(name.into(), debounce)
    }

    /// Look up a cooldown by name
    pub fn get(&self, name: &str) -> Option<Debounce> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, descriptor)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Debounce)> {
        self.entries.iter().map(|(name, d)| (name.as_str(), *d))
    }
}

/// Last honored trigger time per cooldown id
#[derive(Debug, Default)]
pub struct DebounceGate {
    last_trigger: HashMap<u32, f64>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trigger at `now` falls inside the cooldown window
    ///
    /// The window is half-open: a trigger exactly `duration` seconds after the
    /// last honored one is allowed.
    pub fn is_suppressed(&self, debounce: Debounce, now: f64) -> bool {
        self.last_trigger
            .get(&debounce.id)
            .is_some_and(|&last| now - last < debounce.duration)
    }

    /// Record an honored trigger
    pub fn record(&mut self, debounce: Debounce, now: f64) {
        self.last_trigger.insert(debounce.id, now);
    }

    /// Time of the last honored trigger for this cooldown group
    pub fn last_trigger(&self, id: u32) -> Option<f64> {
        self.last_trigger.get(&id).copied()
    }

    /// Forget every recorded trigger
    pub fn clear(&mut self) {
        self.last_trigger.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = DebounceCatalog::builtin();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("foot_scuff"), Some(debounces::FOOT_SCUFF));
        assert_eq!(catalog.get("arrow_impact").map(|d| d.duration), Some(0.1));
        assert_eq!(catalog.get("missing"), None);
    }

    #[test]
    fn test_with_duration_keeps_id() {
        let longer = debounces::LANDING_THUMP.with_duration(2.0);
        assert_eq!(longer.id, debounces::LANDING_THUMP.id);
        assert_eq!(longer.duration, 2.0);
    }

    #[test]
    fn test_gate_first_trigger_allowed() {
        let gate = DebounceGate::new();
        assert!(!gate.is_suppressed(debounces::FOOT_SCUFF, 0.0));
    }

    #[test]
    fn test_gate_boundary_is_exclusive() {
        let mut gate = DebounceGate::new();
        let d = Debounce::new(9, 0.5);
        gate.record(d, 0.0);
        assert!(gate.is_suppressed(d, 0.0));
        assert!(gate.is_suppressed(d, 0.5 - 1e-9));
        assert!(!gate.is_suppressed(d, 0.5));
    }

    #[test]
    fn test_gate_ids_are_independent() {
        let mut gate = DebounceGate::new();
        gate.record(debounces::LANDING_THUMP, 1.0);
        assert!(gate.is_suppressed(debounces::LANDING_THUMP, 1.1));
        assert!(!gate.is_suppressed(debounces::LANDING_FOOTSTEP, 1.1));
    }

    #[test]
    fn test_gate_shared_id_uses_caller_duration() {
        let mut gate = DebounceGate::new();
        gate.record(debounces::FOOT_SCUFF, 0.0);
        let short = debounces::FOOT_SCUFF.with_duration(0.1);
        assert!(!gate.is_suppressed(short, 0.2));
        assert!(gate.is_suppressed(debounces::FOOT_SCUFF, 0.2));
    }
}
