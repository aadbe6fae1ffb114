//! Pool configuration (TOML)
//!
//! Every field has a default, so an empty file (or no file at all) yields a usable pool.
//!
//! ```toml
//! max_capacity = 48
//! default_capacity = 16
//! exhaustion = "steal_oldest"
//! seed = 1234
//!
//! [defaults]
//! volume = 0.8
//! rolloff = "linear"
//!
//! [[debounces]]
//! name = "door_slam"
//! id = 100
//! duration = 0.75
//! ```

use std::path::Path;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::debounce::{Debounce, DebounceCatalog};
use crate::error::{SfxError, SfxResult};
use crate::params::VoiceParams;

/// What `play` does when every voice is pending or active and the pool is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Fail with [`SfxError::PoolExhausted`]
    #[default]
    Reject,
    /// Force-release the oldest playing voice (or the oldest pending one when
    /// nothing is playing yet) and reuse it
    StealOldest,
}

/// Named cooldown declared in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebounceEntry {
    pub name: String,
    pub id: u32,
    pub duration: f64,
}

/// Sound pool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Hard cap on voices ever alive at once (default: 32)
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
    /// Voices created up front (default: 8, clamped to `max_capacity`)
    #[serde(default = "default_default_capacity")]
    pub default_capacity: usize,
    /// Behavior at capacity (default: reject)
    #[serde(default)]
    pub exhaustion: ExhaustionPolicy,
    /// Seed for random clip selection; `None` seeds from OS entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Parameters every voice is reset to when acquired
    #[serde(default)]
    pub defaults: VoiceParams,
    /// Extra named cooldowns, layered over the built-in ones
    #[serde(default)]
    pub debounces: Vec<DebounceEntry>,
}

fn default_max_capacity() -> usize {
    32
}
fn default_default_capacity() -> usize {
    8
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            default_capacity: default_default_capacity(),
            exhaustion: ExhaustionPolicy::default(),
            seed: None,
            defaults: VoiceParams::default(),
            debounces: Vec::new(),
        }
    }
}

impl PoolConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> SfxResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a config file
    ///
    /// # Errors
    ///
    /// Returns [`SfxError::ConfigIo`] if the file cannot be read and
    /// [`SfxError::ConfigParse`] if it is not a valid config.
    pub fn load(path: impl AsRef<Path>) -> SfxResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SfxError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Number of voices to pre-warm, never above the hard cap
    pub fn prewarm_count(&self) -> usize {
        self.default_capacity.min(self.max_capacity)
    }

    /// Built-in cooldowns plus the ones declared in this config
    ///
    /// Config entries replace built-ins of the same name.
    pub fn debounce_catalog(&self) -> DebounceCatalog {
        let mut catalog = DebounceCatalog::builtin();
        for entry in &self.debounces {
            catalog.insert(entry.name.clone(), Debounce::new(entry.id, entry.duration));
        }
        catalog
    }

    /// Check the config for suspicious values.
    ///
    /// Returns a list of warning messages; an empty list means the config is sane.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.max_capacity == 0 {
            warnings.push("max_capacity is 0, every play will hit the exhaustion policy".into());
        }
        if self.default_capacity > self.max_capacity {
            warnings.push(format!(
                "default_capacity {} exceeds max_capacity {}, only {} voices will be pre-warmed",
                self.default_capacity, self.max_capacity, self.max_capacity
            ));
        }

        let mut names: HashSet<&str> = HashSet::new();
        let mut ids: HashSet<u32> = HashSet::new();
        for entry in &self.debounces {
            if !names.insert(entry.name.as_str()) {
                warnings.push(format!("debounce '{}' is declared twice", entry.name));
            }
            if !ids.insert(entry.id) {
                warnings.push(format!(
                    "debounce '{}' reuses id {} and will share its cooldown",
                    entry.name, entry.id
                ));
            }
            if entry.duration.is_nan() || entry.duration < 0.0 {
                warnings.push(format!(
                    "debounce '{}' has invalid duration {}",
                    entry.name, entry.duration
                ));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::debounces;
    use crate::params::Rolloff;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.max_capacity, 32);
        assert_eq!(config.default_capacity, 8);
        assert_eq!(config.exhaustion, ExhaustionPolicy::Reject);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PoolConfig::from_toml_str("").unwrap();
        assert_eq!(config, PoolConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
            max_capacity = 4
            default_capacity = 2
            exhaustion = "steal_oldest"
            seed = 99

            [defaults]
            volume = 0.25
            rolloff = "linear"
            output = 3

            [[debounces]]
            name = "door_slam"
            id = 100
            duration = 0.75
        "#;
        let config = PoolConfig::from_toml_str(text).unwrap();
        assert_eq!(config.max_capacity, 4);
        assert_eq!(config.prewarm_count(), 2);
        assert_eq!(config.exhaustion, ExhaustionPolicy::StealOldest);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.defaults.volume, 0.25);
        assert_eq!(config.defaults.rolloff, Rolloff::Linear);
        assert_eq!(config.defaults.output.map(|bus| bus.0), Some(3));

        let catalog = config.debounce_catalog();
        assert_eq!(catalog.get("door_slam"), Some(Debounce::new(100, 0.75)));
        assert_eq!(catalog.get("foot_scuff"), Some(debounces::FOOT_SCUFF));
    }

    #[test]
    fn test_config_entry_overrides_builtin() {
        let config = PoolConfig {
            debounces: vec![DebounceEntry {
                name: "foot_scuff".into(),
                id: 1,
                duration: 0.2,
            }],
            ..Default::default()
        };
        assert_eq!(
            config.debounce_catalog().get("foot_scuff"),
            Some(Debounce::new(1, 0.2))
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = PoolConfig::from_toml_str("max_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, SfxError::ConfigParse(_)));
    }

    #[test]
    fn test_prewarm_clamped() {
        let config = PoolConfig {
            max_capacity: 3,
            default_capacity: 10,
            ..Default::default()
        };
        assert_eq!(config.prewarm_count(), 3);
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_validate_debounce_conflicts() {
        let config = PoolConfig {
            debounces: vec![
                DebounceEntry {
                    name: "a".into(),
                    id: 10,
                    duration: 0.1,
                },
                DebounceEntry {
                    name: "a".into(),
                    id: 10,
                    duration: -1.0,
                },
            ],
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("declared twice")));
        assert!(warnings.iter().any(|w| w.contains("reuses id 10")));
        assert!(warnings.iter().any(|w| w.contains("invalid duration")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_capacity = 6").unwrap();
        let config = PoolConfig::load(file.path()).unwrap();
        assert_eq!(config.max_capacity, 6);
        assert_eq!(config.default_capacity, 8);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PoolConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, SfxError::ConfigIo { .. }));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PoolConfig {
            max_capacity: 12,
            exhaustion: ExhaustionPolicy::StealOldest,
            seed: Some(5),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(PoolConfig::from_toml_str(&text).unwrap(), config);
    }
}
