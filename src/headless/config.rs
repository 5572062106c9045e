//! Headless bout configuration
//!
//! JSON-loaded settings for running a bout without a window: the seed, round
//! structure, an optional scripted sequence of player intents, and where to
//! write the resulting combat log.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sim::components::BoutConfig;
use crate::sim::input::PlayerIntent;

/// One scripted player input, fired when simulated time reaches `at_ms`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptedIntent {
    pub at_ms: u64,
    pub intent: PlayerIntent,
}

/// Configuration for a headless bout, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessBoutConfig {
    /// Random seed for deterministic simulation. None = entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Rounds in the match (best-of-N, must be odd).
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Length of each round in seconds.
    #[serde(default = "default_round_time_secs")]
    pub round_time_secs: u64,

    /// Hard cap on simulated seconds before the run is cut off.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    /// Scripted player intents, in any order; they are fired by timestamp.
    #[serde(default)]
    pub script: Vec<ScriptedIntent>,

    /// Where to write the combat log JSON. None = "bout_log.json".
    #[serde(default)]
    pub output_path: Option<String>,

    /// Optional RON file overriding the builtin action frame tables.
    #[serde(default)]
    pub actions_config: Option<String>,
}

fn default_rounds() -> u32 {
    3
}

fn default_round_time_secs() -> u64 {
    90
}

fn default_max_duration_secs() -> u64 {
    600
}

impl Default for HeadlessBoutConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            rounds: default_rounds(),
            round_time_secs: default_round_time_secs(),
            max_duration_secs: default_max_duration_secs(),
            script: Vec::new(),
            output_path: None,
            actions_config: None,
        }
    }
}

impl HeadlessBoutConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.rounds == 0 || self.rounds % 2 == 0 {
            return Err(format!(
                "rounds must be an odd positive number, got {}",
                self.rounds
            ));
        }
        if self.round_time_secs == 0 {
            return Err("round_time_secs must be positive".to_string());
        }
        if self.max_duration_secs == 0 {
            return Err("max_duration_secs must be positive".to_string());
        }
        Ok(())
    }

    /// Build the simulation-level bout configuration from these settings.
    pub fn to_bout_config(&self) -> BoutConfig {
        BoutConfig {
            rounds: self.rounds,
            round_time_ms: self.round_time_secs * 1000,
            ..BoutConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HeadlessBoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rounds, 3);
        assert_eq!(config.to_bout_config().round_time_ms, 90_000);
    }

    #[test]
    fn test_even_round_count_rejected() {
        let config = HeadlessBoutConfig {
            rounds: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_json_parses_with_defaults() {
        let config: HeadlessBoutConfig = serde_json::from_str(r#"{"random_seed": 42}"#)
            .expect("parse");
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.rounds, 3);
        assert!(config.script.is_empty());
    }

    #[test]
    fn test_scripted_intents_parse() {
        let config: HeadlessBoutConfig = serde_json::from_str(
            r#"{
                "script": [
                    {"at_ms": 0, "intent": "MoveRight"},
                    {"at_ms": 5000, "intent": "Punch"}
                ]
            }"#,
        )
        .expect("parse");
        assert_eq!(config.script.len(), 2);
        assert_eq!(config.script[1].intent, PlayerIntent::Punch);
    }
}
