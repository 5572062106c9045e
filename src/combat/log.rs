//! Combat logging
//!
//! Records all bout events for display and post-bout analysis, and saves the
//! finished log (plus bout metadata) as JSON.

use bevy::prelude::*;
use serde::Serialize;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in simulated milliseconds since bout start
    pub timestamp_ms: u64,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// A punch-class hit connected
    Hit,
    /// A kick-class hit connected (knockdown)
    Knockdown,
    /// A hit was blocked
    Block,
    /// Round started/ended
    Round,
    /// Match-level event (start, end, restart)
    Match,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
}

impl CombatLog {
    /// Clear the log for a new bout
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add a new entry to the log
    pub fn log(&mut self, timestamp_ms: u64, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp_ms,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only entries where health changed (hits and knockdowns, blocked or not)
    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    CombatLogEventType::Hit
                        | CombatLogEventType::Knockdown
                        | CombatLogEventType::Block
                )
            })
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Number of connecting hits landed by the named side (blocked hits count:
    /// chip damage still changed health). Block entries lead with the
    /// defender's name, so the attacker is matched by the possessive instead.
    pub fn hits_landed_by(&self, side_name: &str) -> usize {
        let subject = format!("{} ", side_name);
        let possessive = format!("{}'s", side_name);
        self.hp_changes_only()
            .iter()
            .filter(|e| match e.event_type {
                CombatLogEventType::Block => e.message.contains(&possessive),
                _ => e.message.starts_with(&subject),
            })
            .count()
    }

    /// Save the combat log to a JSON file. Returns the filename written.
    pub fn save_to_file(
        &self,
        metadata: &BoutMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let filename = output_path.unwrap_or("bout_log.json").to_string();

        let saved = SavedLog {
            metadata,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(&filename, json)
            .map_err(|e| format!("Failed to write {}: {}", filename, e))?;

        Ok(filename)
    }
}

/// Bout-level metadata stored alongside the log entries.
#[derive(Debug, Clone, Serialize)]
pub struct BoutMetadata {
    /// Winning side name, or None if the bout was cut off before a result
    pub winner: Option<String>,
    pub rounds_played: u32,
    pub player: FighterMetadata,
    pub villain: FighterMetadata,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Final per-fighter statistics.
#[derive(Debug, Clone, Serialize)]
pub struct FighterMetadata {
    pub name: String,
    pub final_health: i32,
    pub round_wins: u32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

#[derive(Serialize)]
struct SavedLog<'a> {
    metadata: &'a BoutMetadata,
    entries: &'a [CombatLogEntry],
}
