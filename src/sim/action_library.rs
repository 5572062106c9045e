//! Data-Driven Action Frame Tables
//!
//! Each `(FighterKind, Action)` pair owns an `ActionSpec`: how many frames the
//! animation has, how many ticks pass between frame advances, the sprite box
//! used for collision, and what happens when the last frame is reached.
//!
//! The builtin tables match the shipped sprite sheets. A RON file with the
//! same shape (see `assets/config/actions.ron`) can override them, keeping
//! timing and hitbox tuning out of the compiled binary.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::components::{Action, FighterKind};

/// What happens when an animation reaches its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalPolicy {
    /// Wrap around forever (stance, walk).
    Loop,
    /// Reset to frame zero, return to idle, clear the movement lock. This
    /// index-to-zero-plus-action-change transition is the completion signal
    /// other systems key off.
    OnceToIdle,
    /// Advance to the last frame and hold it (duck).
    HoldLast,
}

/// Frame table entry for one action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Number of frames in the sheet row.
    pub frames: usize,
    /// Ticks per frame advance (the animation's frame-rate divisor).
    pub divisor: u32,
    /// Sprite box used for collision geometry. Width varies by action — a
    /// punch silhouette is wider than a stance.
    pub width: f32,
    pub height: f32,
    pub terminal: TerminalPolicy,
}

impl ActionSpec {
    /// Ticks from frame zero to the terminal transition.
    pub fn ticks_to_complete(&self) -> u64 {
        self.frames as u64 * self.divisor as u64
    }
}

/// Fallback used when a table is missing an entry: hold a stance-sized box on
/// frame zero rather than crash (degraded-asset policy).
const FALLBACK_SPEC: ActionSpec = ActionSpec {
    frames: 1,
    divisor: 8,
    width: 133.0,
    height: 290.0,
    terminal: TerminalPolicy::HoldLast,
};

/// On-disk shape of the action tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    pub ronin: HashMap<Action, ActionSpec>,
    pub bruiser: HashMap<Action, ActionSpec>,
}

/// Resource holding the loaded frame tables.
#[derive(Resource)]
pub struct ActionLibrary {
    tables: HashMap<FighterKind, HashMap<Action, ActionSpec>>,
}

impl Default for ActionLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ActionLibrary {
    /// The compiled-in tables, matching the shipped sprite sheets.
    pub fn builtin() -> Self {
        let mut tables = HashMap::new();
        tables.insert(FighterKind::Ronin, ronin_table());
        tables.insert(FighterKind::Bruiser, bruiser_table());
        Self { tables }
    }

    /// Load tables from a RON file, validating every entry.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read actions config: {}", e))?;
        Self::load_from_str(&contents)
    }

    pub fn load_from_str(contents: &str) -> Result<Self, String> {
        let config: ActionsConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse actions RON: {}", e))?;

        let mut tables = HashMap::new();
        tables.insert(FighterKind::Ronin, config.ronin);
        tables.insert(FighterKind::Bruiser, config.bruiser);
        let library = Self { tables };
        library.validate()?;
        Ok(library)
    }

    fn validate(&self) -> Result<(), String> {
        for (kind, table) in &self.tables {
            for (action, spec) in table {
                if spec.frames == 0 {
                    return Err(format!("{:?}/{:?} has zero frames", kind, action));
                }
                if spec.divisor == 0 {
                    return Err(format!("{:?}/{:?} has zero divisor", kind, action));
                }
                if spec.width <= 0.0 || spec.height <= 0.0 {
                    return Err(format!("{:?}/{:?} has a degenerate sprite box", kind, action));
                }
            }
        }
        Ok(())
    }

    /// Look up the spec for a fighter's action. A missing entry degrades to a
    /// held stance frame with a warning rather than failing the simulation.
    pub fn spec(&self, kind: FighterKind, action: Action) -> ActionSpec {
        match self.tables.get(&kind).and_then(|t| t.get(&action)) {
            Some(spec) => *spec,
            None => {
                warn!(
                    "No frame data for {:?}/{:?}; holding fallback stance frame",
                    kind, action
                );
                FALLBACK_SPEC
            }
        }
    }
}

fn spec(
    frames: usize,
    divisor: u32,
    width: f32,
    height: f32,
    terminal: TerminalPolicy,
) -> ActionSpec {
    ActionSpec {
        frames,
        divisor,
        width,
        height,
        terminal,
    }
}

fn ronin_table() -> HashMap<Action, ActionSpec> {
    use Action::*;
    use TerminalPolicy::*;
    HashMap::from([
        (Stance, spec(8, 7, 133.0, 290.0, Loop)),
        (Walk, spec(12, 7, 132.0, 300.0, Loop)),
        (Duck, spec(3, 6, 133.0, 200.0, HoldLast)),
        (GetUp, spec(2, 6, 145.0, 290.0, OnceToIdle)),
        (JumpVertical, spec(6, 10, 133.0, 290.0, OnceToIdle)),
        (JumpDirectional, spec(6, 10, 133.0, 290.0, OnceToIdle)),
        (Punch, spec(3, 8, 183.0, 290.0, OnceToIdle)),
        (DoublePunch, spec(6, 8, 183.0, 290.0, OnceToIdle)),
        (Kick, spec(8, 5, 185.0, 290.0, OnceToIdle)),
        (UnderKick, spec(6, 6, 185.0, 200.0, OnceToIdle)),
        (Hit, spec(3, 8, 183.0, 290.0, OnceToIdle)),
        (Fall, spec(7, 8, 183.0, 290.0, OnceToIdle)),
    ])
}

fn bruiser_table() -> HashMap<Action, ActionSpec> {
    use Action::*;
    use TerminalPolicy::*;
    HashMap::from([
        (Stance, spec(7, 6, 133.0, 290.0, Loop)),
        (Walk, spec(9, 6, 135.0, 290.0, Loop)),
        (Duck, spec(3, 6, 133.0, 200.0, HoldLast)),
        (GetUp, spec(2, 6, 145.0, 290.0, OnceToIdle)),
        (JumpVertical, spec(6, 10, 133.0, 290.0, OnceToIdle)),
        (JumpDirectional, spec(6, 10, 133.0, 290.0, OnceToIdle)),
        (Punch, spec(3, 8, 183.0, 290.0, OnceToIdle)),
        (DoublePunch, spec(7, 8, 183.0, 290.0, OnceToIdle)),
        (Kick, spec(6, 8, 190.0, 290.0, OnceToIdle)),
        (UnderKick, spec(6, 6, 190.0, 200.0, OnceToIdle)),
        (Hit, spec(3, 6, 133.0, 290.0, OnceToIdle)),
        (Fall, spec(7, 6, 195.0, 290.0, OnceToIdle)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_cover_every_action() {
        let lib = ActionLibrary::builtin();
        let all = [
            Action::Stance,
            Action::Walk,
            Action::Duck,
            Action::GetUp,
            Action::JumpVertical,
            Action::JumpDirectional,
            Action::Punch,
            Action::DoublePunch,
            Action::Kick,
            Action::UnderKick,
            Action::Hit,
            Action::Fall,
        ];
        for kind in [FighterKind::Ronin, FighterKind::Bruiser] {
            for action in all {
                let spec = lib.spec(kind, action);
                assert!(spec.frames > 0, "{:?}/{:?}", kind, action);
                assert!(spec.divisor > 0, "{:?}/{:?}", kind, action);
            }
        }
    }

    #[test]
    fn test_attack_boxes_are_wider_than_stance() {
        let lib = ActionLibrary::builtin();
        for kind in [FighterKind::Ronin, FighterKind::Bruiser] {
            let stance = lib.spec(kind, Action::Stance);
            let punch = lib.spec(kind, Action::Punch);
            let kick = lib.spec(kind, Action::Kick);
            assert!(punch.width > stance.width);
            assert!(kick.width > stance.width);
        }
    }

    #[test]
    fn test_loop_and_oneshot_policies() {
        let lib = ActionLibrary::builtin();
        assert_eq!(
            lib.spec(FighterKind::Ronin, Action::Stance).terminal,
            TerminalPolicy::Loop
        );
        assert_eq!(
            lib.spec(FighterKind::Ronin, Action::Punch).terminal,
            TerminalPolicy::OnceToIdle
        );
        assert_eq!(
            lib.spec(FighterKind::Ronin, Action::Duck).terminal,
            TerminalPolicy::HoldLast
        );
    }

    #[test]
    fn test_missing_entry_degrades_to_fallback() {
        let lib = ActionLibrary {
            tables: HashMap::new(),
        };
        let spec = lib.spec(FighterKind::Ronin, Action::Punch);
        assert_eq!(spec.frames, 1);
        assert_eq!(spec.terminal, TerminalPolicy::HoldLast);
    }

    #[test]
    fn test_ron_round_trip() {
        let lib = ActionLibrary::builtin();
        let config = ActionsConfig {
            ronin: lib.tables[&FighterKind::Ronin].clone(),
            bruiser: lib.tables[&FighterKind::Bruiser].clone(),
        };
        let text = ron::ser::to_string(&config).expect("serialize");
        let parsed = ActionLibrary::load_from_str(&text).expect("parse");
        assert_eq!(
            parsed.spec(FighterKind::Bruiser, Action::Kick),
            lib.spec(FighterKind::Bruiser, Action::Kick)
        );
    }

    #[test]
    fn test_zero_frames_rejected() {
        let text = r#"(
            ronin: { Stance: (frames: 0, divisor: 7, width: 133.0, height: 290.0, terminal: Loop) },
            bruiser: {},
        )"#;
        assert!(ActionLibrary::load_from_str(text).is_err());
    }
}
