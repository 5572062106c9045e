//! The Fight Simulation Core
//!
//! Everything that advances a bout by one fixed 60Hz tick lives here, split
//! into phases that run in a strict order so every tick is deterministic:
//! intents, then movement, then animation, then collision, then the exchange
//! arbitration, then the round controller.

use bevy::prelude::*;

pub mod action_library;
pub mod ai;
pub mod animation;
pub mod arbitration;
pub mod collision;
pub mod components;
pub mod constants;
pub mod input;
pub mod physics;
pub mod rounds;

pub use action_library::{ActionLibrary, ActionSpec, TerminalPolicy};
pub use arbitration::{Arbitration, BattleState};
pub use components::{
    Action, BoutConfig, Facing, Fighter, FighterKind, GameRng, PlayerControlled, RenderView, Side,
    SimClock,
};
pub use input::PlayerIntent;
pub use rounds::{RoundController, RoundPhase};

/// Fixed per-tick phase ordering. Within a tick, later phases observe the
/// effects of earlier ones; nothing observes a half-applied tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSystemPhase {
    /// Clock advance and intent application (player inputs, AI decisions).
    Intents,
    /// Velocity integration, gravity, arena clamping, facing.
    Physics,
    /// Locomotion sync and frame advancement.
    Animation,
    /// Attack overlap detection and hit application.
    Collision,
    /// Exchange initiative bookkeeping.
    Arbitration,
    /// Round and match lifecycle.
    Rounds,
}

/// Plugin wiring the simulation resources and per-tick systems.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<components::SimClock>()
            .init_resource::<components::GameRng>()
            .init_resource::<components::BoutConfig>()
            .init_resource::<action_library::ActionLibrary>()
            .init_resource::<arbitration::Arbitration>()
            .init_resource::<collision::CollisionTimers>()
            .init_resource::<ai::AiTimer>()
            .init_resource::<rounds::RoundController>()
            .add_event::<input::PlayerIntent>()
            .configure_sets(
                Update,
                (
                    SimSystemPhase::Intents,
                    SimSystemPhase::Physics,
                    SimSystemPhase::Animation,
                    SimSystemPhase::Collision,
                    SimSystemPhase::Arbitration,
                    SimSystemPhase::Rounds,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    physics::advance_clock,
                    input::apply_player_intents,
                    ai::villain_decide,
                )
                    .chain()
                    .in_set(SimSystemPhase::Intents),
            )
            .add_systems(
                Update,
                (ai::apply_villain_approach, physics::integrate_positions)
                    .chain()
                    .in_set(SimSystemPhase::Physics),
            )
            .add_systems(
                Update,
                (animation::sync_locomotion, animation::advance_animations)
                    .chain()
                    .in_set(SimSystemPhase::Animation),
            )
            .add_systems(
                Update,
                (collision::resolve_attacks, collision::apply_hits)
                    .chain()
                    .in_set(SimSystemPhase::Collision),
            )
            .add_systems(
                Update,
                arbitration::advance_arbitration.in_set(SimSystemPhase::Arbitration),
            )
            .add_systems(
                Update,
                rounds::update_round_flow.in_set(SimSystemPhase::Rounds),
            );
    }
}
