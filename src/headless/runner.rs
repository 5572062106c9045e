//! Headless bout runner
//!
//! Runs a complete bout without rendering: a schedule-runner app ticking the
//! simulation at 60Hz, an optional scripted player, and an exit check that
//! stops on match end or on the configured duration cap. The combat log and
//! bout metadata are written to JSON when the run finishes.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use super::config::{HeadlessBoutConfig, ScriptedIntent};
use crate::combat::log::{BoutMetadata, CombatLog, CombatLogEventType, FighterMetadata};
use crate::combat::CombatPlugin;
use crate::sim::action_library::ActionLibrary;
use crate::sim::components::{spawn_fighters, BoutConfig, Fighter, GameRng, Side, SimClock};
use crate::sim::input::{apply_player_intents, PlayerIntent};
use crate::sim::rounds::RoundController;
use crate::sim::{SimSystemPhase, SimulationPlugin};

/// Outcome of a finished headless bout.
#[derive(Debug, Clone)]
pub struct BoutResult {
    pub winner: Option<Side>,
    pub rounds_played: u32,
    pub player_round_wins: u32,
    pub villain_round_wins: u32,
    pub sim_time_ms: u64,
    pub random_seed: Option<u64>,
}

/// Runner-private state: the script (sorted by timestamp), the next intent to
/// fire, and the duration cap.
#[derive(Resource)]
struct HeadlessBoutState {
    script: Vec<ScriptedIntent>,
    cursor: usize,
    max_duration_ms: u64,
}

/// Plugin wiring the headless runner into the app.
pub struct HeadlessPlugin {
    config: HeadlessBoutConfig,
}

impl HeadlessPlugin {
    pub fn new(config: HeadlessBoutConfig) -> Self {
        Self { config }
    }
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.config.random_seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::from_entropy(),
        };

        let mut script = self.config.script.clone();
        script.sort_by_key(|s| s.at_ms);

        app.insert_resource(self.config.to_bout_config())
            .insert_resource(rng)
            .insert_resource(HeadlessBoutState {
                script,
                cursor: 0,
                max_duration_ms: self.config.max_duration_secs * 1000,
            })
            .add_systems(Startup, setup_headless_bout)
            .add_systems(
                Update,
                feed_scripted_intents
                    .in_set(SimSystemPhase::Intents)
                    .before(apply_player_intents),
            )
            .add_systems(Update, check_bout_end.after(SimSystemPhase::Rounds));
    }
}

fn setup_headless_bout(
    mut commands: Commands,
    config: Res<BoutConfig>,
    mut combat_log: ResMut<CombatLog>,
) {
    spawn_fighters(&mut commands, &config);
    combat_log.log(
        0,
        CombatLogEventType::Match,
        format!("Match started: best of {} rounds", config.rounds),
    );
    info!("Headless bout started (best of {} rounds)", config.rounds);
}

/// Fire scripted intents whose timestamp has been reached.
fn feed_scripted_intents(
    clock: Res<SimClock>,
    mut state: ResMut<HeadlessBoutState>,
    mut intents: EventWriter<PlayerIntent>,
) {
    let now = clock.now_ms();
    while state.cursor < state.script.len() && state.script[state.cursor].at_ms <= now {
        intents.send(state.script[state.cursor].intent);
        state.cursor += 1;
    }
}

/// Exit once the match is decided, or cut the run off at the duration cap.
fn check_bout_end(
    clock: Res<SimClock>,
    state: Res<HeadlessBoutState>,
    controller: Res<RoundController>,
    mut exit: EventWriter<AppExit>,
) {
    if controller.game_over {
        exit.send(AppExit::Success);
        return;
    }
    if clock.now_ms() >= state.max_duration_ms {
        warn!(
            "Bout cut off at {}s without a result",
            state.max_duration_ms / 1000
        );
        exit.send(AppExit::Success);
    }
}

/// Run a complete headless bout, write the combat log, and print a summary.
pub fn run_headless_bout(config: HeadlessBoutConfig) -> Result<BoutResult, String> {
    config.validate()?;

    let library = match &config.actions_config {
        Some(path) => ActionLibrary::load_from_file(std::path::Path::new(path))?,
        None => ActionLibrary::builtin(),
    };
    let output_path = config.output_path.clone();
    let random_seed = config.random_seed;

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(bevy::log::LogPlugin::default())
    .add_plugins(CombatPlugin)
    .add_plugins(SimulationPlugin)
    .add_plugins(HeadlessPlugin::new(config))
    .insert_resource(library);

    app.run();

    // Collect the outcome from the finished world.
    let world = app.world_mut();
    let sim_time_ms = world.resource::<SimClock>().now_ms();
    let controller = world.resource::<RoundController>();
    let result = BoutResult {
        winner: controller.winner,
        rounds_played: controller.player_wins + controller.villain_wins,
        player_round_wins: controller.player_wins,
        villain_round_wins: controller.villain_wins,
        sim_time_ms,
        random_seed,
    };

    let mut player_meta = None;
    let mut villain_meta = None;
    let mut fighters = world.query::<&Fighter>();
    for fighter in fighters.iter(world) {
        let meta = FighterMetadata {
            name: fighter.kind.name().to_string(),
            final_health: fighter.health,
            round_wins: match fighter.side {
                Side::Player => result.player_round_wins,
                Side::Villain => result.villain_round_wins,
            },
            damage_dealt: fighter.damage_dealt,
            damage_taken: fighter.damage_taken,
        };
        match fighter.side {
            Side::Player => player_meta = Some(meta),
            Side::Villain => villain_meta = Some(meta),
        }
    }
    let (player, villain) = match (player_meta, villain_meta) {
        (Some(p), Some(v)) => (p, v),
        _ => return Err("Bout finished without both fighters present".to_string()),
    };

    let metadata = BoutMetadata {
        winner: result.winner.map(|s| s.name().to_string()),
        rounds_played: result.rounds_played,
        player,
        villain,
        random_seed: result.random_seed,
    };
    let combat_log = world.resource::<CombatLog>();
    let filename = combat_log.save_to_file(&metadata, output_path.as_deref())?;

    match result.winner {
        Some(side) => println!(
            "{} wins {}-{} after {:.1}s simulated; log saved to {}",
            side.name(),
            result
                .player_round_wins
                .max(result.villain_round_wins),
            result
                .player_round_wins
                .min(result.villain_round_wins),
            result.sim_time_ms as f64 / 1000.0,
            filename
        ),
        None => println!(
            "No result after {:.1}s simulated; log saved to {}",
            result.sim_time_ms as f64 / 1000.0,
            filename
        ),
    }

    Ok(result)
}
