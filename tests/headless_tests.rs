//! Integration tests for the headless runner
//!
//! These tests drive the headless plugin with manual updates (no schedule
//! runner) and verify:
//! - Scripted intents fire at their timestamps
//! - The runner requests exit on match end and at the duration cap

use bevy::app::AppExit;
use bevy::prelude::*;

use brawlsim::combat::CombatPlugin;
use brawlsim::headless::{HeadlessBoutConfig, HeadlessPlugin, ScriptedIntent};
use brawlsim::sim::components::{Fighter, Side};
use brawlsim::sim::constants::PLAYER_SPAWN_X;
use brawlsim::sim::input::PlayerIntent;
use brawlsim::sim::{RoundController, SimulationPlugin};

fn headless_app(config: HeadlessBoutConfig) -> App {
    let mut app = App::new();
    app.add_plugins(CombatPlugin)
        .add_plugins(SimulationPlugin)
        .add_plugins(HeadlessPlugin::new(config));
    app
}

fn tick(app: &mut App, n: u64) {
    for _ in 0..n {
        app.update();
    }
}

fn exit_requested(app: &App) -> bool {
    !app.world().resource::<Events<AppExit>>().is_empty()
}

#[test]
fn test_startup_spawns_both_fighters() {
    let mut app = headless_app(HeadlessBoutConfig {
        random_seed: Some(3),
        ..Default::default()
    });
    app.update();

    let world = app.world_mut();
    let mut query = world.query::<&Fighter>();
    let sides: Vec<Side> = query.iter(world).map(|f| f.side).collect();
    assert_eq!(sides.len(), 2);
    assert!(sides.contains(&Side::Player));
    assert!(sides.contains(&Side::Villain));
}

#[test]
fn test_scripted_intents_fire_at_their_timestamps() {
    let mut app = headless_app(HeadlessBoutConfig {
        random_seed: Some(3),
        script: vec![
            ScriptedIntent {
                at_ms: 100,
                intent: PlayerIntent::MoveRight,
            },
            ScriptedIntent {
                at_ms: 600,
                intent: PlayerIntent::Punch,
            },
        ],
        ..Default::default()
    });

    let player_x = |app: &mut App| -> f32 {
        let world = app.world_mut();
        let mut query = world.query::<(&Fighter, &Transform)>();
        query
            .iter(world)
            .find(|(f, _)| f.side == Side::Player)
            .map(|(_, t)| t.translation.x)
            .expect("player missing")
    };

    // Before the first timestamp: still parked at spawn.
    tick(&mut app, 5);
    assert_eq!(player_x(&mut app), PLAYER_SPAWN_X);

    // Past the walk timestamp: the player has moved.
    tick(&mut app, 20);
    let walked_x = player_x(&mut app);
    assert!(walked_x > PLAYER_SPAWN_X);

    // Past the punch timestamp: the swing is in flight (25 ticks after a
    // 600ms press leaves a 24-tick punch still locked).
    tick(&mut app, 15);
    let world = app.world_mut();
    let mut query = world.query::<&Fighter>();
    let acted = query
        .iter(world)
        .find(|f| f.side == Side::Player)
        .map(|f| f.action)
        .expect("player missing");
    assert!(acted.is_attack(), "expected a punch in flight, got {:?}", acted);
}

#[test]
fn test_match_end_requests_exit() {
    let mut app = headless_app(HeadlessBoutConfig {
        random_seed: Some(3),
        ..Default::default()
    });
    app.update();
    app.world_mut().resource_mut::<RoundController>().game_over = true;
    app.update();
    assert!(exit_requested(&app));
}

#[test]
fn test_duration_cap_requests_exit() {
    let mut app = headless_app(HeadlessBoutConfig {
        random_seed: Some(3),
        max_duration_secs: 1,
        ..Default::default()
    });
    tick(&mut app, 62);
    assert!(exit_requested(&app));
}
