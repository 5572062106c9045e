//! Integration tests for combat logging
//!
//! These tests verify:
//! - Hit, block, and knockdown entries use the documented message formats
//! - Filtering and query helpers
//! - Saving the log with bout metadata as JSON

use bevy::prelude::*;
use regex::Regex;

use brawlsim::combat::log::{
    BoutMetadata, CombatLog, CombatLogEventType, FighterMetadata,
};
use brawlsim::combat::CombatPlugin;
use brawlsim::sim::components::{
    spawn_fighters, BoutConfig, Fighter, GameRng, Side,
};
use brawlsim::sim::input::PlayerIntent;
use brawlsim::sim::SimulationPlugin;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(CombatPlugin)
        .add_plugins(SimulationPlugin)
        .insert_resource(GameRng::from_seed(5));
    let config = app.world().resource::<BoutConfig>().clone();
    let world = app.world_mut();
    let mut commands = world.commands();
    spawn_fighters(&mut commands, &config);
    world.flush();
    app.update();
    app
}

fn tick(app: &mut App, n: u64) {
    for _ in 0..n {
        app.update();
    }
}

/// Park the fighters in punching range but outside the villain's decision
/// range, so only scripted player attacks appear in the log.
fn place_in_reach(app: &mut App) {
    let world = app.world_mut();
    let mut query = world.query::<(&Fighter, &mut Transform)>();
    for (fighter, mut transform) in query.iter_mut(world) {
        transform.translation.x = match fighter.side {
            Side::Player => 300.0,
            Side::Villain => 405.0,
        };
    }
}

fn set_villain_blocking(app: &mut App, blocking: bool) {
    let world = app.world_mut();
    let mut query = world.query::<&mut Fighter>();
    for mut fighter in query.iter_mut(world) {
        if fighter.side == Side::Villain {
            fighter.is_blocking = blocking;
        }
    }
}

fn messages(app: &App, event_type: CombatLogEventType) -> Vec<String> {
    app.world()
        .resource::<CombatLog>()
        .filter_by_type(event_type)
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

#[test]
fn test_punch_hit_message_format() {
    let mut app = test_app();
    place_in_reach(&mut app);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 3);

    let hits = messages(&app, CombatLogEventType::Hit);
    assert_eq!(hits.len(), 1);
    let pattern = Regex::new(r"^Player punches Villain for 8 damage$").unwrap();
    assert!(pattern.is_match(&hits[0]), "got: {}", hits[0]);
}

#[test]
fn test_kick_logs_a_knockdown() {
    let mut app = test_app();
    place_in_reach(&mut app);
    app.world_mut().send_event(PlayerIntent::Kick);
    tick(&mut app, 3);

    let knockdowns = messages(&app, CombatLogEventType::Knockdown);
    assert_eq!(knockdowns.len(), 1);
    let pattern = Regex::new(r"^Player kicks Villain for 20 damage \(knockdown\)$").unwrap();
    assert!(pattern.is_match(&knockdowns[0]), "got: {}", knockdowns[0]);
}

#[test]
fn test_blocked_hit_logs_chip_damage() {
    let mut app = test_app();
    place_in_reach(&mut app);
    set_villain_blocking(&mut app, true);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 3);

    let blocks = messages(&app, CombatLogEventType::Block);
    assert_eq!(blocks.len(), 1);
    let pattern = Regex::new(r"^Villain blocks Player's punch \(2 damage\)$").unwrap();
    assert!(pattern.is_match(&blocks[0]), "got: {}", blocks[0]);
}

#[test]
fn test_round_start_is_logged() {
    let app = test_app();
    let rounds = messages(&app, CombatLogEventType::Round);
    assert_eq!(rounds, vec!["Round 1 started".to_string()]);
}

#[test]
fn test_entry_timestamps_use_sim_time() {
    let mut app = test_app();
    place_in_reach(&mut app);
    // ~1 second in, land a punch.
    tick(&mut app, 60);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 3);

    let log = app.world().resource::<CombatLog>();
    let hit = log
        .filter_by_type(CombatLogEventType::Hit)
        .pop()
        .expect("hit entry");
    assert!(hit.timestamp_ms >= 1000, "got {}", hit.timestamp_ms);
    assert!(hit.timestamp_ms < 1200, "got {}", hit.timestamp_ms);
}

#[test]
fn test_query_helpers() {
    let mut app = test_app();
    place_in_reach(&mut app);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 30);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.hits_landed_by("Player"), 1);
    assert_eq!(log.hits_landed_by("Villain"), 0);
    assert_eq!(log.hp_changes_only().len(), 1);
    // Recent keeps chronological order and caps the count.
    let recent = log.recent(1);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].message, "Player punches Villain for 8 damage");
}

#[test]
fn test_blocked_hits_credit_the_attacker() {
    let mut app = test_app();
    place_in_reach(&mut app);
    set_villain_blocking(&mut app, true);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 3);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.hits_landed_by("Player"), 1, "the attacker landed it");
    assert_eq!(log.hits_landed_by("Villain"), 0, "blocking is not landing");
}

#[test]
fn test_save_to_file_round_trips_as_json() {
    let mut app = test_app();
    place_in_reach(&mut app);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 3);

    let metadata = BoutMetadata {
        winner: Some("Player".to_string()),
        rounds_played: 2,
        player: FighterMetadata {
            name: "Ronin".to_string(),
            final_health: 77,
            round_wins: 2,
            damage_dealt: 46,
            damage_taken: 23,
        },
        villain: FighterMetadata {
            name: "Bruiser".to_string(),
            final_health: 0,
            round_wins: 0,
            damage_dealt: 23,
            damage_taken: 46,
        },
        random_seed: Some(5),
    };

    let path = std::env::temp_dir().join("brawlsim_test_log.json");
    let path_str = path.to_str().unwrap().to_string();
    let log = app.world().resource::<CombatLog>();
    let written = log.save_to_file(&metadata, Some(&path_str)).expect("save");
    assert_eq!(written, path_str);

    let contents = std::fs::read_to_string(&path).expect("read back");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("valid JSON");
    assert_eq!(value["metadata"]["winner"], "Player");
    assert_eq!(value["metadata"]["player"]["name"], "Ronin");
    assert_eq!(value["metadata"]["random_seed"], 5);
    assert!(value["entries"].as_array().unwrap().len() >= 2);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_clear_empties_the_log() {
    let mut app = test_app();
    place_in_reach(&mut app);
    app.world_mut().send_event(PlayerIntent::Punch);
    tick(&mut app, 3);

    let mut log = app.world_mut().resource_mut::<CombatLog>();
    assert!(!log.entries.is_empty());
    log.clear();
    assert!(log.entries.is_empty());
}
