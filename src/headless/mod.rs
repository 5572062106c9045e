//! Headless bout simulation
//!
//! Runs bouts without rendering for AI testing, balance tuning, and CI.

pub mod config;
pub mod runner;

pub use config::{HeadlessBoutConfig, ScriptedIntent};
pub use runner::{run_headless_bout, BoutResult, HeadlessPlugin};
