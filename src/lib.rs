//! brawlsim: a deterministic 2D side-view fighting bout simulator.
//!
//! The crate is the non-rendering core of a fighting game: per-fighter action
//! state machines, a simple villain AI, sprite-box collision with damage and
//! knockback, exchange arbitration, and a best-of-N round controller — all
//! driven at a fixed 60Hz tick so seeded bouts replay exactly.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod sim;

pub use combat::CombatPlugin;
pub use headless::{run_headless_bout, HeadlessBoutConfig};
pub use sim::SimulationPlugin;
