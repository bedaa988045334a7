//! Beatstep - a grid-based rhythm crawler core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (beat clock, timing judgment, movement
//!   and charge state machines, grid motion)
//! - `grid`: Tile map and directions
//! - `input`: Raw-state edge detection and key mapping
//! - `config`: Rhythm tuning parameters

pub mod config;
pub mod grid;
pub mod input;
pub mod sim;

pub use config::{ConfigError, RhythmConfig};
pub use grid::{Direction, Level, TileKind};
pub use input::{EdgeTracker, InputEdge, PadSnapshot};

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (tiles)
    pub const GRID_WIDTH: i32 = 16;
    pub const GRID_HEIGHT: i32 = 16;

    /// Default tempo
    pub const DEFAULT_BPM: f64 = 120.0;
    /// Symmetric hit window around beat / half-beat instants (ms)
    pub const DEFAULT_TOLERANCE_MS: f64 = 150.0;
    /// Target hold length for a charge attack (beats)
    pub const DEFAULT_CHARGE_BEATS: f64 = 2.0;
    /// Slack around the target hold length (beats)
    pub const CHARGE_SLACK_BEATS: f64 = 0.5;

    /// Player starting health
    pub const PLAYER_MAX_HP: i32 = 4;
    /// Beats between player death and area restart
    pub const RESTART_DELAY_BEATS: u32 = 4;

    /// Heavy attacks reach two tiles out
    pub const HEAVY_ATTACK_RANGE: i32 = 2;
}
