//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed ordering within a tick (clock, then input, then beat callbacks)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod charge;
pub mod clock;
pub mod enemy;
pub mod judge;
pub mod motion;
pub mod movement;
pub mod state;
pub mod tick;

pub use charge::{ChargeInput, PressDecision, ReleaseDecision};
pub use clock::{BeatClock, ClockEvent};
pub use enemy::{Enemy, EnemyKind};
pub use judge::{Judgment, Verdict, is_on_beat, is_on_half_beat, judge};
pub use motion::{HazardKind, MoveOutcome, try_move};
pub use movement::{BeatAction, MoveDecision, MoveMode, MovementIntent};
pub use state::{AttackTier, GameEvent, GameState, Player};
pub use tick::{TickInput, tick};
