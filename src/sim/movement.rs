//! Movement intent state machine
//!
//! Turns timed directional taps into grid steps. An on-beat tap primes (or,
//! while running, continues) movement; a matching half-beat tap confirms the
//! prime into a run; anything off-window is a hard miss back to idle. A
//! primed move that sees no confirmation auto-fires at the next beat
//! boundary, and a run starved of input for more than one beat decays.

use serde::{Deserialize, Serialize};

use super::clock::BeatClock;
use super::judge;
use crate::grid::Direction;

/// Current movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveMode {
    #[default]
    Idle,
    /// Queued move awaiting a half-beat confirmation or beat auto-fire
    Primed(Direction),
    /// Confirmed continuous movement
    Running(Direction),
}

/// What a directional tap resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDecision {
    /// Commit a step in this direction now
    Step(Direction),
    /// Entered the primed state; no step yet
    Primed(Direction),
    /// Off-window input: state was hard-reset to idle
    Miss,
}

/// What a beat boundary resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatAction {
    /// A primed move fires now
    AutoFire(Direction),
    /// A stale run decayed to idle
    MomentumLost,
}

/// Per-actor movement intent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementIntent {
    mode: MoveMode,
    /// Beat index of the last accepted input
    last_action_beat: u64,
}

impl MovementIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MoveMode {
        self.mode
    }

    pub fn last_action_beat(&self) -> u64 {
        self.last_action_beat
    }

    /// Judge one directional tap against the clock. Called once per input
    /// edge, not per frame.
    pub fn on_input(
        &mut self,
        direction: Direction,
        clock: &BeatClock,
        tolerance_ms: f64,
    ) -> MoveDecision {
        let on_beat = judge::is_on_beat(clock, tolerance_ms);
        let on_half = judge::is_on_half_beat(clock, tolerance_ms);

        if on_beat {
            self.last_action_beat = clock.beat_count();
            if matches!(self.mode, MoveMode::Running(_)) {
                // Direction may change mid-run
                self.mode = MoveMode::Running(direction);
                return MoveDecision::Step(direction);
            }
            self.mode = MoveMode::Primed(direction);
            return MoveDecision::Primed(direction);
        }

        if on_half {
            if let MoveMode::Primed(primed) = self.mode {
                if primed == direction {
                    // Confirmation: accelerate into a run and step now.
                    // Refreshing the action beat here keeps a prime that
                    // landed just before the boundary from reading as stale
                    // one beat later.
                    self.mode = MoveMode::Running(direction);
                    self.last_action_beat = clock.beat_count();
                    return MoveDecision::Step(direction);
                }
            }
            // A half-beat tap with nothing to confirm falls through to a miss
        }

        log::debug!(
            "movement miss: {direction:?} at phase {:.1} ms",
            clock.phase_ms()
        );
        self.mode = MoveMode::Idle;
        MoveDecision::Miss
    }

    /// Beat-boundary bookkeeping. Auto-fire is checked before momentum loss,
    /// and callers must deliver same-tick input before this runs so a
    /// boundary-perfect tap refreshes `last_action_beat` first.
    pub fn on_beat(&mut self, beat_count: u64) -> Option<BeatAction> {
        if let MoveMode::Primed(direction) = self.mode {
            // A prime recorded at this same boundary (input is judged before
            // the boundary callbacks run) waits for the next one.
            if self.last_action_beat < beat_count {
                self.mode = MoveMode::Idle;
                return Some(BeatAction::AutoFire(direction));
            }
            return None;
        }
        // `last_action_beat` can exceed `beat_count` when a long frame crosses
        // several boundaries and a same-tick tap was judged against the
        // post-advance clock; such a run is fresh, not stale.
        if matches!(self.mode, MoveMode::Running(_)) && beat_count > self.last_action_beat + 1 {
            self.mode = MoveMode::Idle;
            return Some(BeatAction::MomentumLost);
        }
        None
    }

    /// Back to idle (respawn / area change)
    pub fn reset(&mut self) {
        self.mode = MoveMode::Idle;
        self.last_action_beat = 0;
    }
}
