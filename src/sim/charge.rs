//! Charge attack state machine
//!
//! Press/hold/release layered on the same clock as movement. The press may
//! fire a light action (if it lands on-beat); holding for the configured
//! number of beats and releasing on-beat fires a heavy action. Only a
//! matching-direction release resolves a charge, and nothing times one out.

use serde::{Deserialize, Serialize};

use super::clock::BeatClock;
use super::judge;
use crate::config::RhythmConfig;
use crate::consts::CHARGE_SLACK_BEATS;
use crate::grid::Direction;

/// An in-flight charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ActiveCharge {
    direction: Direction,
    /// Beat count at press
    start_beat: u64,
}

/// Outcome of a press edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressDecision {
    /// Charge started; light action fires iff the press was on-beat
    Started { light: bool },
    /// Already charging: press ignored
    Ignored,
}

/// Outcome of a release edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// Charge resolved; heavy fires iff the hold length and release timing
    /// both qualified
    Resolved { heavy: bool },
    /// Not charging, or direction mismatch: no-op
    Ignored,
}

/// Per-actor charge state. At most one charge at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargeInput {
    active: Option<ActiveCharge>,
}

impl ChargeInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_charging(&self) -> bool {
        self.active.is_some()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.active.map(|c| c.direction)
    }

    /// Attack button down. Starts a charge unless one is already open.
    pub fn on_press(
        &mut self,
        direction: Direction,
        clock: &BeatClock,
        config: &RhythmConfig,
    ) -> PressDecision {
        if self.active.is_some() {
            log::debug!("press {direction:?} ignored: charge already open");
            return PressDecision::Ignored;
        }
        self.active = Some(ActiveCharge {
            direction,
            start_beat: clock.beat_count(),
        });
        // An off-beat press charges silently with no light action
        let light = judge::is_on_beat(clock, config.tolerance_ms);
        PressDecision::Started { light }
    }

    /// Attack button up. Resolves the open charge only when the direction
    /// matches; a stray release is not an error.
    pub fn on_release(
        &mut self,
        direction: Direction,
        clock: &BeatClock,
        config: &RhythmConfig,
    ) -> ReleaseDecision {
        let Some(charge) = self.active else {
            log::debug!("release {direction:?} ignored: no charge open");
            return ReleaseDecision::Ignored;
        };
        if charge.direction != direction {
            log::debug!(
                "release {direction:?} ignored: charge is {:?}",
                charge.direction
            );
            return ReleaseDecision::Ignored;
        }
        self.active = None;

        let held_beats = (clock.beat_count() - charge.start_beat) as f64;
        let held_ok = (held_beats - config.charge_beats).abs() <= CHARGE_SLACK_BEATS;
        let heavy = held_ok && judge::is_on_beat(clock, config.tolerance_ms);
        ReleaseDecision::Resolved { heavy }
    }

    /// Drop any open charge (respawn / area change)
    pub fn reset(&mut self) {
        self.active = None;
    }
}
