//! Free-running beat clock
//!
//! The time base for the whole simulation: a phase accumulator that wraps at
//! the beat period and reports every beat and half-beat boundary it crosses.
//! A single long delta may cross many boundaries; each one is emitted in
//! order, never coalesced.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A boundary crossing reported by [`BeatClock::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A beat boundary; carries the new beat count
    Beat(u64),
    /// A half-beat slot; index is `2 * beat` at boundaries and `2 * beat + 1`
    /// at midpoints, so it increases by one per slot
    HalfBeat(u64),
}

/// Phase accumulator over a fixed tempo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatClock {
    bpm: f64,
    /// Milliseconds per beat, `60000 / bpm`
    beat_period_ms: f64,
    /// Elapsed ms since the last beat boundary, `0 <= phase < period`
    phase_ms: f64,
    /// Beat boundaries crossed since start
    beat_count: u64,
}

impl BeatClock {
    /// Create a clock at the given tempo. Tempo is immutable; a new tempo
    /// means a new clock.
    pub fn new(bpm: f64) -> Result<Self, ConfigError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(ConfigError::InvalidBpm(bpm));
        }
        Ok(Self {
            bpm,
            beat_period_ms: 60_000.0 / bpm,
            phase_ms: 0.0,
            beat_count: 0,
        })
    }

    /// Advance by `delta_ms`, pushing one event per boundary crossed.
    ///
    /// Walks boundary to boundary so a delta spanning several beats still
    /// increments `beat_count` once per wrap and fires every missed
    /// half-beat. Landing exactly on a boundary counts as crossing it.
    pub fn advance(&mut self, delta_ms: f64, events: &mut Vec<ClockEvent>) {
        if !(delta_ms > 0.0) {
            return;
        }
        let half = self.beat_period_ms / 2.0;
        let mut remaining = delta_ms;
        while remaining > 0.0 {
            let next_mark = if self.phase_ms < half {
                half
            } else {
                self.beat_period_ms
            };
            let to_next = next_mark - self.phase_ms;
            if remaining < to_next {
                self.phase_ms += remaining;
                break;
            }
            remaining -= to_next;
            if next_mark < self.beat_period_ms {
                // Midpoint crossed
                self.phase_ms = half;
                events.push(ClockEvent::HalfBeat(self.beat_count * 2 + 1));
            } else {
                // Beat boundary: wrap and count exactly once
                self.phase_ms = 0.0;
                self.beat_count += 1;
                events.push(ClockEvent::Beat(self.beat_count));
                events.push(ClockEvent::HalfBeat(self.beat_count * 2));
            }
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn beat_period_ms(&self) -> f64 {
        self.beat_period_ms
    }

    /// Elapsed ms since the last beat boundary
    pub fn phase_ms(&self) -> f64 {
        self.phase_ms
    }

    pub fn beat_count(&self) -> u64 {
        self.beat_count
    }

    /// Phase as a fraction of the beat period, `[0, 1)`
    pub fn beat_progress(&self) -> f64 {
        self.phase_ms / self.beat_period_ms
    }
}
