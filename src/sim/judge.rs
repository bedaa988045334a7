//! Timing judgment
//!
//! Stateless classification of "now" against the clock. Safe to call any
//! number of times per frame; never mutates anything.

use serde::{Deserialize, Serialize};

use super::clock::BeatClock;

/// How an input instant lines up with the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    OnBeat,
    OnHalfBeat,
    Miss,
}

/// A verdict plus the signed distance (ms) to the nearest reference
/// instant. Negative means early, positive means late.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub verdict: Verdict,
    pub offset_ms: f64,
}

/// True iff the clock is within `tolerance_ms` of a beat boundary.
/// With zero tolerance only `phase == 0` qualifies.
pub fn is_on_beat(clock: &BeatClock, tolerance_ms: f64) -> bool {
    let phase = clock.phase_ms();
    let period = clock.beat_period_ms();
    phase <= tolerance_ms || period - phase <= tolerance_ms
}

/// True iff the clock is within `tolerance_ms` of a half-beat instant.
/// Beat boundaries count as half-beat opportunities too.
pub fn is_on_half_beat(clock: &BeatClock, tolerance_ms: f64) -> bool {
    let half = clock.beat_period_ms() / 2.0;
    (clock.phase_ms() - half).abs() <= tolerance_ms || is_on_beat(clock, tolerance_ms)
}

/// Full classification with signed offset from the nearest reference
/// instant (previous beat, midpoint, or next beat).
pub fn judge(clock: &BeatClock, tolerance_ms: f64) -> Judgment {
    let phase = clock.phase_ms();
    let period = clock.beat_period_ms();
    let half = period / 2.0;

    // Candidate offsets: late of last beat, around the midpoint, early of
    // the next beat.
    let from_beat = if phase <= period - phase {
        phase
    } else {
        phase - period
    };
    let from_half = phase - half;

    let verdict = if is_on_beat(clock, tolerance_ms) {
        Verdict::OnBeat
    } else if is_on_half_beat(clock, tolerance_ms) {
        Verdict::OnHalfBeat
    } else {
        Verdict::Miss
    };

    let offset_ms = match verdict {
        Verdict::OnBeat => from_beat,
        Verdict::OnHalfBeat => from_half,
        Verdict::Miss => {
            if from_beat.abs() <= from_half.abs() {
                from_beat
            } else {
                from_half
            }
        }
    };

    Judgment { verdict, offset_ms }
}
