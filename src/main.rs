//! Beatstep entry point
//!
//! Headless scripted demo: drives the session at a fixed frame rate with a
//! canned input script and logs the events the core emits. Presentation is
//! out of scope; this is the driving-loop shape a real host would use.

use beatstep::config::RhythmConfig;
use beatstep::grid::Direction;
use beatstep::input::InputEdge;
use beatstep::sim::{GameEvent, GameState, TickInput, tick};

/// ~60 Hz frame time
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("Beatstep (headless demo) starting...");

    let config = RhythmConfig::default();
    let mut state = GameState::new(config, 0xBEA7).expect("default config is valid");
    log::info!(
        "session: {} bpm, {:.0} ms tolerance, {:.1}-beat charge",
        config.bpm,
        config.tolerance_ms,
        config.charge_beats
    );

    // Scripted edges keyed by frame number: prime right on the beat, confirm
    // at the half-beat to start running, then hold an attack for two beats
    // and release on the boundary.
    let script: &[(u64, InputEdge)] = &[
        (30, InputEdge::PressMove(Direction::Right)),
        (45, InputEdge::PressMove(Direction::Right)),
        (60, InputEdge::PressMove(Direction::Right)),
        (90, InputEdge::PressAttack(Direction::Down)),
        (150, InputEdge::ReleaseAttack(Direction::Down)),
    ];

    for frame in 0..240u64 {
        let edges: Vec<InputEdge> = script
            .iter()
            .filter(|(at, _)| *at == frame)
            .map(|(_, edge)| *edge)
            .collect();
        tick(&mut state, &TickInput { edges }, FRAME_MS);

        for event in state.drain_events() {
            match event {
                GameEvent::BeatFired(n) => log::debug!("beat {n}"),
                GameEvent::HalfBeatFired(_) => {}
                other => log::info!("{other:?}"),
            }
        }
    }

    log::info!(
        "demo done: player at {:?}, hp {}, beat {}",
        state.player.pos,
        state.player.hp,
        state.clock.beat_count()
    );
}
