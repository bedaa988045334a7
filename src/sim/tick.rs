//! Per-tick session driver
//!
//! One call per host frame. Fixed internal order: the clock advances first,
//! then this tick's input edges are judged against the now-current clock,
//! then each beat boundary crossed runs its callbacks (player bookkeeping,
//! pending transition, enemies). That order guarantees a boundary-perfect
//! tap refreshes the movement machine before the staleness check sees it.

use glam::IVec2;

use super::charge::{PressDecision, ReleaseDecision};
use super::clock::ClockEvent;
use super::enemy::EnemyAction;
use super::motion::{self, HazardKind, MoveOutcome};
use super::movement::{BeatAction, MoveDecision};
use super::state::{AttackTier, GameEvent, GameState};
use crate::consts::RESTART_DELAY_BEATS;
use crate::grid::{self, Direction};
use crate::input::InputEdge;

/// Input edges collected for a single tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub edges: Vec<InputEdge>,
}

/// Advance the session by one frame's elapsed time
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f64) {
    let mut clock_events = Vec::new();
    state.clock.advance(delta_ms, &mut clock_events);

    // Input is dead while falling or after death; edges are dropped, not
    // queued, so a late tap never fires after respawn.
    if !state.game_over && !state.player.respawning {
        for &edge in &input.edges {
            apply_edge(state, edge);
        }
    }

    for event in clock_events {
        match event {
            ClockEvent::HalfBeat(index) => state.push_event(GameEvent::HalfBeatFired(index)),
            ClockEvent::Beat(count) => {
                state.push_event(GameEvent::BeatFired(count));
                on_beat_boundary(state, count);
            }
        }
    }
}

fn apply_edge(state: &mut GameState, edge: InputEdge) {
    match edge {
        InputEdge::PressMove(direction) => {
            let decision =
                state
                    .player
                    .movement
                    .on_input(direction, &state.clock, state.config.tolerance_ms);
            match decision {
                MoveDecision::Step(direction) => apply_step(state, direction),
                MoveDecision::Primed(direction) => {
                    state.push_event(GameEvent::IntentPrimed { direction });
                }
                MoveDecision::Miss => state.push_event(GameEvent::IntentReset),
            }
        }
        InputEdge::PressAttack(direction) => {
            let decision = state
                .player
                .charge
                .on_press(direction, &state.clock, &state.config);
            if matches!(decision, PressDecision::Started { light: true }) {
                resolve_attack(state, direction, AttackTier::Light);
            }
        }
        InputEdge::ReleaseAttack(direction) => {
            let decision = state
                .player
                .charge
                .on_release(direction, &state.clock, &state.config);
            if matches!(decision, ReleaseDecision::Resolved { heavy: true }) {
                resolve_attack(state, direction, AttackTier::Heavy);
            }
        }
    }
}

/// Commit a decided step and classify what it landed on
fn apply_step(state: &mut GameState, direction: Direction) {
    let from = state.player.pos;
    match motion::try_move(&mut state.player, &state.level, direction) {
        MoveOutcome::Moved => {
            state.push_event(GameEvent::MoveCommitted {
                from,
                to: state.player.pos,
            });
        }
        MoveOutcome::Blocked => {
            state.push_event(GameEvent::MoveBlocked { direction });
        }
        MoveOutcome::Hazard(HazardKind::Pit) => {
            // The fall is visible; restoration waits for the next beat
            state.push_event(GameEvent::MoveCommitted {
                from,
                to: state.player.pos,
            });
            state.push_event(GameEvent::HazardTriggered {
                kind: HazardKind::Pit,
            });
            damage_player(state, 1);
        }
        MoveOutcome::Hazard(HazardKind::Spike) => {
            // Position already bounced back; no net move to report
            state.push_event(GameEvent::HazardTriggered {
                kind: HazardKind::Spike,
            });
            damage_player(state, 1);
        }
        MoveOutcome::Transition => {
            state.push_event(GameEvent::MoveCommitted {
                from,
                to: state.player.pos,
            });
            state.push_event(GameEvent::TransitionTriggered);
            state.pending_transition = true;
        }
    }
}

/// Resolve a light or heavy attack against the tiles it reaches
fn resolve_attack(state: &mut GameState, direction: Direction, tier: AttackTier) {
    state.push_event(GameEvent::ActionResolved { direction, tier });

    let reach = match tier {
        AttackTier::Light => 1,
        AttackTier::Heavy => crate::consts::HEAVY_ATTACK_RANGE,
    };
    let mut targets = Vec::with_capacity(reach as usize);
    let mut tile = state.player.pos;
    for _ in 0..reach {
        tile = grid::step(tile, direction);
        if !state.level.in_bounds(tile) {
            break;
        }
        targets.push(tile);
    }

    // Any hit defeats; tier only scales the presentation
    let mut defeated = Vec::new();
    state.enemies.retain(|enemy| {
        if targets.contains(&enemy.pos) {
            defeated.push(enemy.id);
            false
        } else {
            true
        }
    });
    for id in defeated {
        log::info!("enemy {id} defeated by {tier:?} attack");
        state.push_event(GameEvent::EnemyDefeated { id });
    }
}

fn on_beat_boundary(state: &mut GameState, beat: u64) {
    if state.game_over {
        state.death_beats += 1;
        if state.death_beats >= RESTART_DELAY_BEATS {
            let area = state.area_index;
            state.load_area(area);
        }
        return;
    }

    if state.player.respawning {
        complete_respawn(state);
    } else {
        player_beat_bookkeeping(state, beat);
    }

    if state.pending_transition {
        let next = if state.area_index == 0 { 1 } else { 0 };
        state.load_area(next);
        return;
    }

    enemies_act(state, beat);
}

/// Deterministic pit recovery: always the last floor tile visited
fn complete_respawn(state: &mut GameState) {
    state.player.pos = state.player.last_safe;
    state.player.respawning = false;
    state.player.movement.reset();
    state.player.charge.reset();
    state.push_event(GameEvent::PlayerRespawned {
        at: state.player.pos,
    });
}

/// Auto-fire first, then momentum loss (same-beat input already ran)
fn player_beat_bookkeeping(state: &mut GameState, beat: u64) {
    match state.player.movement.on_beat(beat) {
        Some(BeatAction::AutoFire(direction)) => {
            apply_step(state, direction);
            state.push_event(GameEvent::IntentReset);
        }
        Some(BeatAction::MomentumLost) => {
            log::debug!("momentum lost at beat {beat}");
            state.push_event(GameEvent::IntentReset);
        }
        None => {}
    }
}

fn enemies_act(state: &mut GameState, beat: u64) {
    let seed = state.seed;
    let mut occupied: Vec<IVec2> = state.enemies.iter().map(|e| e.pos).collect();

    for i in 0..state.enemies.len() {
        let player_pos = state.player.pos;
        let action = {
            let enemy = &mut state.enemies[i];
            enemy.act_on_beat(beat, seed, &state.level, player_pos, &occupied)
        };
        occupied[i] = state.enemies[i].pos;

        let id = state.enemies[i].id;
        match action {
            EnemyAction::Moved { from, to } => {
                state.push_event(GameEvent::EnemyMoved { id, from, to });
            }
            EnemyAction::AttackedPlayer => {
                state.push_event(GameEvent::EnemyStruckPlayer { id });
                damage_player(state, 1);
            }
            EnemyAction::None => {}
        }

        // Contact damage if an enemy ends the beat on the player's tile
        if state.enemies[i].pos == state.player.pos {
            state.push_event(GameEvent::EnemyStruckPlayer { id });
            damage_player(state, 1);
        }
    }
}

fn damage_player(state: &mut GameState, amount: i32) {
    state.player.hp -= amount;
    state.push_event(GameEvent::HpChanged {
        hp: state.player.hp,
    });
    if state.player.hp <= 0 && !state.game_over {
        log::info!("player died at beat {}", state.clock.beat_count());
        state.game_over = true;
        state.death_beats = 0;
        state.push_event(GameEvent::PlayerDied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RhythmConfig;
    use crate::consts::PLAYER_MAX_HP;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::movement::MoveMode;

    /// Session without enemies so movement tests are undisturbed
    fn quiet_state() -> GameState {
        let mut state = GameState::new(RhythmConfig::default(), 42).unwrap();
        state.enemies.clear();
        state
    }

    fn press_move(direction: Direction) -> TickInput {
        TickInput {
            edges: vec![InputEdge::PressMove(direction)],
        }
    }

    fn attack(direction: Direction) -> TickInput {
        TickInput {
            edges: vec![InputEdge::PressAttack(direction)],
        }
    }

    fn release(direction: Direction) -> TickInput {
        TickInput {
            edges: vec![InputEdge::ReleaseAttack(direction)],
        }
    }

    #[test]
    fn test_end_to_end_single_beat() {
        // 120 bpm: one 500 ms advance crosses exactly one boundary, and a
        // tap delivered at that instant judges on-beat.
        let mut state = quiet_state();
        tick(&mut state, &press_move(Direction::Right), 500.0);
        assert_eq!(state.clock.beat_count(), 1);
        assert_eq!(state.clock.phase_ms(), 0.0);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::IntentPrimed {
            direction: Direction::Right
        }));
        assert!(events.contains(&GameEvent::BeatFired(1)));
    }

    #[test]
    fn test_prime_confirm_run_moves_player() {
        let mut state = quiet_state();
        state.player.pos = IVec2::new(5, 5);

        // On-beat prime, then a same-direction tap at the midpoint
        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &press_move(Direction::Right), 230.0);

        assert_eq!(state.player.pos, IVec2::new(6, 5));
        assert_eq!(
            state.player.movement.mode(),
            MoveMode::Running(Direction::Right)
        );
        assert!(state.drain_events().contains(&GameEvent::MoveCommitted {
            from: IVec2::new(5, 5),
            to: IVec2::new(6, 5),
        }));
    }

    #[test]
    fn test_primed_auto_fires_at_next_boundary() {
        let mut state = quiet_state();
        let start = state.player.pos;

        tick(&mut state, &press_move(Direction::Down), 20.0);
        assert_eq!(state.player.pos, start);

        // No confirmation: the boundary commits the queued move
        tick(&mut state, &TickInput::default(), 480.0);
        assert_eq!(state.player.pos, start + IVec2::new(0, 1));
        assert_eq!(state.player.movement.mode(), MoveMode::Idle);
    }

    #[test]
    fn test_momentum_survives_boundary_tap() {
        let mut state = quiet_state();
        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &press_move(Direction::Right), 230.0);
        assert!(matches!(state.player.movement.mode(), MoveMode::Running(_)));

        // Advance to boundary 1 and land a tap in the same tick: the tap is
        // judged first, so the staleness check must not drop the run.
        tick(&mut state, &press_move(Direction::Right), 250.0);
        tick(&mut state, &press_move(Direction::Right), 500.0);
        assert!(matches!(state.player.movement.mode(), MoveMode::Running(_)));

        // Two silent boundaries end the run
        tick(&mut state, &TickInput::default(), 500.0);
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.player.movement.mode(), MoveMode::Idle);
    }

    #[test]
    fn test_run_survives_multi_boundary_frame_with_tap() {
        let mut state = quiet_state();
        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &press_move(Direction::Right), 230.0);
        tick(&mut state, &TickInput::default(), 250.0);
        assert!(matches!(state.player.movement.mode(), MoveMode::Running(_)));
        state.drain_events();

        // One frame spans boundaries 2 and 3 with a tap in the same tick.
        // The tap is judged against the post-advance clock (beat 3), so the
        // replayed boundary 2 callback runs behind the refreshed action beat
        // and must leave the run alone.
        tick(&mut state, &press_move(Direction::Right), 1000.0);
        assert_eq!(state.clock.beat_count(), 3);
        assert!(matches!(state.player.movement.mode(), MoveMode::Running(_)));
        assert_eq!(state.player.pos, IVec2::new(4, 2));
        let events = state.drain_events();
        assert!(!events.contains(&GameEvent::IntentReset));
    }

    #[test]
    fn test_off_window_tap_resets() {
        // Tight window so 200 ms lands outside both the beat and half-beat
        // windows while a prime is pending
        let mut tight = GameState::new(
            RhythmConfig {
                tolerance_ms: 40.0,
                ..Default::default()
            },
            42,
        )
        .unwrap();
        tight.enemies.clear();
        tick(&mut tight, &press_move(Direction::Right), 20.0);
        tick(&mut tight, &press_move(Direction::Right), 180.0);
        assert_eq!(tight.player.movement.mode(), MoveMode::Idle);
        assert!(tight.drain_events().contains(&GameEvent::IntentReset));
    }

    #[test]
    fn test_wall_bump_blocks() {
        let mut state = quiet_state();
        state.player.pos = IVec2::new(1, 1);
        tick(&mut state, &press_move(Direction::Up), 20.0);
        // Primed; auto-fire at the boundary hits the wall
        tick(&mut state, &TickInput::default(), 480.0);
        assert_eq!(state.player.pos, IVec2::new(1, 1));
        assert!(state.drain_events().contains(&GameEvent::MoveBlocked {
            direction: Direction::Up
        }));
    }

    #[test]
    fn test_pit_fall_restores_to_last_floor() {
        let mut state = quiet_state();
        state.player.pos = IVec2::new(4, 5);
        state.player.last_safe = IVec2::new(4, 5);

        // Run into the pit at (5,5): prime right, confirm right
        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &press_move(Direction::Right), 230.0);
        assert_eq!(state.player.pos, IVec2::new(5, 5));
        assert!(state.player.respawning);
        assert_eq!(state.player.hp, PLAYER_MAX_HP - 1);

        // Input during the fall is ignored
        tick(&mut state, &press_move(Direction::Right), 10.0);

        // Next boundary restores to the floor tile, never the pit
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.player.pos, IVec2::new(4, 5));
        assert!(!state.player.respawning);
        assert!(state.drain_events().contains(&GameEvent::PlayerRespawned {
            at: IVec2::new(4, 5)
        }));
    }

    #[test]
    fn test_consecutive_pit_falls_reuse_same_safe_tile() {
        let mut state = quiet_state();
        state.player.pos = IVec2::new(4, 5);
        state.player.last_safe = IVec2::new(4, 5);

        for _ in 0..2 {
            tick(&mut state, &press_move(Direction::Right), 20.0);
            tick(&mut state, &press_move(Direction::Right), 230.0);
            assert!(state.player.respawning);
            // Finish the beat; player comes back to the same floor tile
            tick(&mut state, &TickInput::default(), 250.0);
            assert_eq!(state.player.pos, IVec2::new(4, 5));
        }
    }

    #[test]
    fn test_spike_reverts_and_damages() {
        let mut state = quiet_state();
        state.player.pos = IVec2::new(7, 5);
        state.player.last_safe = IVec2::new(2, 2);

        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &press_move(Direction::Right), 230.0);

        // Reverted to the pre-move tile, not last_safe
        assert_eq!(state.player.pos, IVec2::new(7, 5));
        assert!(!state.player.respawning);
        assert_eq!(state.player.hp, PLAYER_MAX_HP - 1);
        assert!(state.drain_events().contains(&GameEvent::HazardTriggered {
            kind: HazardKind::Spike
        }));
    }

    #[test]
    fn test_light_attack_on_beat_defeats_adjacent_enemy() {
        let mut state = GameState::new(RhythmConfig::default(), 42).unwrap();
        // Stand left of the static enemy at (4,4)
        state.player.pos = IVec2::new(3, 4);
        let target_id = state.enemies[0].id;

        tick(&mut state, &attack(Direction::Right), 20.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ActionResolved {
            direction: Direction::Right,
            tier: AttackTier::Light
        }));
        assert!(events.contains(&GameEvent::EnemyDefeated { id: target_id }));
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_off_beat_press_fires_nothing() {
        let mut state = GameState::new(RhythmConfig::default(), 42).unwrap();
        state.player.pos = IVec2::new(3, 4);

        tick(&mut state, &attack(Direction::Right), 250.0);
        let events = state.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ActionResolved { .. })));
        assert_eq!(state.enemies.len(), 3);
        // The charge is still open
        assert!(state.player.charge.is_charging());
    }

    #[test]
    fn test_heavy_attack_reaches_two_tiles() {
        let mut state = GameState::new(RhythmConfig::default(), 42).unwrap();
        // Two tiles left of the static enemy at (4,4)
        state.player.pos = IVec2::new(2, 4);
        let target_id = state.enemies[0].id;

        // Press on-beat (light fizzles at (3,4)), hold two beats, release
        // on the boundary
        tick(&mut state, &attack(Direction::Right), 20.0);
        tick(&mut state, &TickInput::default(), 480.0);
        tick(&mut state, &release(Direction::Right), 500.0);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ActionResolved {
            direction: Direction::Right,
            tier: AttackTier::Heavy
        }));
        assert!(events.contains(&GameEvent::EnemyDefeated { id: target_id }));
    }

    #[test]
    fn test_release_off_the_hold_window_is_light_only() {
        let mut state = GameState::new(RhythmConfig::default(), 42).unwrap();
        state.player.pos = IVec2::new(2, 4);

        // Held one beat: no heavy even with a perfect release
        tick(&mut state, &attack(Direction::Right), 20.0);
        tick(&mut state, &release(Direction::Right), 480.0);

        let events = state.drain_events();
        assert!(!events.contains(&GameEvent::ActionResolved {
            direction: Direction::Right,
            tier: AttackTier::Heavy
        }));
    }

    #[test]
    fn test_area_transition_on_next_beat() {
        let mut state = quiet_state();
        // Step onto the exit tile at (8,14)
        state.player.pos = IVec2::new(8, 13);
        state.player.last_safe = IVec2::new(8, 13);
        tick(&mut state, &press_move(Direction::Down), 20.0);
        tick(&mut state, &press_move(Direction::Down), 230.0);
        assert!(state.pending_transition);
        assert!(state.drain_events().contains(&GameEvent::TransitionTriggered));

        let beats_before = state.clock.beat_count();
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.area_index, 1);
        assert_eq!(state.player.pos, IVec2::new(8, 12));
        // The clock kept running across the switch
        assert_eq!(state.clock.beat_count(), beats_before + 1);
        assert!(state
            .drain_events()
            .contains(&GameEvent::AreaChanged { index: 1 }));
    }

    #[test]
    fn test_death_restarts_area_after_four_beats() {
        let mut state = quiet_state();
        state.player.hp = 1;
        // Walk onto the spike
        state.player.pos = IVec2::new(7, 5);
        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &press_move(Direction::Right), 230.0);
        assert!(state.game_over);
        assert!(state.drain_events().contains(&GameEvent::PlayerDied));

        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), 500.0);
            assert!(state.game_over);
        }
        tick(&mut state, &TickInput::default(), 500.0);
        assert!(!state.game_over);
        assert_eq!(state.area_index, 0);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
        assert_eq!(state.player.pos, IVec2::new(2, 2));
    }

    #[test]
    fn test_enemy_contact_damages_player() {
        let mut state = GameState::new(RhythmConfig::default(), 42).unwrap();
        // Put the aggressive enemy next to the player
        state.enemies.retain(|e| e.kind == EnemyKind::Aggressive);
        state.enemies[0].pos = IVec2::new(3, 2);

        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.player.hp, PLAYER_MAX_HP - 1);
        let id = state.enemies[0].id;
        assert!(state
            .drain_events()
            .contains(&GameEvent::EnemyStruckPlayer { id }));
    }

    #[test]
    fn test_sessions_with_same_seed_replay_identically() {
        let script = [
            (press_move(Direction::Right), 20.0),
            (press_move(Direction::Right), 230.0),
            (TickInput::default(), 250.0),
            (attack(Direction::Up), 10.0),
            (TickInput::default(), 990.0),
            (release(Direction::Up), 500.0),
            (TickInput::default(), 500.0),
        ];
        let mut a = GameState::new(RhythmConfig::default(), 1234).unwrap();
        let mut b = GameState::new(RhythmConfig::default(), 1234).unwrap();
        for (input, delta) in &script {
            tick(&mut a, input, *delta);
            tick(&mut b, input, *delta);
            assert_eq!(a.drain_events(), b.drain_events());
        }
        assert_eq!(a.player.pos, b.player.pos);
        let pos_a: Vec<IVec2> = a.enemies.iter().map(|e| e.pos).collect();
        let pos_b: Vec<IVec2> = b.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(pos_a, pos_b);
    }

    #[test]
    fn test_long_frame_is_not_lost() {
        // A single frame spanning three beats still counts every boundary
        // and still runs beat callbacks for each.
        let mut state = quiet_state();
        tick(&mut state, &press_move(Direction::Right), 20.0);
        tick(&mut state, &TickInput::default(), 1480.0);
        assert_eq!(state.clock.beat_count(), 3);
        // The prime auto-fired at the first of the three boundaries
        assert_eq!(state.player.pos, IVec2::new(3, 2));
        let beats: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BeatFired(_)))
            .collect();
        assert_eq!(
            beats,
            vec![
                GameEvent::BeatFired(1),
                GameEvent::BeatFired(2),
                GameEvent::BeatFired(3)
            ]
        );
    }
}
