//! Grid motion and hazard resolution
//!
//! Applies a decided step to an actor's discrete position and classifies the
//! destination tile. Position is only ever committed to walkable tiles;
//! hazards differ in where they put the actor afterwards.

use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::grid::{self, Direction, Level, TileKind};

/// Hazard tile classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Damage, then deferred restoration to the last safe floor tile
    Pit,
    /// Damage and an immediate revert to the pre-move coordinate
    Spike,
}

/// Result of one attempted step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Wall or out of bounds; position unchanged
    Blocked,
    Hazard(HazardKind),
    /// Stepped onto an area exit; position stands
    Transition,
}

/// Try to step `player` one tile in `direction`.
///
/// Pits mark the player respawning rather than relocating immediately; the
/// session restores them to `last_safe` at the next beat boundary, which is
/// always the most recent plain floor tile and never another hazard.
pub fn try_move(player: &mut Player, level: &Level, direction: Direction) -> MoveOutcome {
    let target = grid::step(player.pos, direction);

    // tile_at is None out of bounds; neither that nor a wall ever commits
    match level.tile_at(target) {
        Some(TileKind::Wall) | None => MoveOutcome::Blocked,
        Some(TileKind::Pit) => {
            player.pos = target;
            player.respawning = true;
            MoveOutcome::Hazard(HazardKind::Pit)
        }
        Some(TileKind::Spike) => {
            // Spikes bounce the actor straight back, not to last_safe
            MoveOutcome::Hazard(HazardKind::Spike)
        }
        Some(TileKind::AreaTransition) => {
            player.pos = target;
            MoveOutcome::Transition
        }
        Some(TileKind::Floor) => {
            player.pos = target;
            player.last_safe = target;
            MoveOutcome::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn player_at(x: i32, y: i32) -> Player {
        Player::new(IVec2::new(x, y))
    }

    #[test]
    fn test_floor_move_updates_safe_spot() {
        let level = Level::builtin(0);
        let mut player = player_at(2, 2);
        assert_eq!(
            try_move(&mut player, &level, Direction::Right),
            MoveOutcome::Moved
        );
        assert_eq!(player.pos, IVec2::new(3, 2));
        assert_eq!(player.last_safe, IVec2::new(3, 2));
    }

    #[test]
    fn test_wall_blocks_without_moving() {
        let level = Level::builtin(0);
        let mut player = player_at(1, 1);
        assert_eq!(
            try_move(&mut player, &level, Direction::Up),
            MoveOutcome::Blocked
        );
        assert_eq!(player.pos, IVec2::new(1, 1));
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let mut level = Level::builtin(0);
        // Breach the border wall so the step itself leaves the grid
        level.set_tile(IVec2::new(0, 2), TileKind::Floor);
        let mut player = player_at(0, 2);
        assert_eq!(
            try_move(&mut player, &level, Direction::Left),
            MoveOutcome::Blocked
        );
        assert_eq!(player.pos, IVec2::new(0, 2));
    }

    #[test]
    fn test_pit_marks_respawn_keeps_safe_spot() {
        let level = Level::builtin(0);
        let mut player = player_at(4, 5);
        player.last_safe = IVec2::new(4, 5);
        assert_eq!(
            try_move(&mut player, &level, Direction::Right),
            MoveOutcome::Hazard(HazardKind::Pit)
        );
        // Falling: position is in the pit until the beat restores it
        assert_eq!(player.pos, IVec2::new(5, 5));
        assert!(player.respawning);
        assert_eq!(player.last_safe, IVec2::new(4, 5));
    }

    #[test]
    fn test_spike_reverts_to_pre_move_tile() {
        let level = Level::builtin(0);
        let mut player = player_at(7, 5);
        player.last_safe = IVec2::new(2, 2);
        assert_eq!(
            try_move(&mut player, &level, Direction::Right),
            MoveOutcome::Hazard(HazardKind::Spike)
        );
        // Back to where the step started, not to last_safe
        assert_eq!(player.pos, IVec2::new(7, 5));
        assert!(!player.respawning);
    }

    #[test]
    fn test_transition_keeps_position() {
        let level = Level::builtin(0);
        let mut player = player_at(8, 13);
        assert_eq!(
            try_move(&mut player, &level, Direction::Down),
            MoveOutcome::Transition
        );
        assert_eq!(player.pos, IVec2::new(8, 14));
        // Exit tiles are not safe spots
        assert_ne!(player.last_safe, IVec2::new(8, 14));
    }
}
