//! Enemy actors
//!
//! Enemies act on beat boundaries only. Behavior is trivial by design
//! (random walk / adjacency attack); randomness is derived per decision from
//! the session seed so replays with the same seed match exactly.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::grid::{self, Direction, Level};

/// Enemy behavior classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Never moves
    Static,
    /// Random walk each beat
    Wanderer,
    /// Attacks an adjacent player, otherwise random walks
    Aggressive,
}

/// What an enemy did this beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    None,
    Moved { from: IVec2, to: IVec2 },
    AttackedPlayer,
}

/// An enemy actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: IVec2,
}

impl Enemy {
    pub fn new(id: u32, pos: IVec2, kind: EnemyKind) -> Self {
        Self { id, pos, kind }
    }

    /// Deterministic per-decision RNG keyed by session seed, beat, and id
    fn beat_rng(&self, seed: u64, beat: u64) -> Pcg32 {
        let mixed = beat
            .wrapping_mul(2654435761)
            .wrapping_add(seed)
            .wrapping_add((self.id as u64) << 32);
        Pcg32::seed_from_u64(mixed)
    }

    /// One beat of behavior. `occupied` holds every current actor position
    /// (other enemies and the player); enemies never share a tile.
    pub fn act_on_beat(
        &mut self,
        beat: u64,
        seed: u64,
        level: &Level,
        player_pos: IVec2,
        occupied: &[IVec2],
    ) -> EnemyAction {
        match self.kind {
            EnemyKind::Static => EnemyAction::None,
            EnemyKind::Wanderer => self.wander(beat, seed, level, player_pos, occupied),
            EnemyKind::Aggressive => {
                if manhattan(self.pos, player_pos) == 1 {
                    EnemyAction::AttackedPlayer
                } else {
                    self.wander(beat, seed, level, player_pos, occupied)
                }
            }
        }
    }

    /// Up to four attempts at a random step; gives up rather than forcing one
    fn wander(
        &mut self,
        beat: u64,
        seed: u64,
        level: &Level,
        player_pos: IVec2,
        occupied: &[IVec2],
    ) -> EnemyAction {
        let mut rng = self.beat_rng(seed, beat);
        for _ in 0..4 {
            let dir = Direction::ALL[rng.random_range(0..4)];
            let target = grid::step(self.pos, dir);
            if !level.is_walkable(target) {
                continue;
            }
            if target == player_pos || occupied.contains(&target) {
                continue;
            }
            let from = self.pos;
            self.pos = target;
            return EnemyAction::Moved { from, to: target };
        }
        EnemyAction::None
    }
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
