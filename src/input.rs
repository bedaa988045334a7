//! Raw input to edge conversion
//!
//! The simulation consumes discrete edges, not held state. Each input source
//! owns one `EdgeTracker` that diffs consecutive raw snapshots; there is no
//! shared press-state map. Edge arrival time is implicit: edges are judged
//! against the clock state of the tick they are delivered in.

use serde::{Deserialize, Serialize};

use crate::grid::Direction;

/// A discrete input edge delivered to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEdge {
    /// Directional movement tap
    PressMove(Direction),
    /// Attack button down (starts a charge, may fire a light action)
    PressAttack(Direction),
    /// Attack button up (may resolve a heavy action)
    ReleaseAttack(Direction),
}

/// Raw held state of a pad/keyboard for one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadSnapshot {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub attack_up: bool,
    pub attack_down: bool,
    pub attack_left: bool,
    pub attack_right: bool,
}

impl PadSnapshot {
    fn move_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.move_up,
            Direction::Down => self.move_down,
            Direction::Left => self.move_left,
            Direction::Right => self.move_right,
        }
    }

    fn attack_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.attack_up,
            Direction::Down => self.attack_down,
            Direction::Left => self.attack_left,
            Direction::Right => self.attack_right,
        }
    }
}

/// Owned previous-snapshot state for one input source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeTracker {
    previous: PadSnapshot,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff a new snapshot against the previous one, producing this poll's
    /// edges. Movement taps fire on press only; attacks fire on both edges.
    pub fn diff(&mut self, snapshot: PadSnapshot) -> Vec<InputEdge> {
        let mut edges = Vec::new();
        for dir in Direction::ALL {
            if snapshot.move_held(dir) && !self.previous.move_held(dir) {
                edges.push(InputEdge::PressMove(dir));
            }
        }
        for dir in Direction::ALL {
            let now = snapshot.attack_held(dir);
            let was = self.previous.attack_held(dir);
            if now && !was {
                edges.push(InputEdge::PressAttack(dir));
            } else if !now && was {
                edges.push(InputEdge::ReleaseAttack(dir));
            }
        }
        self.previous = snapshot;
        edges
    }
}

/// WASD movement mapping
pub fn move_direction(key_code: &str) -> Option<Direction> {
    match key_code {
        "KeyW" => Some(Direction::Up),
        "KeyS" => Some(Direction::Down),
        "KeyA" => Some(Direction::Left),
        "KeyD" => Some(Direction::Right),
        _ => None,
    }
}

/// Arrow-key attack mapping
pub fn attack_direction(key_code: &str) -> Option<Direction> {
    match key_code {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}
