//! Tile map and grid directions
//!
//! The level is a static 16x16 tile grid queried read-only by the
//! simulation. Out-of-bounds reads are `None` and treated as non-walkable.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{GRID_HEIGHT, GRID_WIDTH};

/// Tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    Pit,
    Spike,
    AreaTransition,
}

impl TileKind {
    /// Plain floor: the only tile that updates an actor's safe spot
    pub fn is_safe(&self) -> bool {
        matches!(self, TileKind::Floor)
    }
}

/// The four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit grid offset (y grows downward)
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// One step from `pos` in `dir`
pub fn step(pos: IVec2, dir: Direction) -> IVec2 {
    pos + dir.delta()
}

/// A static tile map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    width: i32,
    height: i32,
    /// Row-major, y * width + x
    tiles: Vec<TileKind>,
}

impl Level {
    /// Empty walled room
    pub fn walled(width: i32, height: i32) -> Self {
        let mut tiles = vec![TileKind::Floor; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
                    tiles[(y * width + x) as usize] = TileKind::Wall;
                }
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Built-in area layouts (index wraps on overflow)
    pub fn builtin(area_index: u32) -> Self {
        let mut level = Self::walled(GRID_WIDTH, GRID_HEIGHT);
        if area_index == 0 {
            level.set_tile(IVec2::new(5, 5), TileKind::Pit);
            level.set_tile(IVec2::new(8, 5), TileKind::Spike);
            level.set_tile(IVec2::new(5, 8), TileKind::Wall);
            // Exit at bottom
            level.set_tile(
                IVec2::new(GRID_WIDTH / 2, GRID_HEIGHT - 2),
                TileKind::AreaTransition,
            );
        } else {
            level.set_tile(IVec2::new(4, 4), TileKind::Wall);
            level.set_tile(IVec2::new(12, 4), TileKind::Wall);
            level.set_tile(IVec2::new(4, 12), TileKind::Wall);
            level.set_tile(IVec2::new(12, 12), TileKind::Wall);
            // Exit at top
            level.set_tile(IVec2::new(GRID_WIDTH / 2, 1), TileKind::AreaTransition);
        }
        level
    }

    /// Player spawn point for a built-in area
    pub fn spawn_point(area_index: u32) -> IVec2 {
        if area_index == 0 {
            IVec2::new(2, 2)
        } else {
            IVec2::new(8, 12)
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Tile at `pos`, or `None` out of bounds
    pub fn tile_at(&self, pos: IVec2) -> Option<TileKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[(pos.y * self.width + pos.x) as usize])
    }

    /// Walls and out-of-bounds are not walkable; everything else is
    pub fn is_walkable(&self, pos: IVec2) -> bool {
        matches!(
            self.tile_at(pos),
            Some(kind) if kind != TileKind::Wall
        )
    }

    pub fn set_tile(&mut self, pos: IVec2, kind: TileKind) {
        if self.in_bounds(pos) {
            self.tiles[(pos.y * self.width + pos.x) as usize] = kind;
        }
    }

    /// Load external level data
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
