//! Session state and outbound events
//!
//! Everything the simulation owns for one play session lives here. State is
//! serializable and deterministic; presentation consumes the drained event
//! queue and never reaches back in.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::charge::ChargeInput;
use super::clock::BeatClock;
use super::enemy::{Enemy, EnemyKind};
use super::motion::HazardKind;
use super::movement::MovementIntent;
use crate::config::{ConfigError, RhythmConfig};
use crate::consts::PLAYER_MAX_HP;
use crate::grid::{Direction, Level};

/// Attack strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTier {
    Light,
    Heavy,
}

/// Informational events for presentation, drained once per tick.
/// The core never requires acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BeatFired(u64),
    HalfBeatFired(u64),
    MoveCommitted { from: IVec2, to: IVec2 },
    MoveBlocked { direction: Direction },
    /// Primed visual cue (awaiting confirmation)
    IntentPrimed { direction: Direction },
    /// Reset visual cue (miss or momentum loss)
    IntentReset,
    HazardTriggered { kind: HazardKind },
    ActionResolved { direction: Direction, tier: AttackTier },
    TransitionTriggered,
    AreaChanged { index: u32 },
    HpChanged { hp: i32 },
    EnemyMoved { id: u32, from: IVec2, to: IVec2 },
    EnemyStruckPlayer { id: u32 },
    EnemyDefeated { id: u32 },
    PlayerDied,
    PlayerRespawned { at: IVec2 },
}

/// The player actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Grid coordinate
    pub pos: IVec2,
    pub hp: i32,
    /// Most recent plain floor tile stood on; pit falls restore here
    pub last_safe: IVec2,
    /// Fell in a pit; waiting for the next beat to restore position
    pub respawning: bool,
    pub movement: MovementIntent,
    pub charge: ChargeInput,
}

impl Player {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            hp: PLAYER_MAX_HP,
            last_safe: pos,
            respawning: false,
            movement: MovementIntent::new(),
            charge: ChargeInput::new(),
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducible enemy behavior
    pub seed: u64,
    pub config: RhythmConfig,
    /// One clock per session; survives area transitions
    pub clock: BeatClock,
    pub area_index: u32,
    pub level: Level,
    pub player: Player,
    /// Sorted by id for determinism
    pub enemies: Vec<Enemy>,
    /// An exit tile was stepped on; the switch happens at the next beat
    pub pending_transition: bool,
    pub game_over: bool,
    /// Beats elapsed since death, for the restart delay
    pub death_beats: u32,
    /// Outbound queue, drained by the host each tick
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session on the given area with validated config
    pub fn new(config: RhythmConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = BeatClock::new(config.bpm)?;
        let mut state = Self {
            seed,
            config,
            clock,
            area_index: 0,
            level: Level::builtin(0),
            player: Player::new(Level::spawn_point(0)),
            enemies: Vec::new(),
            pending_transition: false,
            game_over: false,
            death_beats: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.enemies = state.spawn_enemies(0);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_enemies(&mut self, area_index: u32) -> Vec<Enemy> {
        let roster: &[(i32, i32, EnemyKind)] = if area_index == 0 {
            &[
                (4, 4, EnemyKind::Static),
                (8, 8, EnemyKind::Wanderer),
                (10, 4, EnemyKind::Aggressive),
            ]
        } else {
            &[(6, 6, EnemyKind::Aggressive)]
        };
        roster
            .iter()
            .map(|&(x, y, kind)| {
                let id = self.next_entity_id();
                Enemy::new(id, IVec2::new(x, y), kind)
            })
            .collect()
    }

    /// Load an area: fresh level, player, and enemies. The clock keeps
    /// running; tempo belongs to the session, not the area.
    pub fn load_area(&mut self, area_index: u32) {
        log::info!("loading area {area_index}");
        self.area_index = area_index;
        self.level = Level::builtin(area_index);
        self.player = Player::new(Level::spawn_point(area_index));
        self.enemies = self.spawn_enemies(area_index);
        self.pending_transition = false;
        self.game_over = false;
        self.death_beats = 0;
        self.push_event(GameEvent::AreaChanged { index: area_index });
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's events, in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
