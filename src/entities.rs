//! All game entity types — pure data, no logic.

use crate::config::GameConfig;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in viewport pixels.  `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive overlap test: rectangles that merely touch on an edge
    /// count as colliding.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit displacement for this direction (screen y grows downward).
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
        }
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Before the first start.  Never re-entered.
    Idle,
    Running,
    GameOver,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Stable identity used by renderers to track the sprite.
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Live enemies only: anything destroyed or escaped is already gone.
    pub enemies: Vec<Enemy>,
    pub score: u32,
    /// Remaining lives.  Only meaningful under `EscapePolicy::Lives`.
    pub lives: u32,
    pub phase: Phase,
    /// Shared horizontal speed of every enemy, in pixels per tick.
    pub enemy_speed: f32,
    pub spawn_interval_ms: u64,
    /// Ticks elapsed since the current run started.
    pub frame: u64,
    pub next_enemy_id: u64,
    pub width: f32,
    pub height: f32,
    pub config: GameConfig,
}

impl GameState {
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn player_rect(&self) -> Rect {
        Rect::new(
            self.player.x,
            self.player.y,
            self.config.player_width,
            self.config.player_height,
        )
    }

    pub fn enemy_rect(&self, enemy: &Enemy) -> Rect {
        Rect::new(
            enemy.x,
            enemy.y,
            self.config.enemy_width,
            self.config.enemy_height,
        )
    }
}
