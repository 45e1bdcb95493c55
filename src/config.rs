//! Gameplay constants and the command-line surface that overrides them.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;

/// Length of one simulation step.
pub const TICK_MS: u64 = 20;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_PLAYER_SIZE: f32 = 40.0;
pub const DEFAULT_PLAYER_STEP: f32 = 10.0;
pub const DEFAULT_ENEMY_SIZE: f32 = 80.0;
pub const DEFAULT_ENEMY_SPEED: f32 = 3.0;
pub const DEFAULT_SPEED_INCREMENT: f32 = 0.03;
pub const DEFAULT_SPEED_INCREASE_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_SPAWN_INTERVAL_MS: u64 = 2_000;
/// An enemy whose x drops below this has escaped.
pub const DEFAULT_ESCAPE_THRESHOLD: f32 = -50.0;
pub const DEFAULT_POINTS_PER_KILL: u32 = 10;
pub const DEFAULT_LIVES: u32 = 3;
pub const DEFAULT_EXTRA_LIFE_EVERY: u32 = 1_000;
/// Largest viewport side accepted from the command line.
pub const MAX_VIEWPORT_PX: f32 = 100_000.0;

/// What happens when an enemy crosses the left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EscapePolicy {
    /// Lose one life per escape; the game ends when lives reach zero.
    /// Score milestones award extra lives.
    Lives,
    /// The first escape ends the game.  No lives, no bonus.
    SuddenDeath,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub player_width: f32,
    pub player_height: f32,
    pub player_step: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub initial_enemy_speed: f32,
    pub speed_increment: f32,
    pub speed_increase_interval_ms: u64,
    pub spawn_interval_ms: u64,
    pub escape_threshold: f32,
    pub points_per_kill: u32,
    pub escape_policy: EscapePolicy,
    pub starting_lives: u32,
    /// Score step that grants one life under `EscapePolicy::Lives`.  0 disables.
    pub extra_life_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_width: DEFAULT_PLAYER_SIZE,
            player_height: DEFAULT_PLAYER_SIZE,
            player_step: DEFAULT_PLAYER_STEP,
            enemy_width: DEFAULT_ENEMY_SIZE,
            enemy_height: DEFAULT_ENEMY_SIZE,
            initial_enemy_speed: DEFAULT_ENEMY_SPEED,
            speed_increment: DEFAULT_SPEED_INCREMENT,
            speed_increase_interval_ms: DEFAULT_SPEED_INCREASE_INTERVAL_MS,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            escape_threshold: DEFAULT_ESCAPE_THRESHOLD,
            points_per_kill: DEFAULT_POINTS_PER_KILL,
            escape_policy: EscapePolicy::Lives,
            starting_lives: DEFAULT_LIVES,
            extra_life_every: DEFAULT_EXTRA_LIFE_EVERY,
        }
    }
}

impl GameConfig {
    /// Ticks between two enemy speed increases.
    pub fn speed_up_every_ticks(&self) -> u64 {
        ticks_for(self.speed_increase_interval_ms)
    }

    pub fn tracks_lives(&self) -> bool {
        self.escape_policy == EscapePolicy::Lives
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("player width", self.player_width),
            ("player height", self.player_height),
            ("player step", self.player_step),
            ("enemy width", self.enemy_width),
            ("enemy height", self.enemy_height),
            ("enemy speed", self.initial_enemy_speed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.speed_increment >= 0.0) {
            return Err(ConfigError::Negative {
                field: "speed increment",
                value: self.speed_increment,
            });
        }
        for (field, ms) in [
            ("spawn interval", self.spawn_interval_ms),
            ("speed increase interval", self.speed_increase_interval_ms),
        ] {
            if ms < TICK_MS {
                return Err(ConfigError::IntervalTooShort {
                    field,
                    ms,
                    tick_ms: TICK_MS,
                });
            }
        }
        if self.tracks_lives() && self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        Ok(())
    }

    /// Both sprites must fit inside the viewport so clamping ranges stay valid.
    pub fn validate_viewport(&self, width: f32, height: f32) -> Result<(), ConfigError> {
        let min_width = self.player_width.max(self.enemy_width);
        let min_height = self.player_height.max(self.enemy_height);
        if width < min_width || height < min_height {
            return Err(ConfigError::ViewportTooSmall {
                width,
                height,
                min_width,
                min_height,
            });
        }
        Ok(())
    }
}

/// Whole ticks in `ms`, never less than one.
pub fn ticks_for(ms: u64) -> u64 {
    (ms / TICK_MS).max(1)
}

// ── Command line ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "dodge_game")]
#[command(about = "Dodge the incoming enemies, ram them for points")]
pub struct Cli {
    /// Viewport width in pixels (defaults to the terminal width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in pixels (defaults to the terminal height)
    #[arg(long)]
    pub height: Option<u32>,

    /// What an escaped enemy costs
    #[arg(long, value_enum, default_value_t = EscapePolicy::Lives)]
    pub escape_policy: EscapePolicy,

    /// Starting lives (lives policy only)
    #[arg(long, default_value_t = DEFAULT_LIVES)]
    pub lives: u32,

    /// Grant a life every N points, 0 to disable (lives policy only)
    #[arg(long, default_value_t = DEFAULT_EXTRA_LIFE_EVERY)]
    pub extra_life_every: u32,

    /// Initial enemy speed in pixels per tick
    #[arg(long, default_value_t = DEFAULT_ENEMY_SPEED)]
    pub enemy_speed: f32,

    /// Speed added to every enemy on each increase
    #[arg(long, default_value_t = DEFAULT_SPEED_INCREMENT)]
    pub speed_increment: f32,

    #[arg(long, default_value_t = DEFAULT_SPAWN_INTERVAL_MS)]
    pub spawn_interval_ms: u64,

    #[arg(long, default_value_t = DEFAULT_SPEED_INCREASE_INTERVAL_MS)]
    pub speed_increase_interval_ms: u64,

    /// Seed for reproducible enemy placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Background music file
    #[arg(long)]
    pub music: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG controls the filter)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn to_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            initial_enemy_speed: self.enemy_speed,
            speed_increment: self.speed_increment,
            spawn_interval_ms: self.spawn_interval_ms,
            speed_increase_interval_ms: self.speed_increase_interval_ms,
            escape_policy: self.escape_policy,
            starting_lives: self.lives,
            extra_life_every: self.extra_life_every,
            ..GameConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Explicit `--width`/`--height` win over the measured fallback.
    /// Either side is capped at `MAX_VIEWPORT_PX`.
    pub fn viewport(&self, fallback: (f32, f32)) -> (f32, f32) {
        let width = self.width.map(|w| w as f32).unwrap_or(fallback.0);
        let height = self.height.map(|h| h as f32).unwrap_or(fallback.1);
        (width.min(MAX_VIEWPORT_PX), height.min(MAX_VIEWPORT_PX))
    }
}
