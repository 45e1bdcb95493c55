//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::config::{ticks_for, EscapePolicy, GameConfig};
use crate::entities::{Direction, Enemy, GameState, Phase, Player};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the idle pre-game state for a viewport of `width` × `height` pixels.
pub fn init_state(config: GameConfig, width: f32, height: f32) -> GameState {
    let max_x = (width - config.player_width).max(0.0);
    let max_y = (height - config.player_height).max(0.0);
    GameState {
        player: Player {
            x: (width / 8.0).floor().min(max_x),
            y: (max_y / 2.0).floor(),
        },
        enemies: Vec::new(),
        score: 0,
        lives: config.starting_lives,
        phase: Phase::Idle,
        enemy_speed: config.initial_enemy_speed,
        spawn_interval_ms: config.spawn_interval_ms,
        frame: 0,
        next_enemy_id: 0,
        width,
        height,
        config,
    }
}

// ── Lifecycle transitions ────────────────────────────────────────────────────

/// Leave `Idle`.  Only the very first start has any effect.
pub fn start(state: &GameState) -> GameState {
    if state.phase != Phase::Idle {
        return state.clone();
    }
    GameState {
        phase: Phase::Running,
        ..state.clone()
    }
}

/// Put every counter back to its starting value and resume play.
/// Ignored before the first start.
pub fn restart(state: &GameState) -> GameState {
    if state.phase == Phase::Idle {
        return state.clone();
    }
    let (x, y) = clamp_player(state, state.player.x, state.player.y);
    GameState {
        player: Player { x, y },
        enemies: Vec::new(),
        score: 0,
        lives: state.config.starting_lives,
        phase: Phase::Running,
        enemy_speed: state.config.initial_enemy_speed,
        spawn_interval_ms: state.config.spawn_interval_ms,
        frame: 0,
        ..state.clone()
    }
}

/// Terminal state until restart: the flag is raised and every enemy is dropped.
pub fn game_over(state: &GameState) -> GameState {
    GameState {
        phase: Phase::GameOver,
        enemies: Vec::new(),
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player(state: &GameState, direction: Direction) -> GameState {
    if state.is_game_over() {
        return state.clone();
    }
    let (dx, dy) = direction.delta();
    let step = state.config.player_step;
    let (x, y) = clamp_player(state, state.player.x + dx * step, state.player.y + dy * step);
    let moved = GameState {
        player: Player { x, y },
        ..state.clone()
    };
    resolve_collisions(&moved)
}

fn clamp_player(state: &GameState, x: f32, y: f32) -> (f32, f32) {
    let max_x = (state.width - state.config.player_width).max(0.0);
    let max_y = (state.height - state.config.player_height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

// ── Collision pass ───────────────────────────────────────────────────────────

/// Remove every enemy touching the player and award points for each one.
/// All overlaps are handled in a single pass.
pub fn resolve_collisions(state: &GameState) -> GameState {
    let player = state.player_rect();
    let (hit, survivors): (Vec<Enemy>, Vec<Enemy>) = state
        .enemies
        .iter()
        .cloned()
        .partition(|e| state.enemy_rect(e).overlaps(&player));
    if hit.is_empty() {
        return state.clone();
    }

    let gained = state.config.points_per_kill.saturating_mul(hit.len() as u32);
    let score = state.score.saturating_add(gained);
    let lives = state.lives + extra_lives_earned(&state.config, state.score, score);

    GameState {
        enemies: survivors,
        score,
        lives,
        ..state.clone()
    }
}

/// Lives granted for the score milestones crossed going from `before` to `after`.
pub fn extra_lives_earned(config: &GameConfig, before: u32, after: u32) -> u32 {
    if !config.tracks_lives() || config.extra_life_every == 0 {
        return 0;
    }
    after / config.extra_life_every - before / config.extra_life_every
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Does nothing unless the game is running, so no enemy moves or spawns
/// after game-over.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.phase != Phase::Running {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Difficulty ────────────────────────────────────────────────────────
    let enemy_speed = if frame % state.config.speed_up_every_ticks() == 0 {
        state.enemy_speed + state.config.speed_increment
    } else {
        state.enemy_speed
    };

    // ── 2. Move enemies left, dropping the ones that escaped ─────────────────
    let threshold = state.config.escape_threshold;
    let mut escaped: u32 = 0;
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .filter_map(|e| {
            let x = e.x - enemy_speed;
            if x < threshold {
                escaped += 1;
                None
            } else {
                Some(Enemy { x, ..e.clone() })
            }
        })
        .collect();

    let moved = GameState {
        enemies,
        enemy_speed,
        frame,
        ..state.clone()
    };

    // ── 3. Escape policy ─────────────────────────────────────────────────────
    let moved = apply_escapes(&moved, escaped);
    if moved.is_game_over() {
        return moved;
    }

    // ── 4. Spawn ─────────────────────────────────────────────────────────────
    let spawned = if frame % ticks_for(moved.spawn_interval_ms) == 0 {
        spawn_enemy(&moved, rng)
    } else {
        moved
    };

    // ── 5. Collisions ────────────────────────────────────────────────────────
    resolve_collisions(&spawned)
}

fn apply_escapes(state: &GameState, escaped: u32) -> GameState {
    if escaped == 0 {
        return state.clone();
    }
    match state.config.escape_policy {
        EscapePolicy::SuddenDeath => game_over(state),
        EscapePolicy::Lives => {
            let lives = state.lives.saturating_sub(escaped);
            let next = GameState {
                lives,
                ..state.clone()
            };
            if lives == 0 {
                game_over(&next)
            } else {
                next
            }
        }
    }
}

/// Add one enemy just past the right edge at a random height.
pub fn spawn_enemy(state: &GameState, rng: &mut impl Rng) -> GameState {
    let max_y = (state.height - state.config.enemy_height).max(0.0);
    let enemy = Enemy {
        id: state.next_enemy_id,
        x: state.width,
        y: rng.gen_range(0.0..=max_y),
    };
    let mut enemies = state.enemies.clone();
    enemies.push(enemy);
    GameState {
        enemies,
        next_enemy_id: state.next_enemy_id + 1,
        ..state.clone()
    }
}
