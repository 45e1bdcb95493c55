//! The game loop controller: owns the state and drives the renderer and the
//! soundtrack from it.
//!
//! Game rules live in `compute`; this layer turns a `Command` into the next
//! state, then reports what changed to the display, the audio and the log.

use std::io;

use rand::Rng;

use crate::audio::Soundtrack;
use crate::compute::{move_player, restart, start, tick};
use crate::entities::{Direction, GameState, Phase};
use crate::renderer::{sync, Renderer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// The start button.  Only honoured once.
    Start,
    /// The restart button.
    Restart,
    /// One fixed-interval step of the simulation.
    Tick,
}

pub struct GameController<R, S, G> {
    state: GameState,
    renderer: R,
    soundtrack: S,
    rng: G,
}

impl<R: Renderer, S: Soundtrack, G: Rng> GameController<R, S, G> {
    /// Draws the initial scene; nothing moves until `Command::Start`.
    pub fn new(state: GameState, mut renderer: R, soundtrack: S, rng: G) -> Self {
        sync(&mut renderer, None, &state);
        Self {
            state,
            renderer,
            soundtrack,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn soundtrack(&self) -> &S {
        &self.soundtrack
    }

    pub fn handle(&mut self, command: Command) {
        let prev = self.state.phase;
        let next = match command {
            Command::Move(direction) => move_player(&self.state, direction),
            Command::Start => start(&self.state),
            Command::Restart => restart(&self.state),
            Command::Tick => tick(&self.state, &mut self.rng),
        };

        match command {
            Command::Start if prev == Phase::Idle => {
                tracing::info!("game started");
                self.resume_music();
            }
            Command::Restart if prev != Phase::Idle => {
                tracing::info!("game restarted (previous score {})", self.state.score);
                self.resume_music();
            }
            _ => {}
        }

        self.commit(next);
    }

    /// Push the frame built up since the last call to the display.
    pub fn present(&mut self) -> io::Result<()> {
        self.renderer.present()
    }

    fn commit(&mut self, next: GameState) {
        log_changes(&self.state, &next);
        if self.state.phase != Phase::GameOver && next.phase == Phase::GameOver {
            tracing::info!("game over: score={} frame={}", next.score, next.frame);
            self.soundtrack.pause();
        }
        sync(&mut self.renderer, Some(&self.state), &next);
        self.state = next;
    }

    fn resume_music(&mut self) {
        if let Err(err) = self.soundtrack.play() {
            tracing::warn!("background music unavailable: {err}");
        }
    }
}

fn log_changes(prev: &GameState, next: &GameState) {
    if next.frame == 0 {
        return;
    }
    if next.next_enemy_id != prev.next_enemy_id {
        tracing::debug!("enemy {} spawned", prev.next_enemy_id);
    }
    if next.enemy_speed > prev.enemy_speed {
        tracing::debug!("enemy speed now {:.2}", next.enemy_speed);
    }
    if next.score > prev.score {
        tracing::debug!("score {} -> {}", prev.score, next.score);
    }
    if next.lives < prev.lives {
        tracing::debug!("enemy escaped, {} lives left", next.lives);
    } else if next.lives > prev.lives {
        tracing::debug!("extra life, {} lives", next.lives);
    }
}
