//! Display capability used by the game loop.
//!
//! The core never talks to a concrete display.  A `Renderer` only knows how to
//! place and remove sprites at pixel coordinates, update text readouts, and
//! toggle overlays; `sync` works out which of those calls a state change needs.

use std::io;

use crate::entities::{GameState, Phase, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteId {
    Player,
    Enemy(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Readout {
    Score,
    Lives,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Shown until the first start.
    StartPrompt,
    GameOver,
}

pub trait Renderer {
    /// Show `id` at `rect`, creating it if needed.
    fn place_sprite(&mut self, id: SpriteId, rect: Rect);
    fn remove_sprite(&mut self, id: SpriteId);
    fn set_readout(&mut self, readout: Readout, text: &str);
    fn set_overlay(&mut self, overlay: Overlay, visible: bool);
    /// Flush everything queued since the last frame to the display.
    fn present(&mut self) -> io::Result<()>;
}

pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

pub fn lives_text(lives: u32) -> String {
    format!("Lives: {lives}")
}

/// Issue the renderer calls that take the display from `prev` to `next`.
/// With no `prev`, everything in `next` is drawn from scratch.
pub fn sync<R: Renderer + ?Sized>(renderer: &mut R, prev: Option<&GameState>, next: &GameState) {
    let Some(prev) = prev else {
        renderer.place_sprite(SpriteId::Player, next.player_rect());
        for enemy in &next.enemies {
            renderer.place_sprite(SpriteId::Enemy(enemy.id), next.enemy_rect(enemy));
        }
        renderer.set_readout(Readout::Score, &score_text(next.score));
        if next.config.tracks_lives() {
            renderer.set_readout(Readout::Lives, &lives_text(next.lives));
        }
        renderer.set_overlay(Overlay::StartPrompt, next.phase == Phase::Idle);
        renderer.set_overlay(Overlay::GameOver, next.phase == Phase::GameOver);
        return;
    };

    if prev.player != next.player {
        renderer.place_sprite(SpriteId::Player, next.player_rect());
    }

    // Enemies that are gone: destroyed, escaped, or cleared by game-over/restart.
    for enemy in &prev.enemies {
        if !next.enemies.iter().any(|e| e.id == enemy.id) {
            renderer.remove_sprite(SpriteId::Enemy(enemy.id));
        }
    }
    for enemy in &next.enemies {
        let unchanged = prev.enemies.iter().any(|e| e == enemy);
        if !unchanged {
            renderer.place_sprite(SpriteId::Enemy(enemy.id), next.enemy_rect(enemy));
        }
    }

    if prev.score != next.score {
        renderer.set_readout(Readout::Score, &score_text(next.score));
    }
    if next.config.tracks_lives() && prev.lives != next.lives {
        renderer.set_readout(Readout::Lives, &lives_text(next.lives));
    }

    if prev.phase != next.phase {
        if prev.phase == Phase::Idle {
            renderer.set_overlay(Overlay::StartPrompt, false);
        }
        renderer.set_overlay(Overlay::GameOver, next.phase == Phase::GameOver);
    }
}
