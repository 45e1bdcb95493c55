//! Rendering layer — all terminal I/O lives here.
//!
//! `TerminalRenderer` keeps the scene the game loop describes through the
//! `Renderer` calls and redraws it as a whole on every `present`.  Pixels map
//! to character cells at `CELL_WIDTH_PX` × `CELL_HEIGHT_PX`.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use dodge_game::entities::Rect;
use dodge_game::renderer::{Overlay, Readout, Renderer, SpriteId};

pub const CELL_WIDTH_PX: f32 = 10.0;
pub const CELL_HEIGHT_PX: f32 = 20.0;

/// Row 0 holds the HUD, the last row the controls hint.
const PLAY_TOP: u16 = 1;
const RESERVED_ROWS: u16 = 2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Pixel viewport that fits a terminal of `cols` × `rows` cells.
pub fn viewport_for(cols: u16, rows: u16) -> (f32, f32) {
    (
        cols as f32 * CELL_WIDTH_PX,
        rows.saturating_sub(RESERVED_ROWS) as f32 * CELL_HEIGHT_PX,
    )
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    sprites: BTreeMap<SpriteId, Rect>,
    score: String,
    lives: Option<String>,
    start_prompt: bool,
    game_over: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            sprites: BTreeMap::new(),
            score: String::new(),
            lives: None,
            start_prompt: false,
            game_over: false,
        }
    }

    fn play_bottom(&self) -> u16 {
        self.rows.saturating_sub(1)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn place_sprite(&mut self, id: SpriteId, rect: Rect) {
        self.sprites.insert(id, rect);
    }

    fn remove_sprite(&mut self, id: SpriteId) {
        self.sprites.remove(&id);
    }

    fn set_readout(&mut self, readout: Readout, text: &str) {
        match readout {
            Readout::Score => self.score = text.to_string(),
            Readout::Lives => self.lives = Some(text.to_string()),
        }
    }

    fn set_overlay(&mut self, overlay: Overlay, visible: bool) {
        match overlay {
            Overlay::StartPrompt => self.start_prompt = visible,
            Overlay::GameOver => self.game_over = visible,
        }
    }

    /// Render one complete frame.
    fn present(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_hud()?;

        let enemies: Vec<Rect> = self
            .sprites
            .iter()
            .filter(|(id, _)| matches!(id, SpriteId::Enemy(_)))
            .map(|(_, rect)| *rect)
            .collect();
        for rect in &enemies {
            self.draw_block(rect, C_ENEMY, '▓')?;
        }
        if let Some(player) = self.sprites.get(&SpriteId::Player).copied() {
            self.draw_block(&player, C_PLAYER, '█')?;
        }

        self.draw_controls_hint()?;

        if self.start_prompt {
            self.draw_banner(&[("PRESS ENTER TO START", Color::Cyan)])?;
        }
        if self.game_over {
            let final_score = self.score.clone();
            self.draw_banner(&[
                ("╔════════════════════╗", Color::Red),
                ("║    GAME  OVER      ║", Color::Red),
                ("╚════════════════════╝", Color::Red),
                (final_score.as_str(), Color::Yellow),
                ("R - Play Again  Q - Quit", Color::White),
            ])?;
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

impl<W: Write> TerminalRenderer<W> {
    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(&self.score))?;

        if let Some(lives) = &self.lives {
            let col = self
                .cols
                .saturating_sub(lives.chars().count() as u16 + 1);
            self.out.queue(cursor::MoveTo(col, 0))?;
            self.out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
            self.out.queue(Print(lives))?;
        }
        Ok(())
    }

    // ── Sprites ───────────────────────────────────────────────────────────────

    /// Fill every cell the rectangle touches, clipped to the play area.
    /// Sprites still off-screen to the right or left are skipped.
    fn draw_block(&mut self, rect: &Rect, color: Color, glyph: char) -> io::Result<()> {
        let col_start = (rect.left() / CELL_WIDTH_PX).floor().max(0.0) as u16;
        let col_end = ((rect.right() / CELL_WIDTH_PX).ceil().max(0.0) as u16).min(self.cols);
        let row_start = ((rect.top() / CELL_HEIGHT_PX).floor().max(0.0) as u16)
            .saturating_add(PLAY_TOP);
        let row_end = ((rect.bottom() / CELL_HEIGHT_PX).ceil().max(0.0) as u16)
            .saturating_add(PLAY_TOP)
            .min(self.play_bottom());
        if col_start >= col_end {
            return Ok(());
        }

        let line: String = std::iter::repeat(glyph)
            .take((col_end - col_start) as usize)
            .collect();
        self.out.queue(style::SetForegroundColor(color))?;
        for row in row_start..row_end {
            self.out.queue(cursor::MoveTo(col_start, row))?;
            self.out.queue(Print(&line))?;
        }
        Ok(())
    }

    // ── Controls hint (last row) ──────────────────────────────────────────────

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print("← → ↑ ↓ : Move   ENTER : Start   R : Restart   Q : Quit"))?;
        Ok(())
    }

    // ── Overlays ──────────────────────────────────────────────────────────────

    fn draw_banner(&mut self, lines: &[(&str, Color)]) -> io::Result<()> {
        let cx = self.cols / 2;
        let start_row = (self.rows / 2).saturating_sub(lines.len() as u16 / 2);

        for (i, (msg, color)) in lines.iter().enumerate() {
            let row = start_row + i as u16;
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(*msg))?;
        }
        Ok(())
    }
}
