mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::filter::EnvFilter;

use dodge_game::audio::{MusicPlayer, Silent, Soundtrack};
use dodge_game::compute::init_state;
use dodge_game::config::{Cli, TICK_MS};
use dodge_game::controller::{Command, GameController};
use dodge_game::entities::Direction;
use dodge_game::renderer::Renderer;

use crate::display::{viewport_for, TerminalRenderer};

const FRAME: Duration = Duration::from_millis(TICK_MS);

// ── Input mapping ─────────────────────────────────────────────────────────────

enum Action {
    Game(Command),
    Quit,
}

fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    let command = match code {
        KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::Up => Command::Move(Direction::Up),
        KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => Command::Start,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Game(command))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Every key press (and key repeat) is one discrete input, so holding an arrow
/// key moves the player at the terminal's repeat rate.  The simulation itself
/// advances exactly one tick per frame.
fn game_loop<R, S, G>(
    controller: &mut GameController<R, S, G>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()>
where
    R: Renderer,
    S: Soundtrack,
    G: Rng,
{
    controller.present()?;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match action_for(code, modifiers) {
                Some(Action::Quit) if kind == KeyEventKind::Press => return Ok(()),
                Some(Action::Game(command)) => controller.handle(command),
                _ => {}
            }
        }

        controller.handle(Command::Tick);
        controller.present()?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Logs go to a file because stdout belongs to the game screen.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn soundtrack_for(cli: &Cli) -> Box<dyn Soundtrack> {
    let Some(track) = &cli.music else {
        return Box::new(Silent);
    };
    Box::new(MusicPlayer::new(track.clone()))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.to_config().context("invalid game settings")?;
    let (cols, rows) = terminal::size().context("failed to read terminal size")?;
    let (width, height) = cli.viewport(viewport_for(cols, rows));
    config
        .validate_viewport(width, height)
        .context("terminal too small")?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(
        "starting: viewport={}x{} policy={:?} seed={:?}",
        width,
        height,
        config.escape_policy,
        cli.seed
    );

    let renderer = TerminalRenderer::new(BufWriter::new(stdout()), cols, rows);
    let state = init_state(config, width, height);
    let mut controller = GameController::new(state, renderer, soundtrack_for(&cli), rng);

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut controller, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();

    tracing::info!("exiting with score {}", controller.state().score);
    result.context("terminal i/o failed")
}
