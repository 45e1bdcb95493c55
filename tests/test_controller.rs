use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use dodge_game::audio::{MusicPlayer, Soundtrack};
use dodge_game::compute::init_state;
use dodge_game::config::{EscapePolicy, GameConfig};
use dodge_game::controller::{Command, GameController};
use dodge_game::entities::*;
use dodge_game::error::AudioError;
use dodge_game::renderer::{Overlay, Readout, Renderer, SpriteId};

use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Test doubles ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingRenderer {
    sprites: HashMap<SpriteId, Rect>,
    removed: Vec<SpriteId>,
    readouts: HashMap<Readout, String>,
    overlays: HashMap<Overlay, bool>,
    frames: usize,
}

impl RecordingRenderer {
    fn overlay(&self, overlay: Overlay) -> bool {
        self.overlays.get(&overlay).copied().unwrap_or(false)
    }

    fn readout(&self, readout: Readout) -> Option<&str> {
        self.readouts.get(&readout).map(String::as_str)
    }

    fn enemy_sprites(&self) -> usize {
        self.sprites
            .keys()
            .filter(|id| matches!(id, SpriteId::Enemy(_)))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn place_sprite(&mut self, id: SpriteId, rect: Rect) {
        self.sprites.insert(id, rect);
    }

    fn remove_sprite(&mut self, id: SpriteId) {
        self.sprites.remove(&id);
        self.removed.push(id);
    }

    fn set_readout(&mut self, readout: Readout, text: &str) {
        self.readouts.insert(readout, text.to_string());
    }

    fn set_overlay(&mut self, overlay: Overlay, visible: bool) {
        self.overlays.insert(overlay, visible);
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}

#[derive(Default)]
struct ScriptedSoundtrack {
    fail: bool,
    plays: usize,
    pauses: usize,
}

impl Soundtrack for ScriptedSoundtrack {
    fn play(&mut self) -> Result<(), AudioError> {
        self.plays += 1;
        if self.fail {
            return Err(AudioError::Open {
                path: PathBuf::from("theme.ogg"),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }
}

type TestController = GameController<RecordingRenderer, ScriptedSoundtrack, StdRng>;

fn controller_for(state: GameState) -> TestController {
    GameController::new(
        state,
        RecordingRenderer::default(),
        ScriptedSoundtrack::default(),
        StdRng::seed_from_u64(42),
    )
}

fn idle_controller() -> TestController {
    controller_for(init_state(GameConfig::default(), 800.0, 600.0))
}

/// Running game with the player at (100, 100) and the given enemies.
fn running_controller(enemies: Vec<Enemy>) -> TestController {
    let mut s = init_state(GameConfig::default(), 800.0, 600.0);
    s.phase = Phase::Running;
    s.player = Player { x: 100.0, y: 100.0 };
    s.next_enemy_id = enemies.len() as u64;
    s.enemies = enemies;
    controller_for(s)
}

// ── Initial scene ─────────────────────────────────────────────────────────────

#[test]
fn initial_scene_is_drawn() {
    let c = idle_controller();
    let r = c.renderer();
    assert!(r.sprites.contains_key(&SpriteId::Player));
    assert_eq!(r.readout(Readout::Score), Some("Score: 0"));
    assert_eq!(r.readout(Readout::Lives), Some("Lives: 3"));
    assert!(r.overlay(Overlay::StartPrompt));
    assert!(!r.overlay(Overlay::GameOver));
}

#[test]
fn no_lives_readout_under_sudden_death() {
    let config = GameConfig {
        escape_policy: EscapePolicy::SuddenDeath,
        ..GameConfig::default()
    };
    let c = controller_for(init_state(config, 800.0, 600.0));
    assert_eq!(c.renderer().readout(Readout::Lives), None);
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn start_plays_music_and_hides_prompt() {
    let mut c = idle_controller();
    c.handle(Command::Start);
    assert_eq!(c.state().phase, Phase::Running);
    assert_eq!(c.soundtrack().plays, 1);
    assert!(!c.renderer().overlay(Overlay::StartPrompt));

    // The start button is gone after the first press
    c.handle(Command::Start);
    assert_eq!(c.soundtrack().plays, 1);
}

#[test]
fn ticks_before_start_do_nothing() {
    let mut c = idle_controller();
    for _ in 0..200 {
        c.handle(Command::Tick);
    }
    assert_eq!(c.state().frame, 0);
    assert_eq!(c.renderer().enemy_sprites(), 0);
}

#[test]
fn audio_failure_does_not_block_the_game() {
    let mut c = GameController::new(
        init_state(GameConfig::default(), 800.0, 600.0),
        RecordingRenderer::default(),
        ScriptedSoundtrack {
            fail: true,
            ..ScriptedSoundtrack::default()
        },
        StdRng::seed_from_u64(1),
    );
    c.handle(Command::Start);
    assert_eq!(c.state().phase, Phase::Running);
    for _ in 0..100 {
        c.handle(Command::Tick);
    }
    assert_eq!(c.state().enemies.len(), 1);
}

/// Collects formatted log lines so a test can assert on them.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn unplayable_track_is_logged_as_warning() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();

    let mut c = GameController::new(
        init_state(GameConfig::default(), 800.0, 600.0),
        RecordingRenderer::default(),
        MusicPlayer::new(PathBuf::from("/nonexistent/dodge-theme.ogg")),
        StdRng::seed_from_u64(1),
    );
    tracing::subscriber::with_default(subscriber, || c.handle(Command::Start));

    assert_eq!(c.state().phase, Phase::Running);
    assert!(!c.soundtrack().is_playing());
    let out = logs.contents();
    assert!(out.contains("WARN"), "{out}");
    assert!(out.contains("background music unavailable"), "{out}");
    assert!(out.contains("dodge-theme.ogg"), "{out}");
}

// ── Running ───────────────────────────────────────────────────────────────────

#[test]
fn spawned_enemy_gets_a_sprite() {
    let mut c = idle_controller();
    c.handle(Command::Start);
    for _ in 0..100 {
        c.handle(Command::Tick);
    }
    let id = c.state().enemies[0].id;
    let rect = c.renderer().sprites[&SpriteId::Enemy(id)];
    assert_eq!(rect.x, 800.0);
    assert_eq!(rect.width, 80.0);
}

#[test]
fn moving_enemy_sprite_follows_state() {
    let mut c = running_controller(vec![Enemy { id: 0, x: 500.0, y: 400.0 }]);
    c.handle(Command::Tick);
    assert_eq!(c.renderer().sprites[&SpriteId::Enemy(0)].x, 497.0);
}

#[test]
fn player_move_updates_sprite() {
    let mut c = running_controller(Vec::new());
    c.handle(Command::Move(Direction::Right));
    let rect = c.renderer().sprites[&SpriteId::Player];
    assert_eq!((rect.x, rect.y), (110.0, 100.0));
}

#[test]
fn collision_removes_sprite_and_updates_score() {
    let mut c = running_controller(vec![
        Enemy { id: 0, x: 150.0, y: 100.0 },
        Enemy { id: 1, x: 600.0, y: 400.0 },
    ]);
    c.handle(Command::Move(Direction::Right));
    assert_eq!(c.state().score, 10);
    assert_eq!(c.renderer().removed, vec![SpriteId::Enemy(0)]);
    assert!(c.renderer().sprites.contains_key(&SpriteId::Enemy(1)));
    assert_eq!(c.renderer().readout(Readout::Score), Some("Score: 10"));
}

#[test]
fn escape_updates_lives_readout() {
    let mut c = running_controller(vec![Enemy { id: 0, x: -48.0, y: 400.0 }]);
    c.handle(Command::Tick);
    assert_eq!(c.state().lives, 2);
    assert_eq!(c.renderer().readout(Readout::Lives), Some("Lives: 2"));
    assert_eq!(c.renderer().removed, vec![SpriteId::Enemy(0)]);
}

#[test]
fn present_flushes_a_frame() {
    let mut c = idle_controller();
    c.present().unwrap();
    c.present().unwrap();
    assert_eq!(c.renderer().frames, 2);
}

// ── Game over & restart ───────────────────────────────────────────────────────

fn finished_controller() -> TestController {
    let mut s = init_state(GameConfig::default(), 800.0, 600.0);
    s.phase = Phase::Running;
    s.player = Player { x: 100.0, y: 100.0 };
    s.lives = 1;
    s.score = 120;
    s.enemy_speed = 3.5;
    s.enemies = vec![
        Enemy { id: 0, x: -48.0, y: 400.0 },
        Enemy { id: 1, x: 400.0, y: 300.0 },
    ];
    s.next_enemy_id = 2;
    let mut c = controller_for(s);
    c.handle(Command::Tick);
    c
}

#[test]
fn game_over_shows_overlay_and_clears_enemies() {
    let c = finished_controller();
    assert!(c.state().is_game_over());
    assert!(c.state().enemies.is_empty());
    assert!(c.renderer().overlay(Overlay::GameOver));
    assert_eq!(c.renderer().enemy_sprites(), 0);
    assert_eq!(c.soundtrack().pauses, 1);
}

#[test]
fn nothing_moves_after_game_over() {
    let mut c = finished_controller();
    let frame = c.state().frame;
    for _ in 0..300 {
        c.handle(Command::Tick);
        c.handle(Command::Move(Direction::Down));
    }
    assert_eq!(c.state().frame, frame);
    assert!(c.state().enemies.is_empty());
    assert_eq!(c.state().player.y, 100.0);
    assert_eq!(c.soundtrack().pauses, 1);
}

#[test]
fn restart_resets_display_and_music() {
    let mut c = finished_controller();
    c.handle(Command::Restart);
    let s = c.state();
    assert_eq!(s.phase, Phase::Running);
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 3);
    assert_eq!(s.enemy_speed, 3.0);
    assert!(s.enemies.is_empty());

    let r = c.renderer();
    assert!(!r.overlay(Overlay::GameOver));
    assert_eq!(r.readout(Readout::Score), Some("Score: 0"));
    assert_eq!(r.readout(Readout::Lives), Some("Lives: 3"));
    assert_eq!(c.soundtrack().plays, 1);

    // Spawning resumes on the normal schedule
    for _ in 0..100 {
        c.handle(Command::Tick);
    }
    assert_eq!(c.state().enemies.len(), 1);
    assert_eq!(c.state().enemies[0].id, 2);
}

#[test]
fn restart_ignored_before_start() {
    let mut c = idle_controller();
    c.handle(Command::Restart);
    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.soundtrack().plays, 0);
    assert!(c.renderer().overlay(Overlay::StartPrompt));
}
