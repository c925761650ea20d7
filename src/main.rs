//! Grid Wars headless entry point
//!
//! Runs the simulation with scripted input for a fixed number of frames,
//! drawing every frame into a CPU sprite batch. Usage:
//!
//! ```text
//! grid-wars [settings.json] [frames]
//! ```

use std::path::Path;

use glam::Vec2;

use grid_wars::audio::{AudioSink, LogAudio};
use grid_wars::consts::{FRAME_DT, FRAME_RATE};
use grid_wars::renderer::SpriteBatch;
use grid_wars::sim::{GameEvent, GameState, TickInput, tick};
use grid_wars::{FileHighScore, HighScoreStore, Settings};

const DEFAULT_FRAMES: u64 = 3600;

/// Game instance holding all state
struct Game {
    state: GameState,
    batch: SpriteBatch,
    audio: LogAudio,
    high_scores: FileHighScore,
}

impl Game {
    fn new(settings: &Settings) -> Self {
        let high_scores = FileHighScore::new(&settings.high_score_path);
        let state = GameState::new(settings, high_scores.load());
        Self {
            state,
            batch: SpriteBatch::with_capacity(settings.max_particles()),
            audio: LogAudio::default(),
            high_scores,
        }
    }

    /// Circle strafe with a slowly rotating aim
    fn scripted_input(frame: u64) -> TickInput {
        let t = frame as f32 / FRAME_RATE;
        TickInput {
            movement: Vec2::from_angle(0.7 * t),
            aim: Vec2::from_angle(-1.3 * t),
            pause: false,
        }
    }

    fn step(&mut self) {
        let input = Self::scripted_input(self.state.frame);
        tick(&mut self.state, &input, FRAME_DT);

        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(sound) => self.audio.play(&sound),
                GameEvent::PlayerKilled => log::debug!("Ship destroyed, {} lives left", self.state.status.lives),
                GameEvent::NewHighScore(score) => {
                    if let Err(e) = self.high_scores.save(score) {
                        log::error!("Failed to save high score: {}", e);
                    }
                }
            }
        }

        self.batch.clear();
        self.state.draw(&mut self.batch);
    }

    fn log_progress(&self) {
        let status = &self.state.status;
        log::info!(
            "t={:>4}s score={} x{} lives={} | {} enemies, {} bullets, {} black holes, {} particles, {} sprites",
            self.state.frame / FRAME_RATE as u64,
            status.score,
            status.multiplier,
            status.lives,
            self.state.entities.enemy_count(),
            self.state.entities.bullet_count(),
            self.state.entities.black_hole_count(),
            self.state.particles.count(),
            self.batch.len()
        );
    }
}

fn main() {
    env_logger::init();
    log::info!("Grid Wars (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_from(Path::new(&path)),
        None => Settings::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::warn!("Bad frame count ({}), running {} frames", e, DEFAULT_FRAMES);
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let mut game = Game::new(&settings);
    for _ in 0..frames {
        game.step();
        if game.state.frame % FRAME_RATE as u64 == 0 {
            game.log_progress();
        }
    }

    let status = &game.state.status;
    log::info!(
        "Finished {} frames: score {}, high score {}, {} sounds played",
        game.state.frame,
        status.score,
        status.high_score.max(status.score),
        game.audio.played
    );
}
