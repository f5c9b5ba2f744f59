//! Shared mutable world state.
//!
//! One [`WorldState`] holds everything a tick touches: the player, the enemy
//! roster, projectiles, pickups, the camera and the frame counter. Systems
//! take it by `&mut` and run strictly one after another, so there is no
//! locking; ordering inside the tick is the only discipline.

use serde::{Deserialize, Serialize};
use tracing::info;

use quest_common::{Bounded, Rect};

use crate::config::SimConfig;
use crate::enemy::Enemy;
use crate::entity::Player;
use crate::events::{EventBus, GameEvent, SoundCue};
use crate::particles::{ParticleKind, ParticleSystem};
use crate::pickup::{Pickup, Trophy};
use crate::projectile::Projectile;
use crate::rng::RollSource;
use crate::schedule::{ScheduledAction, Scheduler};

/// Seed of the cosmetic particle RNG.
const FX_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Top-level game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Simulation running
    #[default]
    Playing,
    /// Frozen by the player
    Paused,
    /// Player died
    GameOver,
    /// Level exit reached
    LevelComplete,
    /// Final level finished
    GameComplete,
}

/// Horizontal extent of the current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    /// Left wall
    pub left: f32,
    /// Right wall
    pub right: f32,
}

impl LevelBounds {
    /// Bounds from zero to `width`.
    #[must_use]
    pub fn new(width: f32) -> Self {
        Self {
            left: 0.0,
            right: width,
        }
    }
}

/// Everything the simulation mutates during a tick.
#[derive(Debug)]
pub struct WorldState {
    /// Tunables
    pub config: SimConfig,
    /// Current level number
    pub level: u32,
    /// Level walls
    pub bounds: LevelBounds,
    /// Camera left edge
    pub camera_x: f32,
    /// Tick counter
    pub frame: u64,
    /// Game state
    pub state: GameState,
    /// Boss intro freezing combat
    pub cutscene_active: bool,
    /// The player
    pub player: Player,
    /// Enemy roster, corpses included
    pub enemies: Vec<Enemy>,
    /// Live projectiles
    pub projectiles: Vec<Projectile>,
    /// Coins, hearts, scrolls, keys and Claire
    pub pickups: Vec<Pickup>,
    /// Level exits
    pub trophies: Vec<Trophy>,
    /// Cosmetic particles
    pub particles: ParticleSystem,
    /// Coins collected this run
    pub coins: u32,
    /// Enemies killed this run
    pub kills: u32,
    /// Narrative queue
    pub scheduler: Scheduler,
    /// Sound cues are suppressed
    pub muted: bool,
    /// Outgoing events
    pub events: EventBus,
    /// Gameplay rolls
    pub rng: Box<dyn RollSource + Send>,
}

impl WorldState {
    /// Creates an empty world with no level loaded.
    #[must_use]
    pub fn new(config: SimConfig, rng: Box<dyn RollSource + Send>) -> Self {
        let player = Player::spawn(&config, 0.0);
        let particles = ParticleSystem::new(config.particle_cap, FX_SEED);
        Self {
            bounds: LevelBounds::new(config.viewport_width),
            config,
            level: 0,
            camera_x: 0.0,
            frame: 0,
            state: GameState::Playing,
            cutscene_active: false,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            trophies: Vec::new(),
            particles,
            coins: 0,
            kills: 0,
            scheduler: Scheduler::new(),
            muted: false,
            events: EventBus::default(),
            rng,
        }
    }

    /// Publishes an event.
    pub fn emit(&self, event: GameEvent) {
        self.events.publish(event);
    }

    /// Plays a cue at its channel volume. Nothing plays while muted.
    pub fn play(&self, cue: SoundCue) {
        if !self.muted {
            self.emit(GameEvent::sound(cue, &self.config));
        }
    }

    /// Plays a cue at a fraction of its channel volume.
    pub fn play_scaled(&self, cue: SoundCue, scale: f32) {
        if self.muted {
            return;
        }
        self.emit(GameEvent::Sound {
            cue,
            volume: cue.channel().volume(&self.config) * scale,
        });
    }

    /// Emits a particle burst at the middle of a box.
    pub fn burst_at(&mut self, kind: ParticleKind, rect: &Rect) {
        self.particles
            .burst(kind, rect.center_x(), rect.center_y() - 20.0);
    }

    /// Whether `x` lies in the active band around the camera.
    #[must_use]
    pub fn in_view(&self, x: f32) -> bool {
        x >= self.camera_x - self.config.view_margin_behind
            && x <= self.camera_x + self.config.viewport_width + self.config.view_margin_ahead
    }

    /// Keeps a drop position away from the level walls.
    #[must_use]
    pub fn clamp_drop_x(&self, x: f32) -> f32 {
        let margin = self.config.drop_margin;
        x.min(self.bounds.right - margin)
            .max(self.bounds.left + margin)
    }

    /// Centers the camera on the player without showing past the level walls.
    pub fn update_camera(&mut self) {
        let target = self.player.x - self.config.viewport_width / 2.0;
        let max_x = self.bounds.right - self.config.viewport_width;
        self.camera_x = target.min(max_x).max(0.0);
    }

    /// Player bounding box.
    #[must_use]
    pub fn player_rect(&self) -> Rect {
        self.player.bounds()
    }

    /// Whether combat systems run this tick.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state == GameState::Playing && !self.cutscene_active
    }

    /// Ends the level if it is still being played.
    pub fn complete_level(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.state = GameState::LevelComplete;
        self.emit(GameEvent::StopAllSounds);
        self.play(SoundCue::Win);
        self.emit(GameEvent::LevelCompleted { level: self.level });
        info!("Level {} complete at frame {}", self.level, self.frame);
    }

    /// Ends the game.
    pub fn complete_game(&mut self) {
        if matches!(self.state, GameState::GameOver | GameState::GameComplete) {
            return;
        }
        self.state = GameState::GameComplete;
        self.emit(GameEvent::StopAllSounds);
        self.play(SoundCue::Win);
        self.emit(GameEvent::GameCompleted);
        info!("Game complete with {} coins", self.coins);
    }

    /// Executes a due narrative action.
    pub fn apply_scheduled(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::PlaySound(cue) => self.play(cue),
            ScheduledAction::StopSound(cue) => self.emit(GameEvent::StopSound { cue }),
            ScheduledAction::Subtitle { text, ticks } => {
                self.emit(GameEvent::Subtitle { text, ticks });
            },
            ScheduledAction::EndCutscene => {
                if self.cutscene_active {
                    self.cutscene_active = false;
                    self.emit(GameEvent::CutsceneEnded);
                }
            },
            ScheduledAction::CompleteLevel => self.complete_level(),
            ScheduledAction::CompleteGame => self.complete_game(),
        }
    }

    /// Runs every action due this frame.
    pub fn run_scheduled(&mut self) {
        for action in self.scheduler.drain_due(self.frame) {
            self.apply_scheduled(action);
        }
    }
}
