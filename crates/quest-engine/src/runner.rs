//! Headless campaign runner.
//!
//! Plays levels back to back with the [`Autopilot`], restarting after a game
//! over until the retry limit is spent, and tallies the run into a
//! [`RunReport`].

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use quest_gameplay::{
    Action, EventHandler, GameEvent, GameState, InputManager, LevelConfig, LevelError, SeededRng,
    Simulation,
};

use crate::autopilot::Autopilot;
use crate::config::{EngineConfig, ReportFormat};

// ============================================================================
// Statistics
// ============================================================================

/// Event tallies collected while the run plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Enemies killed
    pub kills: u32,
    /// Barricades broken
    pub barricades: u32,
    /// Attacks blocked by anyone
    pub blocks: u32,
    /// Pickups collected
    pub pickups: u32,
    /// Projectiles launched
    pub projectiles: u32,
    /// Boss intros seen
    pub boss_intros: u32,
}

impl EventHandler for RunStats {
    fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyKilled { .. } => self.kills += 1,
            GameEvent::BarricadeBroken { .. } => self.barricades += 1,
            GameEvent::AttackBlocked { .. } => self.blocks += 1,
            GameEvent::PickupCollected { .. } => self.pickups += 1,
            GameEvent::ProjectileSpawned { .. } => self.projectiles += 1,
            GameEvent::BossIntroStarted { .. } => self.boss_intros += 1,
            _ => {},
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Seed the run used
    pub seed: u64,
    /// Level the run started on
    pub start_level: u32,
    /// Level the run ended on
    pub final_level: u32,
    /// Levels completed
    pub levels_cleared: u32,
    /// Game overs
    pub deaths: u32,
    /// Coins held at the end
    pub coins: u32,
    /// Ticks simulated
    pub ticks: u64,
    /// Final game state
    pub final_state: GameState,
    /// Event tallies
    pub stats: RunStats,
}

impl RunReport {
    /// Whether the whole campaign was finished.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.final_state == GameState::GameComplete
    }

    /// Renders the report in `format`.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize run report")
            },
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Report (seed {}) ===", self.seed)?;
        writeln!(
            f,
            "Levels: {} cleared, started on {}, ended on {} ({:?})",
            self.levels_cleared, self.start_level, self.final_level, self.final_state
        )?;
        writeln!(f, "Deaths: {}", self.deaths)?;
        writeln!(f, "Coins: {}", self.coins)?;
        writeln!(
            f,
            "Kills: {}, barricades: {}, blocks: {}, pickups: {}",
            self.stats.kills, self.stats.barricades, self.stats.blocks, self.stats.pickups
        )?;
        write!(f, "Ticks: {}", self.ticks)
    }
}

// ============================================================================
// Level Loading
// ============================================================================

/// Loads level `number`, preferring `levelN.ron` in `level_dir`.
///
/// A missing or broken file falls back to the built-in level. Returns
/// `Ok(None)` past the end of the campaign.
pub fn load_level(level_dir: Option<&Path>, number: u32) -> Result<Option<LevelConfig>> {
    if let Some(dir) = level_dir {
        let path = dir.join(format!("level{number}.ron"));
        if path.exists() {
            match fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|source| Ok(LevelConfig::from_ron_str(&source)?))
            {
                Ok(level) if level.number == number => {
                    info!("Loaded level {} from {}", number, path.display());
                    return Ok(Some(level));
                },
                Ok(level) => warn!(
                    "{} declares level {}, using built-in level {}",
                    path.display(),
                    level.number,
                    number
                ),
                Err(e) => warn!("Failed to load {}: {e:#}, using built-in level", path.display()),
            }
        }
    }

    match LevelConfig::builtin(number) {
        Ok(level) => Ok(Some(level)),
        Err(LevelError::UnknownLevel(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Drives a simulation through the campaign.
#[derive(Debug)]
pub struct Runner {
    config: EngineConfig,
    sim: Simulation,
    autopilot: Autopilot,
    input: InputManager,
    seed: u64,
}

impl Runner {
    /// Builds a runner on the configured start level.
    pub fn new(mut config: EngineConfig) -> Result<Self> {
        config.validate();
        let seed = config.resolved_seed();
        let level = load_level(config.level_dir.as_deref(), config.start_level)?
            .with_context(|| format!("Level {} does not exist", config.start_level))?;
        let sim = Simulation::new(config.sim.clone(), level, Box::new(SeededRng::new(seed)));
        Ok(Self {
            config,
            sim,
            autopilot: Autopilot::default(),
            input: InputManager::new(),
            seed,
        })
    }

    /// Plays until the campaign ends, the retries run out or a level exceeds
    /// its tick limit.
    pub fn run(mut self) -> Result<RunReport> {
        let start_level = self.sim.level().number;
        let mut stats = RunStats::default();
        let mut levels_cleared = 0;
        let mut deaths = 0;
        let mut ticks = 0;
        let mut level_ticks = 0;

        info!("Run starting on level {} with seed {}", start_level, self.seed);

        loop {
            match self.sim.state() {
                GameState::Playing | GameState::Paused => {
                    if level_ticks >= self.config.max_ticks_per_level {
                        warn!(
                            "Level {} not finished within {} ticks, stopping",
                            self.sim.level().number,
                            level_ticks
                        );
                        break;
                    }
                    self.autopilot.drive(self.sim.world(), &mut self.input)?;
                    self.sim.step(&mut self.input, self.config.fixed_dt);
                    ticks += 1;
                    level_ticks += 1;
                    for event in self.sim.drain_events() {
                        stats.handle(&event);
                    }
                },
                GameState::LevelComplete => {
                    levels_cleared += 1;
                    let next = self.sim.level().number + 1;
                    match load_level(self.config.level_dir.as_deref(), next)? {
                        Some(level) => {
                            info!("Advancing to level {}", next);
                            self.sim.load(level);
                            level_ticks = 0;
                        },
                        None => {
                            info!("No level after {}, run over", next - 1);
                            break;
                        },
                    }
                },
                GameState::GameOver => {
                    deaths += 1;
                    if deaths > self.config.max_retries {
                        warn!("Out of retries after {} deaths", deaths);
                        break;
                    }
                    debug!("Retry {} of {}", deaths, self.config.max_retries);
                    self.input.set_action(Action::Restart, true)?;
                    self.sim.step(&mut self.input, self.config.fixed_dt);
                    self.input.set_action(Action::Restart, false)?;
                    ticks += 1;
                    level_ticks = 1;
                },
                GameState::GameComplete => {
                    levels_cleared += 1;
                    info!("Campaign complete");
                    break;
                },
            }
        }

        let world = self.sim.world();
        Ok(RunReport {
            seed: self.seed,
            start_level,
            final_level: world.level,
            levels_cleared,
            deaths,
            coins: world.coins,
            ticks,
            final_state: world.state,
            stats,
        })
    }
}
