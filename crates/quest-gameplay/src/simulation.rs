//! The fixed-step simulation driver.
//!
//! [`Simulation`] owns the [`WorldState`] and the current [`LevelConfig`]. Each
//! call to [`Simulation::tick`] drains due narrative actions and then, while
//! the level is being played and no cutscene holds the world, runs the
//! systems in order:
//! 1. Player controller and physics
//! 2. Enemy AI
//! 3. Projectiles
//! 4. Pickups and level exits
//! 5. Particles

use tracing::info;

use crate::ai::update_enemies;
use crate::config::SimConfig;
use crate::entity::{Glow, GlowState, Player};
use crate::events::{GameEvent, SoundCue};
use crate::input::{Action, InputManager, InputState};
use crate::level::{LevelConfig, LevelError};
use crate::loot::{check_trophies, collect_pickups};
use crate::physics::decay_all_knockback;
use crate::player::update_player;
use crate::projectile::update_projectiles;
use crate::rng::{RollSource, SeededRng};
use crate::schedule::ScheduledAction;
use crate::world::{GameState, LevelBounds, WorldState};

/// Minimum cast cooldown of a ranged enemy at level start.
const CAST_STAGGER_BASE: u32 = 60;
/// Random extra cast cooldown at level start.
const CAST_STAGGER_SPREAD: u32 = 60;

/// Delay before the opening line.
const OPENING_LINE_MS: u32 = 300;
/// How long the opening subtitle stays up.
const OPENING_SUBTITLE_MS: u32 = 2200;
/// Delay before the level music starts.
const MUSIC_MS: u32 = 2000;

/// A running game.
#[derive(Debug)]
pub struct Simulation {
    world: WorldState,
    level: LevelConfig,
}

impl Simulation {
    /// Creates a simulation and loads `level`.
    pub fn new(mut config: SimConfig, level: LevelConfig, rng: Box<dyn RollSource + Send>) -> Self {
        config.validate();
        let mut sim = Self {
            world: WorldState::new(config, rng),
            level,
        };
        sim.start_level();
        sim
    }

    /// Creates a simulation of a built-in level with a seeded RNG.
    pub fn with_seed(config: SimConfig, level: u32, seed: u64) -> Result<Self, LevelError> {
        let level = LevelConfig::builtin(level)?;
        Ok(Self::new(config, level, Box::new(SeededRng::new(seed))))
    }

    /// Advances the game by one tick.
    pub fn tick(&mut self, input: &InputState, dt: f32) {
        let dt = self.world.config.clamp_dt(dt);
        let world = &mut self.world;

        world.run_scheduled();

        match world.state {
            GameState::Playing if world.cutscene_active => decay_all_knockback(world, dt),
            GameState::Playing => {
                update_player(world, input, dt);
                update_enemies(world, dt);
                update_projectiles(world, dt);
                collect_pickups(world);
                check_trophies(world);
                world.particles.update(dt);
            },
            GameState::Paused
            | GameState::GameOver
            | GameState::LevelComplete
            | GameState::GameComplete => {},
        }

        world.frame += 1;
    }

    /// Runs one tick from a key-driven [`InputManager`].
    ///
    /// Command keys pressed this frame are applied first, then the held
    /// intents drive the tick and the frame's key edges are cleared.
    pub fn step(&mut self, input: &mut InputManager, dt: f32) {
        self.apply_commands(input);
        self.tick(&input.state(), dt);
        input.end_frame();
    }

    /// Applies the pause, cheat, restart and mute keys pressed this frame.
    pub fn apply_commands(&mut self, input: &InputManager) {
        if input.just_pressed(Action::Pause) {
            self.toggle_pause();
        }
        if input.just_pressed(Action::ToggleInvincible) {
            self.toggle_invincibility();
        }
        if input.just_pressed(Action::Restart) {
            self.restart_level();
        }
        if input.just_pressed(Action::Mute) {
            self.toggle_mute();
        }
    }

    /// Mutes or unmutes sound cues. Returns whether sound is now muted.
    pub fn toggle_mute(&mut self) -> bool {
        let world = &mut self.world;
        world.muted = !world.muted;
        if world.muted {
            world.emit(GameEvent::StopAllSounds);
        }
        world.muted
    }

    /// Pauses or resumes play. Returns the resulting state.
    pub fn toggle_pause(&mut self) -> GameState {
        self.world.state = match self.world.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
        self.world.state
    }

    /// Toggles the invincibility cheat. Returns whether it is now on.
    pub fn toggle_invincibility(&mut self) -> bool {
        let player = &mut self.world.player;
        player.invincible = !player.invincible;
        if player.invincible {
            player.glow.set(Glow::Yellow, u32::MAX);
        } else {
            player.glow = GlowState::default();
        }
        info!(
            "Invincibility {}",
            if player.invincible { "on" } else { "off" }
        );
        player.invincible
    }

    /// Restarts the current level after a game over. Coins are kept.
    ///
    /// Returns false if the player is not dead.
    pub fn restart_level(&mut self) -> bool {
        if self.world.state != GameState::GameOver {
            return false;
        }
        self.start_level();
        true
    }

    /// Moves on to the next built-in level after a level is completed.
    ///
    /// Returns `Ok(false)` if the current level is not complete or there is no
    /// next level.
    pub fn advance_level(&mut self) -> Result<bool, LevelError> {
        if self.world.state != GameState::LevelComplete {
            return Ok(false);
        }
        match LevelConfig::builtin(self.level.number + 1) {
            Ok(next) => {
                self.load(next);
                Ok(true)
            },
            Err(LevelError::UnknownLevel(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Replaces the current level and starts it.
    pub fn load(&mut self, level: LevelConfig) {
        self.level = level;
        self.start_level();
    }

    fn start_level(&mut self) {
        let generation = self.world.scheduler.advance_generation();
        let level = &self.level;
        let world = &mut self.world;

        let invincible = world.player.invincible;
        world.level = level.number;
        world.bounds = LevelBounds::new(level.width);
        world.camera_x = 0.0;
        world.state = GameState::Playing;
        world.cutscene_active = false;
        world.player = Player::spawn(&world.config, level.player_speed);
        world.player.invincible = invincible;
        if invincible {
            world.player.glow.set(Glow::Yellow, u32::MAX);
        }

        world.enemies = level.spawn_enemies(&world.config);
        for enemy in world.enemies.iter_mut().filter(|e| e.kind.is_ranged()) {
            enemy.cast_cooldown = CAST_STAGGER_BASE + world.rng.range(0, CAST_STAGGER_SPREAD);
        }
        world.projectiles.clear();
        world.pickups = level.placed_pickups(world.frame);
        world.trophies = level.trophies(&world.config);
        world.particles.clear();

        world.emit(GameEvent::StopAllSounds);
        let now = world.frame;
        if let Some(line) = &level.opening {
            world.scheduler.schedule_ms(
                now,
                OPENING_LINE_MS,
                ScheduledAction::PlaySound(line.cue),
            );
            world.scheduler.schedule_ms(
                now,
                OPENING_LINE_MS,
                ScheduledAction::subtitle(line.text.clone(), OPENING_SUBTITLE_MS),
            );
        }
        world.scheduler.schedule_ms(
            now,
            MUSIC_MS,
            ScheduledAction::PlaySound(SoundCue::Background(level.music_track())),
        );
        for cue in &level.cues {
            world
                .scheduler
                .schedule_ms(now, cue.at_ms, ScheduledAction::PlaySound(cue.cue));
        }

        info!(
            "Level {} ({}) started with {} enemies, generation {}",
            level.number,
            level.name,
            world.enemies.len(),
            generation.raw()
        );
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// The level being played.
    #[must_use]
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.world.state
    }

    /// Collects every event published since the last call.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.world.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ms_to_ticks;
    use crate::enemy::{Enemy, EnemyKind};
    use crate::entity::Facing;
    use crate::input::KeyCode;
    use crate::level::{SpawnSpec, TrophySpec};
    use crate::pickup::{Pickup, PickupKind, TrophyKind};
    use crate::projectile::{Owner, Projectile, ProjectileKind};
    use crate::rng::ScriptedRolls;
    use proptest::prelude::*;
    use quest_common::Rect;

    fn arena(spawns: Vec<SpawnSpec>) -> LevelConfig {
        LevelConfig {
            number: 1,
            name: "Arena".into(),
            width: 2000.0,
            player_speed: 18.0,
            music: None,
            opening: None,
            cues: Vec::new(),
            spawns,
            trophy: None,
            pickups: Vec::new(),
        }
    }

    fn sim(spawns: Vec<SpawnSpec>, rolls: ScriptedRolls) -> Simulation {
        Simulation::new(SimConfig::default(), arena(spawns), Box::new(rolls))
    }

    fn idle() -> InputState {
        InputState::default()
    }

    fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    // ========================================================================
    // Scenarios
    // ========================================================================

    #[test]
    fn test_melee_kills_goblin_and_drops_one_coin() {
        // block roll fails, coin roll succeeds, heart roll fails
        let rolls = ScriptedRolls::new(vec![0.5, 0.1, 0.9]);
        let mut sim = sim(vec![SpawnSpec::at(EnemyKind::Goblin, 200.0)], rolls);
        sim.drain_events();

        sim.tick(&idle().with_attack(), 1.0);

        let goblin = &sim.world().enemies[0];
        assert_eq!(goblin.health, 0);
        assert!(goblin.dead);
        let events = sim.drain_events();
        assert_eq!(
            count_events(&events, |e| matches!(e, GameEvent::EnemyKilled { .. })),
            1
        );
        let coins: Vec<&Pickup> = sim
            .world()
            .pickups
            .iter()
            .filter(|p| p.kind == PickupKind::Coin)
            .collect();
        assert_eq!(coins.len(), 1);

        for _ in 0..20 {
            sim.tick(&idle().with_attack(), 1.0);
        }
        assert_eq!(sim.world().kills, 1);
    }

    #[test]
    fn test_crossbow_bolt_hits_player() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let bolt = Projectile::new(
            ProjectileKind::CrossbowBolt,
            Owner::Enemy,
            Rect::new(200.0, 450.0, 64.0, 16.0),
            -6.0,
            2,
        );
        sim.world_mut().projectiles.push(bolt);

        sim.tick(&idle(), 1.0);

        let world = sim.world();
        assert_eq!(world.player.health, 8);
        assert!(world.player.invincibility_timer > 0);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_blocking_player_repels_melee() {
        let mut sim = sim(
            vec![SpawnSpec::at(EnemyKind::Bandit, 200.0)],
            ScriptedRolls::default(),
        );

        sim.tick(&idle().with_block(), 1.0);

        let world = sim.world();
        assert_eq!(world.player.health, 10);
        assert_eq!(world.player.glow.color, Some(Glow::Blue));
        let bandit = &world.enemies[0];
        assert!(bandit.attacking);
        assert_eq!(bandit.facing, Facing::Left);
        assert_eq!(bandit.knockback_x, 3.0);
    }

    #[test]
    fn test_coin_with_one_frame_left_expires() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let coin = Pickup::new(PickupKind::Coin, Rect::new(1500.0, 510.0, 25.0, 25.0), 0)
            .with_life(1);
        sim.world_mut().pickups.push(coin);

        sim.tick(&idle(), 1.0);

        assert!(sim.world().pickups.is_empty());
        assert_eq!(sim.world().coins, 0);
    }

    #[test]
    fn test_player_clamped_at_right_wall() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        sim.world_mut().player.x = 1860.0;

        sim.tick(&idle().with_right(), 1.0);

        assert_eq!(sim.world().player.x, 2000.0 - 128.0);
    }

    #[test]
    fn test_overlapping_enemies_nudged_one_step() {
        let mut sim = sim(
            vec![
                SpawnSpec::at(EnemyKind::Zombie, 1000.0),
                SpawnSpec::at(EnemyKind::Zombie, 1050.0),
            ],
            ScriptedRolls::default(),
        );

        sim.tick(&idle(), 1.0);

        let enemies = &sim.world().enemies;
        // both walk 1px toward the player, then separate by one step each
        assert_eq!(enemies[0].x, 998.0);
        assert_eq!(enemies[1].x, 1050.0);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn test_opening_script_plays_on_schedule() {
        let mut sim = Simulation::with_seed(SimConfig::default(), 1, 7).expect("level 1");
        sim.drain_events();

        for _ in 0..ms_to_ticks(2000) {
            sim.tick(&idle(), 1.0);
        }
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::Subtitle {
            text: "Look! A fight!".into(),
            ticks: ms_to_ticks(2200),
        }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::Sound { cue: SoundCue::Background(_), .. })));

        sim.tick(&idle(), 1.0);
        let events = sim.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Sound { cue: SoundCue::Background(1), .. })));
    }

    #[test]
    fn test_ranged_enemies_start_staggered() {
        let sim = Simulation::with_seed(SimConfig::default(), 1, 99).expect("level 1");
        for enemy in &sim.world().enemies {
            if enemy.kind.is_ranged() {
                assert!((60..120).contains(&enemy.cast_cooldown));
            } else {
                assert_eq!(enemy.cast_cooldown, 0);
            }
        }
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut sim = sim(
            vec![SpawnSpec::at(EnemyKind::Goblin, 900.0)],
            ScriptedRolls::default(),
        );
        assert_eq!(sim.toggle_pause(), GameState::Paused);
        sim.tick(&idle().with_right(), 1.0);
        assert_eq!(sim.world().player.x, 100.0);
        assert_eq!(sim.world().enemies[0].x, 900.0);

        assert_eq!(sim.toggle_pause(), GameState::Playing);
        sim.tick(&idle().with_right(), 1.0);
        assert_eq!(sim.world().player.x, 118.0);
    }

    #[test]
    fn test_command_keys_drive_toggles() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let mut input = InputManager::new();

        input.update_key(KeyCode::P, true);
        sim.step(&mut input, 1.0);
        assert_eq!(sim.state(), GameState::Paused);

        // Holding the key does not toggle again.
        sim.step(&mut input, 1.0);
        assert_eq!(sim.state(), GameState::Paused);

        input.update_key(KeyCode::P, false);
        input.update_key(KeyCode::I, true);
        sim.step(&mut input, 1.0);
        assert!(sim.world().player.invincible);

        input.update_key(KeyCode::I, false);
        input.update_key(KeyCode::P, true);
        input.update_key(KeyCode::D, true);
        sim.step(&mut input, 1.0);
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.world().player.x, 118.0);
    }

    #[test]
    fn test_restart_key_after_game_over() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let mut input = InputManager::new();

        input.update_key(KeyCode::R, true);
        sim.step(&mut input, 1.0);
        assert_eq!(sim.state(), GameState::Playing);

        input.update_key(KeyCode::R, false);
        sim.world_mut().state = GameState::GameOver;
        sim.step(&mut input, 1.0);
        assert_eq!(sim.state(), GameState::GameOver);

        input.update_key(KeyCode::R, true);
        sim.step(&mut input, 1.0);
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.world().player.health, 10);
    }

    #[test]
    fn test_mute_silences_cues() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let mut input = InputManager::new();
        sim.drain_events();

        input.update_key(KeyCode::M, true);
        sim.step(&mut input, 1.0);
        assert!(sim.world().muted);
        assert_eq!(sim.drain_events(), vec![GameEvent::StopAllSounds]);

        input.update_key(KeyCode::M, false);
        input.update_key(KeyCode::Space, true);
        sim.step(&mut input, 1.0);
        assert!(!sim.world().player.on_ground);
        assert!(!sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Sound { .. })));

        input.update_key(KeyCode::M, true);
        sim.step(&mut input, 1.0);
        assert!(!sim.world().muted);
    }

    #[test]
    fn test_invincibility_cheat() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        assert!(sim.toggle_invincibility());
        assert_eq!(sim.world().player.glow.color, Some(Glow::Yellow));
        let bolt = Projectile::new(
            ProjectileKind::EvilMagic,
            Owner::Enemy,
            Rect::new(200.0, 450.0, 72.0, 72.0),
            -3.0,
            2,
        );
        sim.world_mut().projectiles.push(bolt);
        sim.tick(&idle(), 1.0);
        assert_eq!(sim.world().player.health, 10);
        assert!(!sim.toggle_invincibility());
        assert!(!sim.world().player.glow.is_active());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut sim = sim(
            vec![SpawnSpec::at(EnemyKind::Goblin, 900.0)],
            ScriptedRolls::default(),
        );
        assert!(!sim.restart_level());

        sim.world_mut().coins = 4;
        sim.world_mut().player.health = 1;
        let bolt = Projectile::new(
            ProjectileKind::CrossbowBolt,
            Owner::Enemy,
            Rect::new(200.0, 450.0, 64.0, 16.0),
            -6.0,
            2,
        );
        sim.world_mut().projectiles.push(bolt);
        sim.tick(&idle(), 1.0);
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(sim.drain_events().contains(&GameEvent::PlayerDied));

        let frame = sim.world().frame;
        sim.tick(&idle(), 1.0);
        assert_eq!(sim.world().frame, frame + 1);

        assert!(sim.restart_level());
        let world = sim.world();
        assert_eq!(world.state, GameState::Playing);
        assert_eq!(world.player.health, 10);
        assert_eq!(world.coins, 4);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.enemies[0].x, 900.0);
    }

    #[test]
    fn test_restart_discards_previous_script() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let now = sim.world().frame;
        sim.world_mut()
            .scheduler
            .schedule(now, 5, ScheduledAction::CompleteLevel);
        sim.world_mut().state = GameState::GameOver;
        assert!(sim.restart_level());

        for _ in 0..10 {
            sim.tick(&idle(), 1.0);
        }
        assert_eq!(sim.state(), GameState::Playing);
    }

    #[test]
    fn test_trophy_completes_and_advances() {
        let mut level = arena(Vec::new());
        level.trophy = Some(TrophySpec {
            kind: TrophyKind::Gate,
            width: 400.0,
            inset: 30.0,
        });
        let mut sim = Simulation::new(
            SimConfig::default(),
            level,
            Box::new(ScriptedRolls::default()),
        );
        assert!(!sim.advance_level().expect("no error"));

        sim.world_mut().player.x = 1600.0;
        sim.tick(&idle(), 1.0);
        assert_eq!(sim.state(), GameState::LevelComplete);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::LevelCompleted { level: 1 }));

        assert!(sim.advance_level().expect("level 2 exists"));
        assert_eq!(sim.world().level, 2);
        assert_eq!(sim.level().name, "Village Raid");
        assert_eq!(sim.world().bounds.right, 6000.0);
    }

    #[test]
    fn test_last_level_does_not_advance() {
        let mut sim = Simulation::with_seed(SimConfig::default(), 6, 1).expect("level 6");
        sim.world_mut().state = GameState::LevelComplete;
        assert!(!sim.advance_level().expect("no error"));
    }

    #[test]
    fn test_boss_intro_freezes_then_releases() {
        let mut sim = sim(
            vec![SpawnSpec::at(EnemyKind::BanditLeader, 1200.0)],
            ScriptedRolls::default(),
        );
        sim.tick(&idle(), 1.0);
        assert!(sim.world().cutscene_active);

        sim.tick(&idle().with_right(), 1.0);
        assert_eq!(sim.world().player.x, 100.0);

        for _ in 0..ms_to_ticks(250 + 2800 + 1500) {
            sim.tick(&idle(), 1.0);
        }
        assert!(!sim.world().cutscene_active);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::CutsceneEnded));
        assert!(events.contains(&GameEvent::Subtitle {
            text: "Stand and deliver!".into(),
            ticks: ms_to_ticks(2200),
        }));
    }

    #[test]
    fn test_claire_completes_game() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        let claire = Pickup::new(PickupKind::Claire, Rect::new(150.0, 442.0, 138.0, 138.0), 0);
        sim.world_mut().pickups.push(claire);

        sim.tick(&idle(), 1.0);
        assert_eq!(sim.state(), GameState::Playing);

        for _ in 0..ms_to_ticks(600) {
            sim.tick(&idle(), 1.0);
        }
        assert_eq!(sim.state(), GameState::GameComplete);
        assert!(sim.drain_events().contains(&GameEvent::GameCompleted));
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut sim = sim(Vec::new(), ScriptedRolls::default());
        sim.tick(&idle().with_right(), 1000.0);
        assert_eq!(sim.world().player.x, 100.0 + 18.0 * 3.0);
        sim.tick(&idle().with_right(), f32::NAN);
        assert_eq!(sim.world().player.x, 154.0);
    }

    #[test]
    fn test_dead_enemy_stays_inert() {
        let mut sim = sim(
            vec![SpawnSpec::at(EnemyKind::Necromancer, 600.0)],
            ScriptedRolls::default(),
        );
        let config = sim.world().config.clone();
        let mut corpse = Enemy::spawn(EnemyKind::Necromancer, 600.0, None, &config);
        corpse.make_corpse();
        sim.world_mut().enemies[0] = corpse;

        for _ in 0..200 {
            sim.tick(&idle(), 1.0);
        }
        let enemy = &sim.world().enemies[0];
        assert_eq!(enemy.x, 600.0);
        assert_eq!(enemy.casting, 0);
        assert!(sim.world().projectiles.is_empty());
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    fn input_strategy() -> impl Strategy<Value = InputState> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(move_left, move_right, jump, block, attack, cast)| InputState {
                move_left,
                move_right,
                jump,
                block,
                attack,
                cast,
            })
    }

    fn check_invariants(world: &WorldState) {
        let player = &world.player;
        assert!(player.health >= 0 && player.health <= player.max_health);
        if player.dead {
            assert!(player.health <= 0);
        }
        let actions = [player.is_blocking, player.is_attacking, player.casting_magic]
            .iter()
            .filter(|&&active| active)
            .count();
        assert!(actions <= 1, "player in {actions} actions at once");

        for enemy in &world.enemies {
            assert!(enemy.health >= 0 && enemy.health <= enemy.max_health);
            if enemy.dead {
                assert!(!enemy.attacking);
                assert_eq!(enemy.casting, 0);
                assert_eq!(enemy.vx, 0.0);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn test_invariants_hold_under_random_input(
            seed in any::<u64>(),
            level in 1u32..=6,
            inputs in prop::collection::vec(input_strategy(), 1..300),
        ) {
            let mut sim = Simulation::with_seed(SimConfig::default(), level, seed)
                .expect("built-in level");
            sim.world_mut().player.x = 700.0;
            for input in &inputs {
                sim.tick(input, 1.0);
                check_invariants(sim.world());
                if sim.state() == GameState::GameOver {
                    sim.restart_level();
                }
            }
        }
    }
}
