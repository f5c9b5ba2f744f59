//! Scripted input for headless runs.
//!
//! The autopilot reads the world each tick and holds the buttons a simple
//! player would: keep walking right, swing at anything in reach, raise the
//! shield when a hostile projectile closes in, and throw fireballs at range.
//! Decisions reach the simulation as key presses on an [`InputManager`], the
//! same path a keyboard takes.

use quest_common::{intersects, Bounded};
use quest_gameplay::{Action, InputError, InputManager, InputState, Owner, WorldState};

/// Decision thresholds.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Distance at which an incoming projectile triggers a block
    pub block_distance: f32,
    /// Farthest enemy worth a fireball
    pub cast_range: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            block_distance: 120.0,
            cast_range: 700.0,
        }
    }
}

impl Autopilot {
    /// Chooses this tick's input.
    #[must_use]
    pub fn decide(&self, world: &WorldState) -> InputState {
        let mut input = InputState::new();
        if !world.is_live() || world.player.dead {
            return input;
        }

        if self.projectile_inbound(world) {
            return input.with_block();
        }
        if self.target_in_reach(world) {
            return input.with_attack();
        }
        if self.target_in_range(world) && world.player.magic_cooldown == 0 {
            input = input.with_cast();
        }
        input.with_right()
    }

    /// Holds this tick's decision on the keys bound in `input`.
    pub fn drive(&self, world: &WorldState, input: &mut InputManager) -> Result<(), InputError> {
        let intents = self.decide(world);
        for (action, held) in [
            (Action::MoveLeft, intents.move_left),
            (Action::MoveRight, intents.move_right),
            (Action::Jump, intents.jump),
            (Action::Block, intents.block),
            (Action::Attack, intents.attack),
            (Action::Cast, intents.cast),
        ] {
            input.set_action(action, held)?;
        }
        Ok(())
    }

    fn projectile_inbound(&self, world: &WorldState) -> bool {
        let body = world.player_rect();
        world.projectiles.iter().any(|p| {
            if p.owner != Owner::Enemy {
                return false;
            }
            let gap = if p.vx < 0.0 {
                p.x - body.right()
            } else {
                body.x - (p.x + p.width)
            };
            (0.0..=self.block_distance).contains(&gap) && body.overlaps_vertically(&p.bounds())
        })
    }

    fn target_in_reach(&self, world: &WorldState) -> bool {
        let config = &world.config;
        let reach = world
            .player_rect()
            .extended(world.player.facing.sign(), config.barricade_reach_bonus);
        world
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .any(|e| intersects(&reach, &e.bounds(), config.melee_reach_padding))
    }

    fn target_in_range(&self, world: &WorldState) -> bool {
        let player_x = world.player.center_x();
        world
            .enemies
            .iter()
            .filter(|e| e.is_alive() && !e.kind.is_barricade())
            .any(|e| {
                let ahead = e.center_x() - player_x;
                ahead > 0.0 && ahead <= self.cast_range
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_common::Rect;
    use quest_gameplay::{
        Enemy, EnemyKind, LevelBounds, Projectile, ProjectileKind, ScriptedRolls, SimConfig,
    };

    fn world() -> WorldState {
        let mut world = WorldState::new(SimConfig::default(), Box::new(ScriptedRolls::default()));
        world.bounds = LevelBounds::new(5000.0);
        world
    }

    #[test]
    fn test_walks_right_when_clear() {
        let input = Autopilot::default().decide(&world());
        assert!(input.move_right);
        assert!(!input.attack && !input.block && !input.cast);
    }

    #[test]
    fn test_attacks_adjacent_enemy() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Goblin, 230.0, None, &config));
        let input = Autopilot::default().decide(&world);
        assert!(input.attack);
        assert!(!input.move_right);
    }

    #[test]
    fn test_casts_at_range_while_walking() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Bandit, 600.0, None, &config));
        let input = Autopilot::default().decide(&world);
        assert!(input.cast);
        assert!(input.move_right);
    }

    #[test]
    fn test_blocks_incoming_bolt() {
        let mut world = world();
        world.projectiles.push(Projectile::new(
            ProjectileKind::CrossbowBolt,
            Owner::Enemy,
            Rect::new(300.0, 450.0, 64.0, 16.0),
            -6.0,
            2,
        ));
        let input = Autopilot::default().decide(&world);
        assert!(input.block);
    }

    #[test]
    fn test_ignores_own_fireball() {
        let mut world = world();
        world.projectiles.push(Projectile::new(
            ProjectileKind::Fireball,
            Owner::Player,
            Rect::new(240.0, 460.0, 80.0, 90.0),
            12.0,
            2,
        ));
        let input = Autopilot::default().decide(&world);
        assert!(!input.block);
    }

    #[test]
    fn test_drive_presses_bound_keys() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Bandit, 600.0, None, &config));
        let mut input = InputManager::new();

        Autopilot::default()
            .drive(&world, &mut input)
            .expect("default bindings");
        assert_eq!(input.state(), InputState::new().with_cast().with_right());

        world.enemies.clear();
        input.end_frame();
        Autopilot::default()
            .drive(&world, &mut input)
            .expect("default bindings");
        assert_eq!(input.state(), InputState::new().with_right());
    }

    #[test]
    fn test_idle_during_cutscene() {
        let mut world = world();
        world.cutscene_active = true;
        assert_eq!(Autopilot::default().decide(&world), InputState::default());
    }
}
