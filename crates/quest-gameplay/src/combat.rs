//! Strike resolution shared by the player and enemies.
//!
//! A strike is checked in a fixed order:
//! 1. A defender holding block absorbs it
//! 2. Otherwise the defender may react with a block roll
//! 3. Otherwise an immune defender ignores it
//! 4. Otherwise it lands, dealing damage and knockback
//!
//! Barricades skip the whole ladder; they are plain damage sponges.

use tracing::debug;

use quest_common::Bounded;

use crate::config::SimConfig;
use crate::enemy::{Enemy, EnemyKind};
use crate::entity::{Glow, Player};
use crate::events::{GameEvent, SoundCue};
use crate::loot::handle_enemy_death;
use crate::particles::ParticleKind;
use crate::rng::RollSource;
use crate::world::WorldState;

/// An incoming attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    /// Health to remove
    pub damage: i32,
    /// Signed horizontal impulse from the attacker
    pub push: f32,
}

/// What a strike did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// Absorbed by a block
    Blocked,
    /// Landed
    Hit {
        /// Health reached zero
        lethal: bool,
    },
    /// No effect
    Ignored,
}

/// Something that can be struck.
pub trait Defender {
    /// Whether the defender is actively holding block.
    fn holding_block(&self) -> bool;

    /// Probability of a reactive block.
    fn reactive_block_chance(&self) -> f32;

    /// Whether hits are ignored right now.
    fn is_immune(&self) -> bool;

    /// Applies block feedback.
    fn absorb_block(&mut self, strike: &Strike, config: &SimConfig);

    /// Applies a landed hit. Returns whether it was lethal.
    fn absorb_hit(&mut self, strike: &Strike, config: &SimConfig) -> bool;
}

/// Runs a strike through the block, immunity and damage checks.
pub fn resolve_strike<D: Defender + ?Sized>(
    defender: &mut D,
    strike: Strike,
    rng: &mut dyn RollSource,
    config: &SimConfig,
) -> StrikeOutcome {
    if defender.holding_block() || rng.chance(defender.reactive_block_chance()) {
        defender.absorb_block(&strike, config);
        return StrikeOutcome::Blocked;
    }
    if defender.is_immune() || strike.damage <= 0 {
        return StrikeOutcome::Ignored;
    }
    let lethal = defender.absorb_hit(&strike, config);
    StrikeOutcome::Hit { lethal }
}

impl Defender for Enemy {
    fn holding_block(&self) -> bool {
        false
    }

    fn reactive_block_chance(&self) -> f32 {
        if self.dead {
            0.0
        } else {
            self.block_chance
        }
    }

    fn is_immune(&self) -> bool {
        self.dead
    }

    fn absorb_block(&mut self, strike: &Strike, config: &SimConfig) {
        self.blocking = true;
        self.glow.set(Glow::Blue, config.glow_frames);
        self.knockback_x = strike.push * config.block_pushback;
    }

    fn absorb_hit(&mut self, strike: &Strike, config: &SimConfig) -> bool {
        let lethal = self.apply_damage(strike.damage);
        self.hit_flash = config.hit_flash_frames;
        self.glow.set(Glow::Red, config.glow_frames);
        self.knockback_x = strike.push * config.hit_knockback;
        lethal
    }
}

impl Defender for Player {
    fn holding_block(&self) -> bool {
        self.is_blocking && !self.dead
    }

    fn reactive_block_chance(&self) -> f32 {
        0.0
    }

    fn is_immune(&self) -> bool {
        Player::is_immune(self)
    }

    fn absorb_block(&mut self, strike: &Strike, config: &SimConfig) {
        self.glow.set(Glow::Blue, config.glow_frames);
        self.knockback_x = strike.push * config.block_pushback;
    }

    fn absorb_hit(&mut self, strike: &Strike, config: &SimConfig) -> bool {
        self.health = (self.health - strike.damage).max(0);
        self.invincibility_timer = config.invincibility_frames;
        self.hit_flash = config.hit_flash_frames;
        self.glow.set(Glow::Red, config.glow_frames);
        self.knockback_x = strike.push * config.hit_knockback;
        self.cancel_actions();
        self.health <= 0
    }
}

/// Strikes the enemy at `index` and plays out the consequences.
pub fn strike_enemy(world: &mut WorldState, index: usize, strike: Strike) -> StrikeOutcome {
    let Some(enemy) = world.enemies.get_mut(index) else {
        return StrikeOutcome::Ignored;
    };
    if enemy.kind.is_barricade() {
        return if strike_barricade(world, index, strike.damage) {
            StrikeOutcome::Hit { lethal: true }
        } else {
            StrikeOutcome::Hit { lethal: false }
        };
    }

    let outcome = resolve_strike(enemy, strike, world.rng.as_mut(), &world.config);
    let id = enemy.id;
    let kind = enemy.kind;
    let rect = enemy.bounds();

    match outcome {
        StrikeOutcome::Blocked => {
            debug!("Enemy {} blocked a strike", id);
            world.play(SoundCue::Block);
            world.burst_at(ParticleKind::Block, &rect);
            world.emit(GameEvent::AttackBlocked { defender: id });
        },
        StrikeOutcome::Hit { lethal } => {
            world.burst_at(ParticleKind::Hit, &rect);
            if lethal {
                handle_enemy_death(world, index);
            } else if kind == EnemyKind::BanditLord {
                world.play(SoundCue::BanditLordHurt);
            }
        },
        StrikeOutcome::Ignored => {},
    }
    outcome
}

/// Damages a barricade. Returns whether it broke.
pub fn strike_barricade(world: &mut WorldState, index: usize, damage: i32) -> bool {
    let Some(barricade) = world.enemies.get_mut(index) else {
        return false;
    };
    if !barricade.is_live_barricade() {
        return false;
    }
    let broke = barricade.apply_damage(damage);
    barricade.hit_flash = world.config.hit_flash_frames;
    barricade.glow.set(Glow::Red, world.config.glow_frames);
    let rect = barricade.bounds();

    world.burst_at(ParticleKind::Hit, &rect);
    if broke {
        handle_enemy_death(world, index);
    }
    broke
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRolls;
    use crate::world::LevelBounds;

    fn world_with(rolls: ScriptedRolls) -> WorldState {
        let mut world = WorldState::new(SimConfig::default(), Box::new(rolls));
        world.bounds = LevelBounds::new(5000.0);
        world
    }

    fn spawn(world: &mut WorldState, kind: EnemyKind, x: f32) -> usize {
        let enemy = Enemy::spawn(kind, x, None, &world.config);
        world.enemies.push(enemy);
        world.enemies.len() - 1
    }

    #[test]
    fn test_block_roll_absorbs_strike() {
        let config = SimConfig::default();
        let mut rolls = ScriptedRolls::new(vec![0.05]);
        let mut goblin = Enemy::spawn(EnemyKind::Goblin, 0.0, None, &config);

        let outcome = resolve_strike(
            &mut goblin,
            Strike {
                damage: 1,
                push: 10.0,
            },
            &mut rolls,
            &config,
        );

        assert_eq!(outcome, StrikeOutcome::Blocked);
        assert_eq!(goblin.health, 1);
        assert!(goblin.blocking);
        assert_eq!(goblin.knockback_x, 7.5);
        assert_eq!(goblin.glow.color, Some(Glow::Blue));
    }

    #[test]
    fn test_failed_block_roll_lands_hit() {
        let config = SimConfig::default();
        let mut rolls = ScriptedRolls::new(vec![0.5]);
        let mut bandit = Enemy::spawn(EnemyKind::BanditCrossbow, 0.0, None, &config);

        let outcome = resolve_strike(
            &mut bandit,
            Strike {
                damage: 1,
                push: -10.0,
            },
            &mut rolls,
            &config,
        );

        assert_eq!(outcome, StrikeOutcome::Hit { lethal: false });
        assert_eq!(bandit.health, 1);
        assert_eq!(bandit.knockback_x, -8.0);
        assert_eq!(bandit.hit_flash, 10);
    }

    #[test]
    fn test_blocking_player_takes_no_damage() {
        let config = SimConfig::default();
        let mut rolls = ScriptedRolls::default();
        let mut player = Player::spawn(&config, 18.0);
        player.is_blocking = true;

        let outcome = resolve_strike(
            &mut player,
            Strike {
                damage: 3,
                push: -4.0,
            },
            &mut rolls,
            &config,
        );

        assert_eq!(outcome, StrikeOutcome::Blocked);
        assert_eq!(player.health, 10);
        assert_eq!(player.knockback_x, -3.0);
        assert_eq!(rolls.consumed(), 0);
    }

    #[test]
    fn test_immune_player_ignores_hit() {
        let config = SimConfig::default();
        let mut rolls = ScriptedRolls::default();
        let mut player = Player::spawn(&config, 18.0);
        player.invincibility_timer = 5;

        let outcome = resolve_strike(
            &mut player,
            Strike {
                damage: 3,
                push: 0.0,
            },
            &mut rolls,
            &config,
        );
        assert_eq!(outcome, StrikeOutcome::Ignored);
        assert_eq!(player.health, 10);
    }

    #[test]
    fn test_player_hit_grants_invulnerability() {
        let config = SimConfig::default();
        let mut rolls = ScriptedRolls::default();
        let mut player = Player::spawn(&config, 18.0);
        player.is_attacking = true;

        let outcome = resolve_strike(
            &mut player,
            Strike {
                damage: 12,
                push: 4.0,
            },
            &mut rolls,
            &config,
        );
        assert_eq!(outcome, StrikeOutcome::Hit { lethal: true });
        assert_eq!(player.health, 0);
        assert_eq!(player.invincibility_timer, 60);
        assert!(!player.is_attacking);
    }

    #[test]
    fn test_barricade_ignores_block_rolls() {
        let mut world = world_with(ScriptedRolls::always(0.0));
        let index = spawn(&mut world, EnemyKind::Barricade, 900.0);

        assert!(!strike_barricade(&mut world, index, 1));
        assert!(!strike_barricade(&mut world, index, 1));
        assert!(strike_barricade(&mut world, index, 1));

        let barricade = &world.enemies[index];
        assert!(barricade.dead);
        assert_eq!(barricade.knockback_x, 0.0);
        assert!(!strike_barricade(&mut world, index, 1));
    }

    #[test]
    fn test_lethal_strike_kills_once() {
        let mut world = world_with(ScriptedRolls::default());
        let index = spawn(&mut world, EnemyKind::Goblin, 900.0);
        let strike = Strike {
            damage: 1,
            push: 10.0,
        };

        assert_eq!(
            strike_enemy(&mut world, index, strike),
            StrikeOutcome::Hit { lethal: true }
        );
        assert_eq!(strike_enemy(&mut world, index, strike), StrikeOutcome::Ignored);
        assert_eq!(world.kills, 1);
        let kills = world
            .events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn test_blocked_strike_emits_feedback() {
        let mut world = world_with(ScriptedRolls::new(vec![0.0]));
        let index = spawn(&mut world, EnemyKind::Bandit, 900.0);
        let id = world.enemies[index].id;

        let outcome = strike_enemy(
            &mut world,
            index,
            Strike {
                damage: 1,
                push: 10.0,
            },
        );
        assert_eq!(outcome, StrikeOutcome::Blocked);
        let events = world.events.drain();
        assert!(events.contains(&GameEvent::AttackBlocked { defender: id }));
        assert!(!world.particles.is_empty());
    }
}
