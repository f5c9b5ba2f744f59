//! Player controller: movement, sword swings, fireballs and taking damage.
//!
//! Blocking, swinging and casting are mutually exclusive. Each one pins the
//! player in place while it lasts, and a new action cannot start while another
//! is running.

use tracing::{debug, info};

use quest_common::{intersects, Bounded, Rect};

use crate::combat::{
    resolve_strike, strike_barricade, strike_enemy, Defender, Strike, StrikeOutcome,
};
use crate::entity::Facing;
use crate::events::{GameEvent, SoundCue};
use crate::input::InputState;
use crate::particles::ParticleKind;
use crate::physics::integrate_player;
use crate::projectile::{launch, Owner, Projectile, ProjectileKind};
use crate::world::{GameState, WorldState};

const FIREBALL_LEFT_OFFSET: f32 = 40.0;
const FIREBALL_Y_OFFSET: f32 = 60.0;

/// Runs the player for one tick: input, physics, camera and timers.
pub fn update_player(world: &mut WorldState, input: &InputState, dt: f32) {
    if world.player.dead {
        return;
    }

    apply_movement(world, input);
    if input.attack {
        try_melee(world);
    }
    if input.cast {
        try_cast(world);
    }

    integrate_player(world, dt);
    world.update_camera();
    tick_timers(world);
}

fn apply_movement(world: &mut WorldState, input: &InputState) {
    let player = &mut world.player;
    player.is_blocking = input.block && !player.is_attacking && !player.casting_magic;

    if player.is_action_locked() {
        player.vx = 0.0;
        return;
    }

    let direction = input.horizontal();
    player.vx = direction * player.speed;
    if direction < 0.0 {
        player.facing = Facing::Left;
    } else if direction > 0.0 {
        player.facing = Facing::Right;
    }

    if input.jump && player.on_ground {
        player.vy = world.config.jump_force;
        player.on_ground = false;
        world.play(SoundCue::Jump);
    }
}

/// Starts a sword swing and resolves it against everything in reach.
///
/// Returns false if the swing could not start.
pub fn try_melee(world: &mut WorldState) -> bool {
    let player = &mut world.player;
    if player.dead || player.is_blocking || player.casting_magic || player.attack_cooldown > 0 {
        return false;
    }
    player.is_attacking = true;
    player.attack_cooldown = world.config.player_attack_cooldown;
    player.attack_timer = world.config.player_attack_timer;
    player.vx = 0.0;
    world.play(SoundCue::Slash);

    let body = world.player_rect();
    let sign = world.player.facing.sign();
    let reach = body.extended(sign, world.config.barricade_reach_bonus);
    let strike = Strike {
        damage: world.player.damage,
        push: sign * world.config.player_melee_push,
    };

    for index in 0..world.enemies.len() {
        let enemy = &world.enemies[index];
        if !enemy.is_alive() {
            continue;
        }
        let target = enemy.bounds();
        if enemy.kind.is_barricade() {
            if intersects(&reach, &target, 0.0) {
                world.play(SoundCue::SwordHit);
                strike_barricade(world, index, strike.damage);
            }
        } else if intersects(&body, &target, world.config.melee_reach_padding) {
            if let StrikeOutcome::Hit { .. } = strike_enemy(world, index, strike) {
                world.play(SoundCue::SwordHit);
            }
        }
    }
    true
}

/// Starts winding up a fireball. Returns false if the cast could not start.
pub fn try_cast(world: &mut WorldState) -> bool {
    let player = &mut world.player;
    if player.dead
        || player.is_blocking
        || player.casting_magic
        || player.is_attacking
        || player.magic_cooldown > 0
    {
        return false;
    }
    player.casting_magic = true;
    player.vx = 0.0;
    player.cast_frame = Some(world.frame + u64::from(world.config.cast_delay));
    debug!("Fireball wind-up until frame {:?}", player.cast_frame);
    true
}

fn release_fireball(world: &mut WorldState) {
    let config = &world.config;
    let player = &world.player;
    let sign = player.facing.sign();
    let x = match player.facing {
        Facing::Right => player.x + player.width,
        Facing::Left => player.x - FIREBALL_LEFT_OFFSET,
    };
    let rect = Rect::new(
        x,
        player.y + FIREBALL_Y_OFFSET,
        config.fireball_width,
        config.fireball_height,
    );
    let fireball = Projectile::new(
        ProjectileKind::Fireball,
        Owner::Player,
        rect,
        sign * config.fireball_speed,
        config.fireball_damage,
    );
    launch(world, fireball, SoundCue::Fireball);
}

fn tick_timers(world: &mut WorldState) {
    let frame = world.frame;
    let cast_due = world.player.cast_frame.is_some_and(|due| frame >= due);
    if cast_due {
        release_fireball(world);
        let player = &mut world.player;
        player.casting_magic = false;
        player.cast_frame = None;
        player.magic_cooldown = world.config.magic_cooldown;
    } else {
        let player = &mut world.player;
        player.magic_cooldown = player.magic_cooldown.saturating_sub(1);
    }

    let player = &mut world.player;
    player.attack_cooldown = player.attack_cooldown.saturating_sub(1);
    player.invincibility_timer = player.invincibility_timer.saturating_sub(1);
    player.hit_flash = player.hit_flash.saturating_sub(1);
    if player.attack_timer > 0 {
        player.attack_timer -= 1;
    } else {
        player.is_attacking = false;
    }
    player.glow.tick();
}

// ============================================================================
// Taking Damage
// ============================================================================

/// Strikes the player, honoring an active block.
pub fn strike_player(world: &mut WorldState, strike: Strike) -> StrikeOutcome {
    let outcome = resolve_strike(
        &mut world.player,
        strike,
        world.rng.as_mut(),
        &world.config,
    );
    match outcome {
        StrikeOutcome::Blocked => {
            let rect = world.player_rect();
            world.play(SoundCue::Block);
            world.burst_at(ParticleKind::Block, &rect);
            world.emit(GameEvent::AttackBlocked {
                defender: world.player.id,
            });
        },
        StrikeOutcome::Hit { lethal } => after_hit(world, strike.damage, lethal),
        StrikeOutcome::Ignored => {},
    }
    outcome
}

/// Damages the player directly, bypassing block.
pub fn hurt_player(world: &mut WorldState, strike: Strike) -> StrikeOutcome {
    let player = &mut world.player;
    if player.is_immune() || strike.damage <= 0 {
        return StrikeOutcome::Ignored;
    }
    let lethal = player.absorb_hit(&strike, &world.config);
    after_hit(world, strike.damage, lethal);
    StrikeOutcome::Hit { lethal }
}

fn after_hit(world: &mut WorldState, damage: i32, lethal: bool) {
    let rect = world.player_rect();
    world.burst_at(ParticleKind::Hit, &rect);
    world.emit(GameEvent::PlayerDamaged {
        damage,
        health: world.player.health,
    });

    if !lethal {
        world.play(SoundCue::QuinnHurt);
        return;
    }

    world.player.dead = true;
    world.player.vx = 0.0;
    world.state = GameState::GameOver;
    world.emit(GameEvent::StopAllSounds);
    world.play(SoundCue::QuinnHurt);
    world.play(SoundCue::Lose);
    world.emit(GameEvent::PlayerDied);
    info!("Player died on level {} at frame {}", world.level, world.frame);
}
