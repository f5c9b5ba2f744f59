//! Player kinematics: gravity, ground, level walls and barricade contact.
//!
//! All motion is scaled by the frame delta. Enemies stay glued to the road,
//! so only the player is integrated here; enemy walking lives in the AI.

use quest_common::{Bounded, Rect};

use crate::config::SimConfig;
use crate::particles::ParticleKind;
use crate::world::{LevelBounds, WorldState};

/// Applies and decays a knockback impulse.
pub fn decay_knockback(knockback: &mut f32, x: &mut f32, dt: f32, config: &SimConfig) {
    if *knockback == 0.0 {
        return;
    }
    *x += *knockback * dt;
    *knockback *= config.knockback_decay;
    if knockback.abs() < config.knockback_cutoff {
        *knockback = 0.0;
    }
}

/// Keeps a body of `width` between the level walls.
#[must_use]
pub fn clamp_to_level(x: f32, width: f32, bounds: LevelBounds) -> f32 {
    x.min(bounds.right - width).max(bounds.left)
}

/// Decays every knockback without running any other motion.
pub fn decay_all_knockback(world: &mut WorldState, dt: f32) {
    let config = &world.config;
    let bounds = world.bounds;
    let player = &mut world.player;
    decay_knockback(&mut player.knockback_x, &mut player.x, dt, config);
    for enemy in world.enemies.iter_mut().filter(|e| e.is_alive()) {
        decay_knockback(&mut enemy.knockback_x, &mut enemy.x, dt, config);
        enemy.x = clamp_to_level(enemy.x, enemy.width, bounds);
    }
    clamp_player_to_level(world);
}

/// Integrates the player for one tick.
pub fn integrate_player(world: &mut WorldState, dt: f32) {
    {
        let config = &world.config;
        let player = &mut world.player;
        decay_knockback(&mut player.knockback_x, &mut player.x, dt, config);
        player.vy += config.gravity * dt;
    }

    let next_x = world.player.x + world.player.vx * dt;
    world.player.x = resolve_barricades(world, next_x);
    world.player.y += world.player.vy * dt;

    clamp_player_to_level(world);
    land_on_ground(world);
}

/// Soft collision against live barricades.
///
/// Walking right, the player may sink halfway into a barricade before being
/// stopped. Walking left, the barricade's right edge is a hard wall. Only a
/// grounded player at barricade height is affected, and a player already
/// inside a barricade is never pushed out.
fn resolve_barricades(world: &mut WorldState, next_x: f32) -> f32 {
    let player = &world.player;
    if !player.on_ground || player.vx == 0.0 {
        return next_x;
    }
    let body = player.bounds();
    let mut x = next_x;

    for barricade in world.enemies.iter().filter(|e| e.is_live_barricade()) {
        let wall = barricade.bounds();
        if !body.overlaps_vertically(&wall) {
            continue;
        }
        if player.vx > 0.0 {
            let stop = wall.x + wall.width / 2.0;
            if body.right() <= stop && x + body.width > stop {
                x = stop - body.width;
            }
        } else if body.x >= wall.right() && x < wall.right() {
            x = wall.right();
        }
    }

    if x != next_x {
        world.player.vx = 0.0;
    }
    x
}

fn clamp_player_to_level(world: &mut WorldState) {
    let player = &mut world.player;
    player.x = clamp_to_level(player.x, player.width, world.bounds);
}

fn land_on_ground(world: &mut WorldState) {
    let ground_y = world.config.player_ground_y(world.player.height);
    if world.player.y < ground_y {
        return;
    }
    let was_on_ground = world.player.on_ground;
    let player = &mut world.player;
    player.y = ground_y;
    player.vy = 0.0;
    player.on_ground = true;

    if !was_on_ground {
        let feet = Rect::new(player.x, player.y + player.height - 10.0, player.width, 0.0);
        world
            .particles
            .burst(ParticleKind::Land, feet.center_x(), feet.y);
    }
}
