//! Enemy deaths, drops, pickup collection and level exits.

use tracing::{debug, info};

use quest_common::{intersects, Bounded, Rect};

use crate::enemy::EnemyKind;
use crate::events::{GameEvent, SoundCue};
use crate::particles::ParticleKind;
use crate::pickup::{Pickup, PickupKind};
use crate::schedule::ScheduledAction;
use crate::world::WorldState;

// ============================================================================
// Drop Geometry
// ============================================================================

const COIN_SIZE: f32 = 25.0;
const HEART_SIZE: f32 = 30.0;
const HEART_OFFSET: f32 = 32.0;
const RELIC_WIDTH: f32 = 50.0;
const RELIC_HEIGHT: f32 = 34.0;
const RELIC_INSET: f32 = 120.0;
const CLAIRE_SIZE: f32 = 138.0;
const CLAIRE_INSET: f32 = 170.0;

/// Coin collection plays quieter than other effects.
const COIN_VOLUME: f32 = 0.3;

// ============================================================================
// Deaths
// ============================================================================

/// Turns the enemy at `index` into a corpse and spawns its drops.
///
/// Calling this on an enemy that is already dead does nothing, so every kill
/// is reported once.
pub fn handle_enemy_death(world: &mut WorldState, index: usize) {
    let Some(enemy) = world.enemies.get_mut(index) else {
        return;
    };
    if enemy.dead {
        return;
    }
    enemy.make_corpse();
    let id = enemy.id;
    let kind = enemy.kind;
    let rect = enemy.bounds();

    world.play(kind.death_cue());
    world.burst_at(ParticleKind::Dead, &rect);

    if kind.is_barricade() {
        debug!("Barricade {} broken", id);
        world.emit(GameEvent::BarricadeBroken { enemy: id });
        return;
    }

    world.kills += 1;
    world.emit(GameEvent::EnemyKilled { enemy: id, kind });
    info!("{} {} killed ({} total)", kind.name(), id, world.kills);

    drop_loot(world, kind, &rect);
}

fn drop_loot(world: &mut WorldState, kind: EnemyKind, rect: &Rect) {
    let floor = world.config.drop_ground_y();
    let life = world.config.pickup_life;
    let frame = world.frame;

    let coin_x = world.clamp_drop_x(rect.center_x() - COIN_SIZE / 2.0);
    let coin_chance = world.config.coin_chance;
    if world.rng.chance(coin_chance) {
        let coin = Rect::new(coin_x, floor - COIN_SIZE, COIN_SIZE, COIN_SIZE);
        world
            .pickups
            .push(Pickup::new(PickupKind::Coin, coin, frame).with_life(life));
    }

    let heart_chance = kind.heart_chance(&world.config);
    if world.rng.chance(heart_chance) {
        let x = world.clamp_drop_x(coin_x + HEART_OFFSET);
        let heart = Rect::new(x, floor - HEART_SIZE, HEART_SIZE, HEART_SIZE);
        world
            .pickups
            .push(Pickup::new(PickupKind::Heart, heart, frame).with_life(life));
    }

    if let Some(relic) = kind.progression_drop() {
        let x = world.bounds.right - RELIC_INSET;
        let area = Rect::new(x, floor - RELIC_HEIGHT, RELIC_WIDTH, RELIC_HEIGHT);
        world.pickups.push(Pickup::new(relic, area, frame));
        info!("{:?} dropped near the level exit", relic);
    }

    if kind == EnemyKind::BanditLord {
        release_claire(world);
    }
}

fn release_claire(world: &mut WorldState) {
    let x = world.bounds.right - CLAIRE_INSET;
    let y = world.config.ground_line() - CLAIRE_SIZE;
    let area = Rect::new(x, y, CLAIRE_SIZE, CLAIRE_SIZE);
    world
        .pickups
        .push(Pickup::new(PickupKind::Claire, area, world.frame));

    let now = world.frame;
    world.scheduler.schedule_ms(
        now,
        500,
        ScheduledAction::subtitle("No, you've defeated me.", 1800),
    );
    world
        .scheduler
        .schedule_ms(now, 2300, ScheduledAction::PlaySound(SoundCue::QuinnWin));
    world.scheduler.schedule_ms(
        now,
        2300,
        ScheduledAction::subtitle("I won. Let's go home, Claire.", 2200),
    );
}

// ============================================================================
// Collection
// ============================================================================

/// Collects every pickup the player touches, then ages the rest.
pub fn collect_pickups(world: &mut WorldState) {
    if world.player.dead {
        return;
    }
    let player = world.player_rect();
    let pickups = std::mem::take(&mut world.pickups);
    let mut remaining = Vec::with_capacity(pickups.len());

    for mut pickup in pickups {
        if intersects(&player, &pickup.bounds(), 0.0) && collect(world, &pickup) {
            continue;
        }
        if pickup.tick_life() {
            remaining.push(pickup);
        }
    }

    remaining.append(&mut world.pickups);
    world.pickups = remaining;
}

/// Applies a touched pickup. Returns false if it stays on the ground.
fn collect(world: &mut WorldState, pickup: &Pickup) -> bool {
    match pickup.kind {
        PickupKind::Coin => {
            world.coins += 1;
            world.play_scaled(SoundCue::Coin, COIN_VOLUME);
        },
        PickupKind::Heart => {
            if !world.player.heal(1) {
                return false;
            }
            world.play(SoundCue::Pickup);
        },
        PickupKind::Scroll => {
            world.play(SoundCue::MagicScroll);
            world.complete_level();
        },
        PickupKind::Key => {
            world.play(SoundCue::Pickup);
            world.complete_level();
        },
        PickupKind::Claire => {
            world.play(SoundCue::Pickup);
            world.play(SoundCue::Win);
            let now = world.frame;
            world
                .scheduler
                .schedule_ms(now, 600, ScheduledAction::CompleteGame);
        },
    }
    world.emit(GameEvent::PickupCollected { kind: pickup.kind });
    true
}

/// Completes the level once the player reaches an exit.
pub fn check_trophies(world: &mut WorldState) {
    let player = world.player_rect();
    if world.trophies.iter().any(|t| t.is_reached(&player)) {
        world.complete_level();
    }
}
