//! Enemy behavior.
//!
//! Each live enemy in the active band around the camera runs one decision per
//! tick, in priority order:
//! - Boss intro, once, when a boss first comes on screen
//! - An in-progress cast, then starting a new cast
//! - An in-progress melee swing, then starting a new swing
//! - Walking toward the player, stopped by barricades and other enemies
//!
//! Enemies outside the band are frozen, though knockback still settles.

use tracing::{debug, info};

use quest_common::{intersects, Bounded, Rect};

use crate::combat::Strike;
use crate::enemy::{Enemy, EnemyKind, RangedProfile};
use crate::entity::{Facing, Glow};
use crate::events::{GameEvent, SoundCue};
use crate::physics::{clamp_to_level, decay_knockback};
use crate::player::{hurt_player, strike_player};
use crate::projectile::{launch, Owner, Projectile};
use crate::schedule::ScheduledAction;
use crate::world::WorldState;

/// Subtitle display time for boss lines.
const BOSS_LINE_MS: u32 = 2200;
/// Gap between a cast projectile and the caster's right edge.
const CAST_RIGHT_GAP: f32 = 10.0;
/// Distance a left-facing cast starts behind the caster's left edge.
const CAST_LEFT_OFFSET: f32 = 32.0;

/// Runs every enemy for one tick.
pub fn update_enemies(world: &mut WorldState, dt: f32) {
    for index in 0..world.enemies.len() {
        if !world.is_live() {
            break;
        }
        update_enemy(world, index, dt);
    }
}

fn update_enemy(world: &mut WorldState, index: usize, dt: f32) {
    {
        let config = &world.config;
        let enemy = &mut world.enemies[index];
        if enemy.dead {
            return;
        }
        decay_knockback(&mut enemy.knockback_x, &mut enemy.x, dt, config);
        enemy.x = clamp_to_level(enemy.x, enemy.width, world.bounds);
    }

    let enemy = &world.enemies[index];
    if !world.in_view(enemy.x) {
        return;
    }

    if enemy.kind.is_boss()
        && !enemy.intro_done
        && enemy.x - world.camera_x < world.config.viewport_width
    {
        start_boss_intro(world, index);
        return;
    }

    tick_enemy_timers(&mut world.enemies[index]);
    if world.enemies[index].kind.is_barricade() {
        return;
    }

    let player_center = world.player.center_x();
    let player_rect = world.player_rect();
    let enemy = &mut world.enemies[index];
    enemy.facing = Facing::toward(enemy.center_x(), player_center);
    let in_reach = intersects(
        &player_rect,
        &enemy.bounds(),
        world.config.melee_reach_padding,
    );

    if let Some(profile) = enemy.kind.ranged() {
        if enemy.casting > 0 {
            advance_cast(world, index, &profile);
            return;
        }
        if enemy.cast_cooldown == 0 && !in_reach {
            enemy.casting = 1;
            enemy.vx = 0.0;
            debug!("{} {} starts casting", enemy.kind.name(), enemy.id);
            return;
        }
    }

    if enemy.attack_timer > 0 {
        enemy.attack_timer -= 1;
        if enemy.attack_timer == 0 {
            enemy.attacking = false;
        }
        enemy.vx = 0.0;
        return;
    }

    if let Some(rate) = enemy.attack_rate {
        if in_reach && enemy.attack_cooldown == 0 {
            enemy.attacking = true;
            enemy.attack_cooldown = rate;
            enemy.attack_timer = enemy.kind.melee_attack_timer();
            enemy.vx = 0.0;
            enemy_melee(world, index);
            return;
        }
    }

    walk(world, index, dt);
}

fn tick_enemy_timers(enemy: &mut Enemy) {
    enemy.hit_flash = enemy.hit_flash.saturating_sub(1);
    enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);
    enemy.cast_cooldown = enemy.cast_cooldown.saturating_sub(1);
    enemy.glow.tick();
    if !enemy.glow.is_active() {
        enemy.blocking = false;
    }
}

// ============================================================================
// Casting
// ============================================================================

fn advance_cast(world: &mut WorldState, index: usize, profile: &RangedProfile) {
    let enemy = &mut world.enemies[index];
    enemy.casting += 1;
    enemy.vx = 0.0;
    if enemy.casting == profile.release_tick {
        release_projectile(world, index, profile);
    }
    let enemy = &mut world.enemies[index];
    if enemy.casting >= profile.cast_limit {
        enemy.casting = 0;
        enemy.cast_cooldown = profile.cooldown;
    }
}

fn release_projectile(world: &mut WorldState, index: usize, profile: &RangedProfile) {
    let enemy = &world.enemies[index];
    let x = match enemy.facing {
        Facing::Left => enemy.x - CAST_LEFT_OFFSET,
        Facing::Right => enemy.x + enemy.width + CAST_RIGHT_GAP,
    };
    let y = match profile.low_release {
        Some(gap) => enemy.y + enemy.height - profile.height - gap,
        None => enemy.y + enemy.height / 2.0 - profile.height / 2.0,
    };
    let projectile = Projectile::new(
        profile.projectile,
        Owner::Enemy,
        Rect::new(x, y, profile.width, profile.height),
        enemy.facing.sign() * profile.speed,
        profile.damage,
    );
    launch(world, projectile, profile.cue);
}

// ============================================================================
// Melee
// ============================================================================

fn enemy_melee(world: &mut WorldState, index: usize) {
    let enemy = &world.enemies[index];
    let sign = enemy.facing.sign();
    let strike = Strike {
        damage: enemy.damage,
        push: sign * world.config.enemy_melee_push,
    };
    let block_chance = enemy.block_chance;

    if world.player.is_blocking {
        strike_player(world, strike);
        world.enemies[index].knockback_x = -sign * world.config.block_recoil;
        return;
    }

    if world.rng.chance(block_chance) {
        let glow_frames = world.config.glow_frames;
        let enemy = &mut world.enemies[index];
        enemy.blocking = true;
        enemy.glow.set(Glow::White, glow_frames);
        debug!("{} {} flinched", enemy.kind.name(), enemy.id);
        return;
    }

    hurt_player(world, strike);
}

// ============================================================================
// Movement
// ============================================================================

fn walk(world: &mut WorldState, index: usize, dt: f32) {
    let player_center = world.player.center_x();
    let config = &world.config;
    let enemy = &world.enemies[index];

    let dx = player_center - enemy.center_x();
    let vx = if dx.abs() > config.stop_buffer {
        dx.signum() * enemy.speed
    } else {
        0.0
    };
    let mut x = enemy.x + vx * dt;
    let mut stopped = false;

    let body = enemy.bounds();
    for barricade in world.enemies.iter().filter(|e| e.is_live_barricade()) {
        let wall = barricade.bounds();
        if !body.overlaps_vertically(&wall) {
            continue;
        }
        if vx > 0.0 && body.right() <= wall.x && x + body.width > wall.x {
            x = wall.x - body.width;
            stopped = true;
        } else if vx < 0.0 && body.x >= wall.right() && x < wall.right() {
            x = wall.right();
            stopped = true;
        }
    }

    let center = x + body.width / 2.0;
    let offset = center - player_center;
    if offset.abs() < config.push_off_threshold {
        x += if offset >= 0.0 {
            config.push_off_step
        } else {
            -config.push_off_step
        };
    }

    x += separation(&world.enemies, index, x, config.separation_step);
    let x = clamp_to_level(x, body.width, world.bounds);

    let enemy = &mut world.enemies[index];
    enemy.x = x;
    enemy.vx = if stopped { 0.0 } else { vx };
}

/// Nudge away from the first overlapping ally.
fn separation(enemies: &[Enemy], index: usize, x: f32, step: f32) -> f32 {
    let me = &enemies[index];
    for (other_index, other) in enemies.iter().enumerate() {
        if other_index == index || other.dead || other.kind.is_barricade() {
            continue;
        }
        let dx = x - other.x;
        let dy = me.y - other.y;
        if dx.abs() < me.width && dy.abs() < me.height {
            return if dx > 0.0 || (dx == 0.0 && index > other_index) {
                step
            } else {
                -step
            };
        }
    }
    0.0
}

// ============================================================================
// Boss Intros
// ============================================================================

fn start_boss_intro(world: &mut WorldState, index: usize) {
    let enemy = &mut world.enemies[index];
    enemy.intro_done = true;
    enemy.vx = 0.0;
    let id = enemy.id;
    let kind = enemy.kind;

    world.cutscene_active = true;
    world.player.vx = 0.0;
    world.emit(GameEvent::StopAllSounds);
    world.emit(GameEvent::BossIntroStarted { enemy: id, kind });
    info!("Boss intro for {} {}", kind.name(), id);

    let Some(script) = intro_script(kind) else {
        return;
    };
    let now = world.frame;
    let mut at = 0;
    for (delay, cue, line) in script {
        at += delay;
        world
            .scheduler
            .schedule_ms(now, at, ScheduledAction::PlaySound(cue));
        world
            .scheduler
            .schedule_ms(now, at, ScheduledAction::subtitle(line, BOSS_LINE_MS));
    }
    let (last_delay, last_cue) = intro_release(kind);
    at += last_delay;
    if let Some(cue) = last_cue {
        world
            .scheduler
            .schedule_ms(now, at, ScheduledAction::StopSound(cue));
    }
    world
        .scheduler
        .schedule_ms(now, at, ScheduledAction::EndCutscene);
}

/// Voice lines of a boss intro with the delay before each one.
fn intro_script(kind: EnemyKind) -> Option<[(u32, SoundCue, &'static str); 2]> {
    match kind {
        EnemyKind::BanditLord => Some([
            (250, SoundCue::QuinnRescue, "I'm here to rescue Claire!"),
            (
                2000,
                SoundCue::BanditLordTaunt,
                "I won't let you rescue the princess!",
            ),
        ]),
        EnemyKind::ZombieLord => Some([
            (250, SoundCue::ZombieLord, "You'll never leave this cave!"),
            (2800, SoundCue::QuinnZombie, "I'm not afraid of you!"),
        ]),
        EnemyKind::BanditLeader => Some([
            (250, SoundCue::BanditLeader, "Stand and deliver!"),
            (2800, SoundCue::QuinnDefiant, "You wont get away with this!"),
        ]),
        _ => None,
    }
}

/// Delay before combat resumes, and a cue to cut off when it does.
fn intro_release(kind: EnemyKind) -> (u32, Option<SoundCue>) {
    match kind {
        EnemyKind::BanditLord => (1500, Some(SoundCue::BanditLordTaunt)),
        _ => (1500, None),
    }
}
