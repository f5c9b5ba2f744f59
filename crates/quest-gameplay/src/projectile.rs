//! Projectiles and their per-tick simulation.
//!
//! Fireballs belong to the player and hit barricades or enemies. Acid, bolts
//! and evil magic belong to enemies and only hit the player. A projectile is
//! consumed by its first hit and despawns once it leaves the level.

use serde::{Deserialize, Serialize};

use quest_common::{intersects, Bounded, EntityId, Rect};

use crate::combat::{strike_barricade, strike_enemy, Strike};
use crate::events::{GameEvent, SoundCue};
use crate::player::strike_player;
use crate::world::WorldState;

/// Projectile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Player magic
    Fireball,
    /// Big goblin spit
    Acid,
    /// Crossbow bandit bolt
    CrossbowBolt,
    /// Caster magic
    EvilMagic,
}

impl ProjectileKind {
    /// Sound played when the projectile lands a hit.
    #[must_use]
    pub fn hit_cue(&self) -> Option<SoundCue> {
        match self {
            Self::Fireball => Some(SoundCue::FireballHit),
            Self::Acid => Some(SoundCue::AcidHit),
            Self::CrossbowBolt | Self::EvilMagic => None,
        }
    }
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Hits enemies and barricades
    Player,
    /// Hits the player
    Enemy,
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Entity ID
    pub id: EntityId,
    /// Projectile type
    pub kind: ProjectileKind,
    /// Faction
    pub owner: Owner,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
    /// Horizontal velocity
    pub vx: f32,
    /// Vertical velocity
    pub vy: f32,
    /// Damage on hit
    pub damage: i32,
    /// Tick it was fired on
    pub spawn_frame: u64,
}

impl Projectile {
    /// Creates a projectile flying horizontally at `vx`.
    #[must_use]
    pub fn new(kind: ProjectileKind, owner: Owner, rect: Rect, vx: f32, damage: i32) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            owner,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            vx,
            vy: 0.0,
            damage,
            spawn_frame: 0,
        }
    }

    /// Builder: records the launch tick.
    #[must_use]
    pub fn with_spawn_frame(mut self, frame: u64) -> Self {
        self.spawn_frame = frame;
        self
    }

    /// Whether the projectile has left the playable area.
    #[must_use]
    pub fn is_out_of_bounds(&self, left: f32, right: f32, height: f32) -> bool {
        self.x < left || self.x > right || self.y < 0.0 || self.y > height
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Adds a projectile to the world and announces it.
pub fn launch(world: &mut WorldState, projectile: Projectile, cue: SoundCue) {
    world.play(cue);
    world.emit(GameEvent::ProjectileSpawned {
        projectile: projectile.id,
        kind: projectile.kind,
    });
    world.projectiles.push(projectile.with_spawn_frame(world.frame));
}

/// Moves every projectile, resolves hits and drops the spent ones.
pub fn update_projectiles(world: &mut WorldState, dt: f32) {
    let in_flight = std::mem::take(&mut world.projectiles);
    let mut kept = Vec::with_capacity(in_flight.len());

    for mut projectile in in_flight {
        projectile.x += projectile.vx * dt;
        projectile.y += projectile.vy * dt;
        if projectile.is_out_of_bounds(
            world.bounds.left,
            world.bounds.right,
            world.config.viewport_height,
        ) {
            continue;
        }

        let consumed = match projectile.owner {
            Owner::Player => hit_enemies(world, &projectile),
            Owner::Enemy => hit_player(world, &projectile),
        };
        if !consumed {
            kept.push(projectile);
        }
    }

    // Anything launched while resolving hits goes after the survivors.
    kept.append(&mut world.projectiles);
    world.projectiles = kept;
}

fn hit_enemies(world: &mut WorldState, projectile: &Projectile) -> bool {
    let rect = projectile.bounds();

    let barricade = world
        .enemies
        .iter()
        .position(|e| e.is_live_barricade() && intersects(&rect, &e.bounds(), 0.0));
    if let Some(index) = barricade {
        if let Some(cue) = projectile.kind.hit_cue() {
            world.play(cue);
        }
        strike_barricade(world, index, 1);
        return true;
    }

    let target = world.enemies.iter().position(|e| {
        e.is_alive() && !e.kind.is_barricade() && intersects(&rect, &e.bounds(), 0.0)
    });
    match target {
        Some(index) => {
            if let Some(cue) = projectile.kind.hit_cue() {
                world.play(cue);
            }
            let strike = Strike {
                damage: projectile.damage,
                push: projectile.vx,
            };
            strike_enemy(world, index, strike);
            true
        },
        None => false,
    }
}

fn hit_player(world: &mut WorldState, projectile: &Projectile) -> bool {
    if world.player.dead || !intersects(&projectile.bounds(), &world.player_rect(), 0.0) {
        return false;
    }
    if let Some(cue) = projectile.kind.hit_cue() {
        world.play(cue);
    }
    let strike = Strike {
        damage: projectile.damage,
        push: projectile.vx,
    };
    strike_player(world, strike);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::enemy::{Enemy, EnemyKind};
    use crate::rng::ScriptedRolls;
    use crate::world::LevelBounds;

    fn world() -> WorldState {
        let mut world = WorldState::new(SimConfig::default(), Box::new(ScriptedRolls::default()));
        world.bounds = LevelBounds::new(5000.0);
        world
    }

    fn fireball(x: f32, vx: f32) -> Projectile {
        Projectile::new(
            ProjectileKind::Fireball,
            Owner::Player,
            Rect::new(x, 400.0, 80.0, 90.0),
            vx,
            2,
        )
    }

    #[test]
    fn test_projectile_moves_with_dt() {
        let mut world = world();
        world.projectiles.push(fireball(1000.0, 12.0));
        update_projectiles(&mut world, 0.5);
        assert_eq!(world.projectiles[0].x, 1006.0);
    }

    #[test]
    fn test_projectile_despawns_past_level_edge() {
        let mut world = world();
        world.projectiles.push(fireball(4995.0, 12.0));
        world.projectiles.push(fireball(5.0, -12.0));
        update_projectiles(&mut world, 1.0);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_despawns_outside_vertical_band() {
        let mut world = world();
        let mut falling = fireball(1000.0, 0.0);
        falling.y = world.config.viewport_height - 5.0;
        falling.vy = 8.0;
        let mut rising = fireball(2000.0, 0.0);
        rising.y = 3.0;
        rising.vy = -5.0;
        let level = fireball(3000.0, 0.0);
        world.projectiles.extend([falling, rising, level]);

        update_projectiles(&mut world, 1.0);

        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].x, 3000.0);
    }

    #[test]
    fn test_blocked_bolt_pushes_back_with_its_speed() {
        let mut world = world();
        world.player.x = 1000.0;
        world.player.is_blocking = true;
        world.projectiles.push(Projectile::new(
            ProjectileKind::CrossbowBolt,
            Owner::Enemy,
            Rect::new(1100.0, 450.0, 64.0, 16.0),
            -6.0,
            2,
        ));

        update_projectiles(&mut world, 1.0);

        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.health, 10);
        assert_eq!(world.player.knockback_x, -4.5);
    }

    #[test]
    fn test_fireball_knockback_scales_with_speed() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Necromancer, 1050.0, None, &config));
        world.projectiles.push(Projectile::new(
            ProjectileKind::Fireball,
            Owner::Player,
            Rect::new(1000.0, 400.0, 80.0, 90.0),
            12.0,
            1,
        ));

        update_projectiles(&mut world, 1.0);

        let necromancer = &world.enemies[0];
        assert_eq!(necromancer.health, 1);
        assert_eq!(necromancer.knockback_x, 12.0 * config.hit_knockback);
    }

    #[test]
    fn test_fireball_prefers_barricade() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Goblin, 1040.0, None, &config));
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Barricade, 1060.0, None, &config));
        world.projectiles.push(fireball(1000.0, 12.0));

        update_projectiles(&mut world, 1.0);

        assert!(world.projectiles.is_empty());
        assert_eq!(world.enemies[0].health, 1);
        assert_eq!(world.enemies[1].health, 2);
    }

    #[test]
    fn test_fireball_hits_one_enemy_only() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Necromancer, 1050.0, None, &config));
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Necromancer, 1060.0, None, &config));
        world.projectiles.push(fireball(1000.0, 12.0));

        update_projectiles(&mut world, 1.0);

        assert!(world.projectiles.is_empty());
        assert!(world.enemies[0].dead);
        assert_eq!(world.enemies[1].health, 2);
    }

    #[test]
    fn test_fireball_ignores_corpses() {
        let mut world = world();
        let config = world.config.clone();
        let mut corpse = Enemy::spawn(EnemyKind::Goblin, 1050.0, None, &config);
        corpse.make_corpse();
        world.enemies.push(corpse);
        world.projectiles.push(fireball(1000.0, 12.0));

        update_projectiles(&mut world, 1.0);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_enemy_bolt_hurts_player() {
        let mut world = world();
        world.player.x = 1000.0;
        let bolt = Projectile::new(
            ProjectileKind::CrossbowBolt,
            Owner::Enemy,
            Rect::new(1100.0, 450.0, 64.0, 16.0),
            -6.0,
            2,
        );
        world.projectiles.push(bolt);

        update_projectiles(&mut world, 1.0);

        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.health, 8);
    }

    #[test]
    fn test_enemy_projectiles_pass_through_enemies() {
        let mut world = world();
        let config = world.config.clone();
        world
            .enemies
            .push(Enemy::spawn(EnemyKind::Goblin, 2000.0, None, &config));
        let acid = Projectile::new(
            ProjectileKind::Acid,
            Owner::Enemy,
            Rect::new(2020.0, 450.0, 96.0, 64.0),
            -4.0,
            1,
        );
        world.projectiles.push(acid);

        update_projectiles(&mut world, 1.0);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.enemies[0].health, 1);
    }
}
