//! Enemy kinds and the enemy record.
//!
//! Every enemy shares one fixed-shape [`Enemy`] record. Behavior differences
//! come from the per-kind parameter table on [`EnemyKind`]: stats, melee
//! timing, ranged capability, boss status and loot rates.

use serde::{Deserialize, Serialize};

use quest_common::{Bounded, EntityId, Rect};

use crate::config::SimConfig;
use crate::entity::{Facing, GlowState};
use crate::events::SoundCue;
use crate::pickup::PickupKind;
use crate::projectile::ProjectileKind;

// ============================================================================
// Enemy Kinds
// ============================================================================

/// Enemy variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Small melee goblin
    Goblin,
    /// Acid-spitting goblin
    BigGoblin,
    /// Melee bandit
    Bandit,
    /// Stationary crossbow bandit
    BanditCrossbow,
    /// Level 2 boss
    BanditLeader,
    /// Destructible obstacle
    Barricade,
    /// Slow melee zombie
    Zombie,
    /// Evil magic caster
    Necromancer,
    /// Level 4 boss
    ZombieLord,
    /// Final boss
    BanditLord,
    /// Level 6 mini-boss
    Hound,
}

/// Ranged attack parameters for a kind that can cast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedProfile {
    /// Projectile type
    pub projectile: ProjectileKind,
    /// Horizontal speed
    pub speed: f32,
    /// Projectile width
    pub width: f32,
    /// Projectile height
    pub height: f32,
    /// Projectile damage
    pub damage: i32,
    /// Frames to wait after a cast finishes
    pub cooldown: u32,
    /// Length of the cast animation in frames
    pub cast_limit: u32,
    /// Cast frame on which the projectile leaves
    pub release_tick: u32,
    /// Gap between the projectile's bottom and the caster's feet, if it is
    /// launched low instead of from the caster's middle
    pub low_release: Option<f32>,
    /// Launch sound
    pub cue: SoundCue,
}

impl EnemyKind {
    /// Every kind.
    pub const ALL: [EnemyKind; 11] = [
        EnemyKind::Goblin,
        EnemyKind::BigGoblin,
        EnemyKind::Bandit,
        EnemyKind::BanditCrossbow,
        EnemyKind::BanditLeader,
        EnemyKind::Barricade,
        EnemyKind::Zombie,
        EnemyKind::Necromancer,
        EnemyKind::ZombieLord,
        EnemyKind::BanditLord,
        EnemyKind::Hound,
    ];

    /// Sprite-set name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Goblin => "goblin",
            Self::BigGoblin => "big_goblin",
            Self::Bandit => "bandit",
            Self::BanditCrossbow => "bandit_crossbow",
            Self::BanditLeader => "bandit_leader",
            Self::Barricade => "barricade",
            Self::Zombie => "zombie",
            Self::Necromancer => "necromancer",
            Self::ZombieLord => "zombie_lord",
            Self::BanditLord => "bandit_lord",
            Self::Hound => "hound",
        }
    }

    /// Body width and height.
    #[must_use]
    pub fn size(&self) -> (f32, f32) {
        match self {
            Self::Goblin => (110.0, 110.0),
            Self::BigGoblin => (170.0, 170.0),
            Self::Bandit | Self::BanditCrossbow => (160.0, 160.0),
            Self::BanditLeader => (190.0, 190.0),
            Self::Barricade => (130.0, 156.0),
            Self::Zombie => (141.0, 141.0),
            Self::Necromancer => (150.0, 150.0),
            Self::ZombieLord => (275.0, 275.0),
            Self::BanditLord => (384.0, 384.0),
            Self::Hound => (180.0, 120.0),
        }
    }

    /// How far the sprite's bottom sinks below the road line.
    #[must_use]
    pub fn ground_embed(&self) -> f32 {
        match self {
            Self::Goblin => 6.0,
            Self::BigGoblin => -4.0,
            Self::Bandit | Self::BanditCrossbow => 16.0,
            Self::BanditLeader => 0.0,
            Self::Barricade => 26.0,
            Self::Zombie => 14.0,
            Self::Necromancer => 11.0,
            Self::ZombieLord => 25.0,
            Self::BanditLord => -46.0,
            Self::Hound => -20.0,
        }
    }

    /// Starting health.
    #[must_use]
    pub fn health(&self) -> i32 {
        match self {
            Self::Goblin | Self::Bandit | Self::Zombie => 1,
            Self::BigGoblin | Self::BanditCrossbow | Self::Necromancer => 2,
            Self::Barricade => 3,
            Self::BanditLeader | Self::ZombieLord | Self::Hound => 10,
            Self::BanditLord => 15,
        }
    }

    /// Melee damage.
    #[must_use]
    pub fn damage(&self) -> i32 {
        match self {
            Self::BanditCrossbow | Self::Barricade => 0,
            Self::Goblin | Self::BigGoblin | Self::Bandit | Self::Zombie => 1,
            Self::BanditLeader | Self::Necromancer | Self::ZombieLord | Self::Hound => 2,
            Self::BanditLord => 3,
        }
    }

    /// Walking speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        match self {
            Self::BanditCrossbow | Self::Barricade => 0.0,
            Self::Zombie => 1.0,
            Self::BigGoblin | Self::Necromancer | Self::ZombieLord => 1.5,
            Self::Goblin | Self::Bandit | Self::BanditLeader => 2.0,
            Self::Hound => 3.2,
            Self::BanditLord => 4.0,
        }
    }

    /// Frames between melee attacks. Barricades never attack.
    #[must_use]
    pub fn attack_rate(&self) -> Option<u32> {
        match self {
            Self::Barricade => None,
            Self::Goblin | Self::Bandit | Self::Zombie => Some(45),
            Self::BigGoblin | Self::Necromancer => Some(30),
            Self::BanditCrossbow | Self::BanditLeader | Self::ZombieLord => Some(40),
            Self::BanditLord => Some(36),
            Self::Hound => Some(20),
        }
    }

    /// Length of the melee swing animation in frames.
    #[must_use]
    pub fn melee_attack_timer(&self) -> u32 {
        match self {
            Self::Goblin => 12,
            Self::BigGoblin => 16,
            Self::Bandit => 14,
            Self::BanditCrossbow => 10,
            Self::BanditLeader | Self::ZombieLord => 20,
            Self::BanditLord => 24,
            Self::Hound => 18,
            Self::Necromancer | Self::Zombie => 8,
            Self::Barricade => 15,
        }
    }

    /// Probability of blocking an incoming strike.
    #[must_use]
    pub fn block_chance(&self) -> f32 {
        match self {
            Self::Barricade => 0.0,
            Self::Goblin | Self::Bandit | Self::Zombie => 0.1,
            Self::BigGoblin | Self::BanditCrossbow | Self::Necromancer => 0.2,
            Self::Hound => 0.3,
            Self::BanditLeader | Self::ZombieLord => 0.4,
            Self::BanditLord => 0.5,
        }
    }

    /// Ranged attack, for kinds that have one.
    #[must_use]
    pub fn ranged(&self) -> Option<RangedProfile> {
        let evil_magic = |size: f32, cooldown: u32, cast_limit: u32, low: Option<f32>| {
            RangedProfile {
                projectile: ProjectileKind::EvilMagic,
                speed: 3.0,
                width: size,
                height: size,
                damage: 2,
                cooldown,
                cast_limit,
                release_tick: 12,
                low_release: low,
                cue: SoundCue::EvilMagic,
            }
        };
        match self {
            Self::BigGoblin => Some(RangedProfile {
                projectile: ProjectileKind::Acid,
                speed: 4.0,
                width: 96.0,
                height: 64.0,
                damage: 1,
                cooldown: 72,
                cast_limit: 60,
                release_tick: 12,
                low_release: None,
                cue: SoundCue::Acid,
            }),
            Self::BanditCrossbow => Some(RangedProfile {
                projectile: ProjectileKind::CrossbowBolt,
                speed: 6.0,
                width: 64.0,
                height: 16.0,
                damage: 2,
                cooldown: 48,
                cast_limit: 60,
                release_tick: 12,
                low_release: None,
                cue: SoundCue::CrossbowBolt,
            }),
            Self::Necromancer => Some(evil_magic(83.0, 60, 60, None)),
            Self::ZombieLord => Some(evil_magic(72.0, 60, 60, None)),
            Self::BanditLord => Some(evil_magic(72.0, 24, 35, Some(24.0))),
            _ => None,
        }
    }

    /// Whether the kind can cast.
    #[must_use]
    pub fn is_ranged(&self) -> bool {
        self.ranged().is_some()
    }

    /// Whether the kind triggers a boss intro.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        matches!(self, Self::BanditLeader | Self::ZombieLord | Self::BanditLord)
    }

    /// Whether the kind is a barricade.
    #[must_use]
    pub fn is_barricade(&self) -> bool {
        matches!(self, Self::Barricade)
    }

    /// Heart drop probability, falling back to the configured default.
    #[must_use]
    pub fn heart_chance(&self, config: &SimConfig) -> f32 {
        match self {
            Self::BigGoblin | Self::Hound => 1.0,
            Self::BanditCrossbow | Self::Necromancer => 0.3,
            _ => config.heart_chance,
        }
    }

    /// Level-progression item dropped on death.
    #[must_use]
    pub fn progression_drop(&self) -> Option<PickupKind> {
        match self {
            Self::BanditLeader => Some(PickupKind::Scroll),
            Self::ZombieLord => Some(PickupKind::Key),
            _ => None,
        }
    }

    /// Sound played when the kind dies.
    #[must_use]
    pub fn death_cue(&self) -> SoundCue {
        match self {
            Self::Barricade => SoundCue::Broke,
            Self::Hound => SoundCue::HoundDead,
            Self::BanditLord => SoundCue::BanditLordDead,
            _ => SoundCue::EnemyDeath,
        }
    }
}

// ============================================================================
// Enemy Record
// ============================================================================

/// A single enemy or barricade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Entity ID
    pub id: EntityId,
    /// Variant tag
    pub kind: EnemyKind,
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
    /// Decaying horizontal impulse
    pub knockback_x: f32,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Melee damage
    pub damage: i32,
    /// Walking speed
    pub speed: f32,
    /// Facing direction
    pub facing: Facing,
    /// Killed or destroyed
    pub dead: bool,
    /// Showing a block or flinch
    pub blocking: bool,
    /// Mid melee swing
    pub attacking: bool,
    /// Cast progress in frames, zero when not casting
    pub casting: u32,
    /// Frames left in the melee swing
    pub attack_timer: u32,
    /// Frames until the next melee swing
    pub attack_cooldown: u32,
    /// Frames until the next cast
    pub cast_cooldown: u32,
    /// Frames between melee swings, `None` if it never attacks
    pub attack_rate: Option<u32>,
    /// Probability of blocking a strike
    pub block_chance: f32,
    /// Frames of hit flash
    pub hit_flash: u32,
    /// Feedback tint
    pub glow: GlowState,
    /// Boss intro already played
    pub intro_done: bool,
}

impl Enemy {
    /// Creates an enemy of `kind` at `x`. Without an explicit `y` the body is
    /// placed on the road using the kind's ground embed.
    #[must_use]
    pub fn spawn(kind: EnemyKind, x: f32, y: Option<f32>, config: &SimConfig) -> Self {
        let (width, height) = kind.size();
        let y = y.unwrap_or_else(|| config.ground_line() - height + kind.ground_embed());
        let health = kind.health();
        Self {
            id: EntityId::new(),
            kind,
            x,
            y,
            width,
            height,
            vx: 0.0,
            vy: 0.0,
            knockback_x: 0.0,
            health,
            max_health: health,
            damage: kind.damage(),
            speed: kind.speed(),
            facing: Facing::Left,
            dead: false,
            blocking: false,
            attacking: false,
            casting: 0,
            attack_timer: 0,
            attack_cooldown: 0,
            cast_cooldown: 0,
            attack_rate: kind.attack_rate(),
            block_chance: kind.block_chance(),
            hit_flash: 0,
            glow: GlowState::default(),
            intro_done: false,
        }
    }

    /// Horizontal midpoint.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether this enemy is alive and can act.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Whether this is a live barricade.
    #[must_use]
    pub fn is_live_barricade(&self) -> bool {
        !self.dead && self.kind.is_barricade()
    }

    /// Subtracts `amount` health, never below zero. Returns whether it died.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if amount > 0 {
            self.health = (self.health - amount).max(0);
        }
        self.health <= 0
    }

    /// Turns the enemy into an inert corpse.
    pub fn make_corpse(&mut self) {
        self.dead = true;
        self.health = 0;
        self.vx = 0.0;
        self.vy = 0.0;
        self.knockback_x = 0.0;
        self.blocking = false;
        self.attacking = false;
        self.casting = 0;
        self.attack_timer = 0;
        self.attack_cooldown = 0;
        self.cast_cooldown = 0;
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
