//! Shared entity state and the player record.
//!
//! This module provides:
//! - Facing direction
//! - Glow feedback tags read by the renderer
//! - The player record and its spawn factory

use serde::{Deserialize, Serialize};

use quest_common::{Bounded, EntityId, Rect};

use crate::config::SimConfig;

// ============================================================================
// Facing
// ============================================================================

/// Horizontal facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing left (negative x)
    Left,
    /// Facing right (positive x)
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right.
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing from `from_x` toward `to_x`. Ties face right.
    #[must_use]
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// The opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ============================================================================
// Glow
// ============================================================================

/// Cosmetic feedback tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glow {
    /// Took damage
    Red,
    /// Blocked an attack
    Blue,
    /// Invincibility cheat active
    Yellow,
    /// Stunned
    White,
}

/// A glow tag with its remaining lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlowState {
    /// Current tint, if any
    pub color: Option<Glow>,
    /// Frames left before the tint clears
    pub timer: u32,
}

impl GlowState {
    /// Shows `color` for `frames` ticks.
    pub fn set(&mut self, color: Glow, frames: u32) {
        self.color = Some(color);
        self.timer = frames;
    }

    /// Counts down one tick and clears the tint when it runs out.
    pub fn tick(&mut self) {
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.color = None;
        }
    }

    /// Whether a tint is showing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.color.is_some()
    }
}

// ============================================================================
// Player
// ============================================================================

/// Player width and height.
pub const PLAYER_SIZE: f32 = 128.0;
/// Player starting x.
pub const PLAYER_START_X: f32 = 100.0;
/// Player starting health.
pub const PLAYER_MAX_HEALTH: i32 = 10;

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Entity ID
    pub id: EntityId,
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
    /// Decaying horizontal impulse from hits and blocks
    pub knockback_x: f32,
    /// Walking speed for the current level
    pub speed: f32,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Melee damage
    pub damage: i32,
    /// Facing direction
    pub facing: Facing,
    /// Standing on the road
    pub on_ground: bool,
    /// Holding block
    pub is_blocking: bool,
    /// Mid sword swing
    pub is_attacking: bool,
    /// Winding up a fireball
    pub casting_magic: bool,
    /// Health ran out
    pub dead: bool,
    /// Invincibility cheat toggled on
    pub invincible: bool,
    /// Frames until the next swing
    pub attack_cooldown: u32,
    /// Frames left in the current swing
    pub attack_timer: u32,
    /// Frames until the next fireball
    pub magic_cooldown: u32,
    /// Tick at which the pending fireball launches
    pub cast_frame: Option<u64>,
    /// Post-hit invulnerability frames
    pub invincibility_timer: u32,
    /// Frames of hit flash
    pub hit_flash: u32,
    /// Feedback tint
    pub glow: GlowState,
}

impl Player {
    /// Creates a player standing at the start of a level.
    #[must_use]
    pub fn spawn(config: &SimConfig, speed: f32) -> Self {
        Self {
            id: EntityId::new(),
            x: PLAYER_START_X,
            y: config.player_ground_y(PLAYER_SIZE),
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            vx: 0.0,
            vy: 0.0,
            knockback_x: 0.0,
            speed,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            damage: 1,
            facing: Facing::Right,
            on_ground: true,
            is_blocking: false,
            is_attacking: false,
            casting_magic: false,
            dead: false,
            invincible: false,
            attack_cooldown: 0,
            attack_timer: 0,
            magic_cooldown: 0,
            cast_frame: None,
            invincibility_timer: 0,
            hit_flash: 0,
            glow: GlowState::default(),
        }
    }

    /// Horizontal midpoint.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether an action currently pins the player in place.
    #[must_use]
    pub fn is_action_locked(&self) -> bool {
        self.is_blocking || self.is_attacking || self.attack_timer > 0 || self.casting_magic
    }

    /// Whether incoming damage is ignored right now.
    #[must_use]
    pub fn is_immune(&self) -> bool {
        self.dead || self.invincible || self.invincibility_timer > 0
    }

    /// Heals by `amount`, never past max health. Returns whether anything changed.
    pub fn heal(&mut self, amount: i32) -> bool {
        if self.dead || self.health >= self.max_health {
            return false;
        }
        self.health = (self.health + amount).min(self.max_health);
        true
    }

    /// Drops an in-progress swing or cast.
    pub fn cancel_actions(&mut self) {
        self.is_attacking = false;
        self.attack_timer = 0;
        self.casting_magic = false;
        self.cast_frame = None;
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawns_on_ground() {
        let config = SimConfig::default();
        let player = Player::spawn(&config, 18.0);
        assert_eq!(player.x, 100.0);
        assert_eq!(player.y, 720.0 - 140.0 - 128.0 - 45.0);
        assert!(player.on_ground);
        assert_eq!(player.health, 10);
        assert_eq!(player.speed, 18.0);
    }

    #[test]
    fn test_facing_helpers() {
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::toward(10.0, 5.0), Facing::Left);
        assert_eq!(Facing::toward(10.0, 10.0), Facing::Right);
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }

    #[test]
    fn test_glow_expires() {
        let mut glow = GlowState::default();
        glow.set(Glow::Red, 2);
        glow.tick();
        assert_eq!(glow.color, Some(Glow::Red));
        glow.tick();
        assert!(!glow.is_active());
        glow.tick();
        assert_eq!(glow.timer, 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let config = SimConfig::default();
        let mut player = Player::spawn(&config, 18.0);
        assert!(!player.heal(1));
        player.health = 9;
        assert!(player.heal(5));
        assert_eq!(player.health, 10);
    }

    #[test]
    fn test_cancel_actions() {
        let config = SimConfig::default();
        let mut player = Player::spawn(&config, 18.0);
        player.is_attacking = true;
        player.attack_timer = 3;
        player.casting_magic = true;
        player.cast_frame = Some(12);
        player.cancel_actions();
        assert!(!player.is_action_locked());
        assert_eq!(player.cast_frame, None);
    }
}
