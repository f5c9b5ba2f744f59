//! Simulation tunables.
//!
//! Every number the combat loop depends on lives here so that levels, tests and
//! the engine config file can override it. Values are frame-based: one tick is
//! one 60 Hz frame and `dt` is normalized so that 1.0 equals one such frame.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ticks per second the frame counters are calibrated against.
pub const TICKS_PER_SECOND: u32 = 60;

/// Converts a wall-clock delay in milliseconds to whole ticks (rounded up).
#[must_use]
pub const fn ms_to_ticks(ms: u32) -> u64 {
    ((ms as u64) * (TICKS_PER_SECOND as u64)).div_ceil(1000)
}

/// Simulation configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Screen & Ground ===
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Height of the road band at the bottom of the screen
    pub ground_height: f32,
    /// Extra lift applied to the player's feet above the road line
    pub player_foot_offset: f32,

    // === Player Physics ===
    /// Gravity added to vertical velocity per normalized frame
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative is up)
    pub jump_force: f32,
    /// Knockback multiplier applied every tick
    pub knockback_decay: f32,
    /// Knockback magnitude below which it snaps to zero
    pub knockback_cutoff: f32,

    // === Player Combat ===
    /// Padding used by the melee reach test
    pub melee_reach_padding: f32,
    /// Extra reach in the facing direction when striking barricades
    pub barricade_reach_bonus: f32,
    /// Frames between two melee swings
    pub player_attack_cooldown: u32,
    /// Frames the swing animation locks movement
    pub player_attack_timer: u32,
    /// Horizontal source velocity of a player sword swing
    pub player_melee_push: f32,
    /// Frames between pressing cast and the fireball leaving
    pub cast_delay: u32,
    /// Frames before another fireball can be cast
    pub magic_cooldown: u32,
    /// Fireball horizontal speed
    pub fireball_speed: f32,
    /// Fireball width
    pub fireball_width: f32,
    /// Fireball height
    pub fireball_height: f32,
    /// Fireball damage
    pub fireball_damage: i32,

    // === Damage Feedback ===
    /// Invincibility frames after the player is hurt
    pub invincibility_frames: u32,
    /// Frames a glow tag stays visible
    pub glow_frames: u32,
    /// Frames of hit flash after taking damage
    pub hit_flash_frames: u32,
    /// Share of the source velocity turned into pushback on a block
    pub block_pushback: f32,
    /// Share of the source velocity turned into knockback on a hit
    pub hit_knockback: f32,
    /// Knockback an attacker receives when its swing is blocked
    pub block_recoil: f32,
    /// Source velocity of an enemy melee strike
    pub enemy_melee_push: f32,

    // === Enemy Behavior ===
    /// Distance behind the camera's left edge where enemies stay active
    pub view_margin_behind: f32,
    /// Distance past the camera's right edge where enemies stay active
    pub view_margin_ahead: f32,
    /// Midpoint distance at which walking enemies stop short of the player
    pub stop_buffer: f32,
    /// Nudge applied to separate overlapping enemies
    pub separation_step: f32,
    /// Nudge applied to an enemy standing on the player
    pub push_off_step: f32,
    /// Horizontal distance under which an enemy counts as standing on the player
    pub push_off_threshold: f32,

    // === Loot ===
    /// Probability that a dying enemy drops a coin
    pub coin_chance: f32,
    /// Heart drop probability for kinds without their own rate
    pub heart_chance: f32,
    /// Frames before an uncollected coin or heart disappears
    pub pickup_life: u32,
    /// Minimum distance between a drop and the level edge
    pub drop_margin: f32,

    // === Effects & Audio ===
    /// Maximum number of live particles
    pub particle_cap: usize,
    /// Sound effect volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Voice line volume (0.0 - 1.0)
    pub voice_volume: f32,

    // === Timing ===
    /// Largest normalized delta a single tick will integrate
    pub max_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            ground_height: 140.0,
            player_foot_offset: 45.0,

            gravity: 2.5,
            jump_force: -45.0,
            knockback_decay: 0.8,
            knockback_cutoff: 0.1,

            melee_reach_padding: 16.0,
            barricade_reach_bonus: 32.0,
            player_attack_cooldown: 9,
            player_attack_timer: 5,
            player_melee_push: 10.0,
            cast_delay: 9,
            magic_cooldown: 104,
            fireball_speed: 12.0,
            fireball_width: 80.0,
            fireball_height: 90.0,
            fireball_damage: 2,

            invincibility_frames: 60,
            glow_frames: 10,
            hit_flash_frames: 10,
            block_pushback: 0.75,
            hit_knockback: 0.8,
            block_recoil: 3.0,
            enemy_melee_push: 4.0,

            view_margin_behind: 100.0,
            view_margin_ahead: 200.0,
            stop_buffer: 16.0,
            separation_step: 1.0,
            push_off_step: 1.5,
            push_off_threshold: 4.0,

            coin_chance: 0.75,
            heart_chance: 0.1,
            pickup_life: 2000,
            drop_margin: 20.0,

            particle_cap: 300,
            sfx_volume: 0.35,
            music_volume: 0.45,
            voice_volume: 1.0,

            max_dt: 3.0,
        }
    }
}

impl SimConfig {
    /// Y coordinate of the top of the road.
    #[must_use]
    pub fn ground_line(&self) -> f32 {
        self.viewport_height - self.ground_height
    }

    /// Resting y of the player's top edge for a body of `height`.
    #[must_use]
    pub fn player_ground_y(&self, height: f32) -> f32 {
        self.ground_line() - height - self.player_foot_offset
    }

    /// Baseline that coin, heart and progression drops sit on.
    #[must_use]
    pub fn drop_ground_y(&self) -> f32 {
        self.ground_line() - self.player_foot_offset
    }

    /// Clamps a frame delta into `[0, max_dt]`. Non-finite input counts as zero.
    #[must_use]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.max(0.0).min(self.max_dt)
        } else {
            0.0
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Screen
        self.viewport_width = clamp_logged("viewport_width", self.viewport_width, 320.0, 7680.0);
        self.viewport_height =
            clamp_logged("viewport_height", self.viewport_height, 240.0, 4320.0);
        self.ground_height = clamp_logged(
            "ground_height",
            self.ground_height,
            0.0,
            self.viewport_height / 2.0,
        );

        // Physics
        self.gravity = clamp_logged("gravity", self.gravity, 0.0, 20.0);
        self.jump_force = clamp_logged("jump_force", self.jump_force, -200.0, 0.0);
        self.knockback_decay = clamp_logged("knockback_decay", self.knockback_decay, 0.0, 0.99);
        self.knockback_cutoff = clamp_logged("knockback_cutoff", self.knockback_cutoff, 0.0, 10.0);

        // Combat
        self.block_pushback = clamp_logged("block_pushback", self.block_pushback, 0.0, 5.0);
        self.hit_knockback = clamp_logged("hit_knockback", self.hit_knockback, 0.0, 5.0);
        self.fireball_damage = self.fireball_damage.max(0);
        if self.cast_delay == 0 {
            warn!("cast_delay must be at least one frame, clamping");
            self.cast_delay = 1;
        }

        // Loot
        self.coin_chance = clamp_logged("coin_chance", self.coin_chance, 0.0, 1.0);
        self.heart_chance = clamp_logged("heart_chance", self.heart_chance, 0.0, 1.0);
        self.drop_margin = clamp_logged("drop_margin", self.drop_margin, 0.0, 500.0);

        // Audio
        self.sfx_volume = clamp_logged("sfx_volume", self.sfx_volume, 0.0, 1.0);
        self.music_volume = clamp_logged("music_volume", self.music_volume, 0.0, 1.0);
        self.voice_volume = clamp_logged("voice_volume", self.voice_volume, 0.0, 1.0);

        // Timing
        self.max_dt = clamp_logged("max_dt", self.max_dt, 0.1, 10.0);
    }
}

/// Clamps `value` into `[min, max]`, warning when it had to move.
fn clamp_logged(name: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = if value.is_nan() {
        min
    } else {
        value.max(min).min(max)
    };
    if (clamped - value).abs() > f32::EPSILON || value.is_nan() {
        warn!("{name} = {value} out of range, clamped to {clamped}");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.viewport_width, 1280.0);
        assert_eq!(config.viewport_height, 720.0);
        assert_eq!(config.invincibility_frames, 60);
        assert_eq!(config.magic_cooldown, 104);
    }

    #[test]
    fn test_ground_helpers() {
        let config = SimConfig::default();
        assert_eq!(config.ground_line(), 580.0);
        assert_eq!(config.player_ground_y(128.0), 407.0);
        assert_eq!(config.drop_ground_y(), 535.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig {
            coin_chance: 2.0,
            sfx_volume: -1.0,
            max_dt: 100.0,
            cast_delay: 0,
            ..SimConfig::default()
        };
        config.validate();

        assert_eq!(config.coin_chance, 1.0);
        assert_eq!(config.sfx_volume, 0.0);
        assert_eq!(config.max_dt, 10.0);
        assert_eq!(config.cast_delay, 1);
    }

    #[test]
    fn test_validation_keeps_defaults() {
        let mut config = SimConfig::default();
        config.validate();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_clamp_dt() {
        let config = SimConfig::default();
        assert_eq!(config.clamp_dt(1.0), 1.0);
        assert_eq!(config.clamp_dt(50.0), 3.0);
        assert_eq!(config.clamp_dt(-1.0), 0.0);
        assert_eq!(config.clamp_dt(f32::NAN), 0.0);
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(300), 18);
        assert_eq!(ms_to_ticks(250), 15);
        assert_eq!(ms_to_ticks(10), 1);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: SimConfig = ron::from_str("(gravity: 3.0)").expect("parse");
        assert_eq!(config.gravity, 3.0);
        assert_eq!(config.jump_force, -45.0);
    }
}
