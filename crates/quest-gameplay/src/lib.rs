//! # Quest Gameplay
//!
//! Combat and enemy-AI simulation for Quinn's Quest.
//!
//! This crate owns the whole fixed-step game loop:
//! - Player controller with melee, blocking and fireball casting
//! - Enemy roster and per-kind behavior (melee, ranged casts, barricades)
//! - Strike resolution shared by every attacker and defender
//! - Projectiles, loot drops and level-exit triggers
//! - Deferred narrative actions (voice lines, subtitles, boss intros)
//! - Built-in campaign levels and RON level files
//! - Event bus the presentation layer drains each frame

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ai;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod input;
pub mod level;
pub mod loot;
pub mod particles;
pub mod physics;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod schedule;
pub mod simulation;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ai::*;
    pub use crate::combat::*;
    pub use crate::config::*;
    pub use crate::enemy::*;
    pub use crate::entity::*;
    pub use crate::events::*;
    pub use crate::input::*;
    pub use crate::level::*;
    pub use crate::loot::*;
    pub use crate::particles::*;
    pub use crate::physics::*;
    pub use crate::pickup::*;
    pub use crate::player::*;
    pub use crate::projectile::*;
    pub use crate::rng::*;
    pub use crate::schedule::*;
    pub use crate::simulation::*;
    pub use crate::world::*;
}

pub use prelude::*;
