//! Cosmetic particle bursts.
//!
//! Particles never affect gameplay. They draw from their own RNG so that a
//! burst of sparks cannot shift the sequence of gameplay rolls.

use serde::{Deserialize, Serialize};

/// Particles emitted per burst.
pub const BURST_SIZE: usize = 12;

/// Visual style of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Blue sparks from a block
    Block,
    /// Red sparks from a hit
    Hit,
    /// Dust from a death
    Dead,
    /// Dust from landing
    Land,
}

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Style
    pub kind: ParticleKind,
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Horizontal drift
    pub vx: f32,
    /// Vertical drift
    pub vy: f32,
    /// Frames left
    pub life: u32,
}

/// Pool of live particles with a hard cap.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
    rng: fastrand::Rng,
}

impl ParticleSystem {
    /// Creates an empty pool.
    #[must_use]
    pub fn new(cap: usize, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            cap,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Emits a burst of [`BURST_SIZE`] particles around `(x, y)`.
    pub fn burst(&mut self, kind: ParticleKind, x: f32, y: f32) {
        self.burst_n(kind, x, y, BURST_SIZE);
    }

    /// Emits `count` particles around `(x, y)`, evicting the oldest past the cap.
    pub fn burst_n(&mut self, kind: ParticleKind, x: f32, y: f32, count: usize) {
        let origin_y = y + 20.0 + self.rng.f32() * 6.0 - 3.0;
        for _ in 0..count {
            let dir = if self.rng.bool() { -1.0 } else { 1.0 };
            self.particles.push(Particle {
                kind,
                x: x + self.rng.f32() * 20.0 - 10.0,
                y: origin_y,
                vx: dir * (0.5 + self.rng.f32() * 1.5),
                vy: 1.0 + self.rng.f32() * 1.5,
                life: self.rng.u32(30..50),
            });
        }
        if self.particles.len() > self.cap {
            let excess = self.particles.len() - self.cap;
            self.particles.drain(..excess);
        }
    }

    /// Drifts every particle and drops the expired ones.
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.life = p.life.saturating_sub(1);
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.particles.retain(|p| p.life > 0);
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
