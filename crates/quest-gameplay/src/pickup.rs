//! Pickups and level-end trophies.

use serde::{Deserialize, Serialize};

use quest_common::{intersects, Bounded, EntityId, Rect};

/// Collectible item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Currency
    Coin,
    /// Restores one health
    Heart,
    /// Bandit leader's scroll, ends the level
    Scroll,
    /// Zombie lord's key, ends the level
    Key,
    /// The rescued princess, ends the game
    Claire,
}

impl PickupKind {
    /// Whether collecting this pickup ends the level.
    #[must_use]
    pub fn completes_level(&self) -> bool {
        matches!(self, Self::Scroll | Self::Key | Self::Claire)
    }
}

/// A collectible lying in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Entity ID
    pub id: EntityId,
    /// Item type
    pub kind: PickupKind,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
    /// Tick it appeared on
    pub spawn_frame: u64,
    /// Frames left before it vanishes, `None` if it never expires
    pub life: Option<u32>,
}

impl Pickup {
    /// Creates a pickup.
    #[must_use]
    pub fn new(kind: PickupKind, rect: Rect, spawn_frame: u64) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            spawn_frame,
            life: None,
        }
    }

    /// Builder: expire after `frames` ticks.
    #[must_use]
    pub fn with_life(mut self, frames: u32) -> Self {
        self.life = Some(frames);
        self
    }

    /// Counts down the lifetime. Returns false once the pickup has expired.
    pub fn tick_life(&mut self) -> bool {
        match self.life.as_mut() {
            Some(life) => {
                *life = life.saturating_sub(1);
                *life > 0
            },
            None => true,
        }
    }
}

impl Bounded for Pickup {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Level-exit landmark type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrophyKind {
    /// Town gate, reached on any overlap
    Gate,
    /// Cave mouth, reached on any overlap
    Cave,
    /// Second town gate, reached once the player is two thirds inside
    Gate2,
}

/// A level exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trophy {
    /// Landmark type
    pub kind: TrophyKind,
    /// Area that triggers the exit
    pub rect: Rect,
}

impl Trophy {
    /// Whether `player` has reached the exit.
    #[must_use]
    pub fn is_reached(&self, player: &Rect) -> bool {
        match self.kind {
            TrophyKind::Gate | TrophyKind::Cave => intersects(player, &self.rect, 0.0),
            TrophyKind::Gate2 => {
                player.right() > self.rect.x + self.rect.width * (2.0 / 3.0)
                    && player.x < self.rect.right()
                    && player.overlaps_vertically(&self.rect)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_countdown() {
        let mut coin = Pickup::new(PickupKind::Coin, Rect::new(0.0, 0.0, 25.0, 25.0), 0)
            .with_life(2);
        assert!(coin.tick_life());
        assert!(!coin.tick_life());
    }

    #[test]
    fn test_life_of_one_expires_on_first_tick() {
        let mut coin = Pickup::new(PickupKind::Coin, Rect::new(0.0, 0.0, 25.0, 25.0), 0)
            .with_life(1);
        assert!(!coin.tick_life());
    }

    #[test]
    fn test_static_pickup_never_expires() {
        let mut heart = Pickup::new(PickupKind::Heart, Rect::new(0.0, 0.0, 48.0, 48.0), 0);
        for _ in 0..10_000 {
            assert!(heart.tick_life());
        }
    }

    #[test]
    fn test_gate_reached_on_overlap() {
        let gate = Trophy {
            kind: TrophyKind::Gate,
            rect: Rect::new(4630.0, 140.0, 400.0, 580.0),
        };
        assert!(!gate.is_reached(&Rect::new(4400.0, 407.0, 128.0, 128.0)));
        assert!(gate.is_reached(&Rect::new(4600.0, 407.0, 128.0, 128.0)));
    }

    #[test]
    fn test_gate2_needs_two_thirds() {
        let gate = Trophy {
            kind: TrophyKind::Gate2,
            rect: Rect::new(6930.0, 140.0, 600.0, 580.0),
        };
        // right edge at 7258, threshold is 7330
        assert!(!gate.is_reached(&Rect::new(7130.0, 407.0, 128.0, 128.0)));
        assert!(gate.is_reached(&Rect::new(7250.0, 407.0, 128.0, 128.0)));
    }

    #[test]
    fn test_completing_kinds() {
        assert!(PickupKind::Key.completes_level());
        assert!(!PickupKind::Heart.completes_level());
    }
}
