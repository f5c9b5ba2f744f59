//! Event bus connecting the simulation to audio, subtitles and the HUD.
//!
//! The core never plays sounds or draws text itself. It publishes
//! [`GameEvent`]s, and whatever hosts the simulation drains them once per frame.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use quest_common::EntityId;

use crate::config::SimConfig;
use crate::enemy::EnemyKind;
use crate::pickup::PickupKind;
use crate::projectile::ProjectileKind;

/// Mixer channel a cue plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioChannel {
    /// Sound effects
    Sfx,
    /// Background music and jingles
    Music,
    /// Spoken lines
    Voice,
}

impl AudioChannel {
    /// Configured volume for this channel.
    #[must_use]
    pub fn volume(self, config: &SimConfig) -> f32 {
        match self {
            Self::Sfx => config.sfx_volume,
            Self::Music => config.music_volume,
            Self::Voice => config.voice_volume,
        }
    }
}

/// Every sound the simulation can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player leaves the ground
    Jump,
    /// An attack was blocked
    Block,
    /// Player sword swing
    Slash,
    /// Sword connects
    SwordHit,
    /// Fireball launched
    Fireball,
    /// Fireball connects
    FireballHit,
    /// Acid glob launched
    Acid,
    /// Acid glob connects
    AcidHit,
    /// Crossbow bolt fired
    CrossbowBolt,
    /// Evil magic launched
    EvilMagic,
    /// Coin collected
    Coin,
    /// Heart, key or Claire collected
    Pickup,
    /// Scroll collected
    MagicScroll,
    /// Barricade destroyed
    Broke,
    /// Generic enemy death
    EnemyDeath,
    /// Hound death
    HoundDead,
    /// Bandit lord takes a hit
    BanditLordHurt,
    /// Bandit lord dies
    BanditLordDead,
    /// Bandit lord laugh
    BanditLordCackle,
    /// Player is hurt
    QuinnHurt,
    /// Victory jingle
    Win,
    /// Defeat jingle
    Lose,
    /// Level background track (1-6)
    Background(u8),
    /// Voice: "Look! A fight!"
    QuinnBegin,
    /// Voice: "I'll get you, criminal!"
    QuinnCriminal,
    /// Voice: "You wont get away with this!"
    QuinnDefiant,
    /// Voice: "I'm coming, Claire!"
    QuinnComing,
    /// Voice: "I'll use my magic light."
    QuinnMagicLight,
    /// Voice: "I have to get down this scary road."
    QuinnScaryRoad,
    /// Voice: "This is where the bandits are hiding."
    QuinnHideout,
    /// Voice: "I'm here to rescue Claire!"
    QuinnRescue,
    /// Voice: "I'm not afraid of you!"
    QuinnZombie,
    /// Voice: "I won. Let's go home, Claire."
    QuinnWin,
    /// Voice: "Stand and deliver!"
    BanditLeader,
    /// Voice: "I won't let you rescue the princess!"
    BanditLordTaunt,
    /// Voice: "You'll never leave this cave!"
    ZombieLord,
}

impl SoundCue {
    /// Asset key of the cue.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jump => "jump",
            Self::Block => "block",
            Self::Slash => "slash-1",
            Self::SwordHit => "sword_hit",
            Self::Fireball => "fireball",
            Self::FireballHit => "fireball_hit",
            Self::Acid => "acid",
            Self::AcidHit => "acid_hit",
            Self::CrossbowBolt => "crossbow_bolt",
            Self::EvilMagic => "evil_magic",
            Self::Coin => "coin",
            Self::Pickup => "pickup",
            Self::MagicScroll => "magic_scroll",
            Self::Broke => "broke",
            Self::EnemyDeath => "enemy_death",
            Self::HoundDead => "hound_dead",
            Self::BanditLordHurt => "bandit_lord_hurt",
            Self::BanditLordDead => "bandit_lord_dead",
            Self::BanditLordCackle => "bandit_lord_cackle",
            Self::QuinnHurt => "quinn-hurt",
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Background(track) => match track {
                2 => "background2",
                3 => "background3",
                4 => "background4",
                5 => "background5",
                6 => "background6",
                _ => "background1",
            },
            Self::QuinnBegin => "quinn_begin",
            Self::QuinnCriminal => "quinn1",
            Self::QuinnDefiant => "quinn2",
            Self::QuinnComing => "quinn3",
            Self::QuinnMagicLight => "quinn4",
            Self::QuinnScaryRoad => "quinn5",
            Self::QuinnHideout => "quinn6",
            Self::QuinnRescue => "quinn_rescue",
            Self::QuinnZombie => "quinn_zombie",
            Self::QuinnWin => "quinn-win",
            Self::BanditLeader => "bandit_leader",
            Self::BanditLordTaunt => "bandit_lord_1",
            Self::ZombieLord => "zombie_lord",
        }
    }

    /// Mixer channel of the cue.
    #[must_use]
    pub fn channel(&self) -> AudioChannel {
        match self {
            Self::Win | Self::Lose | Self::Background(_) => AudioChannel::Music,
            Self::QuinnBegin
            | Self::QuinnCriminal
            | Self::QuinnDefiant
            | Self::QuinnComing
            | Self::QuinnMagicLight
            | Self::QuinnScaryRoad
            | Self::QuinnHideout
            | Self::QuinnRescue
            | Self::QuinnZombie
            | Self::QuinnWin
            | Self::QuinnHurt
            | Self::BanditLeader
            | Self::BanditLordTaunt
            | Self::ZombieLord => AudioChannel::Voice,
            _ => AudioChannel::Sfx,
        }
    }
}

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play a sound once
    Sound {
        /// Cue to play
        cue: SoundCue,
        /// Volume (0.0 - 1.0)
        volume: f32,
    },
    /// Stop a looping or long sound
    StopSound {
        /// Cue to stop
        cue: SoundCue,
    },
    /// Silence every playing sound
    StopAllSounds,
    /// Show a subtitle line
    Subtitle {
        /// Line text
        text: String,
        /// How long to show it, in ticks
        ticks: u64,
    },
    /// An enemy died
    EnemyKilled {
        /// Enemy ID
        enemy: EntityId,
        /// Enemy kind
        kind: EnemyKind,
    },
    /// A barricade was destroyed
    BarricadeBroken {
        /// Barricade ID
        enemy: EntityId,
    },
    /// The player lost health
    PlayerDamaged {
        /// Damage taken
        damage: i32,
        /// Health left
        health: i32,
    },
    /// The player died
    PlayerDied,
    /// An attack was blocked
    AttackBlocked {
        /// The defender that blocked
        defender: EntityId,
    },
    /// A projectile was launched
    ProjectileSpawned {
        /// Projectile ID
        projectile: EntityId,
        /// Projectile kind
        kind: ProjectileKind,
    },
    /// The player collected a pickup
    PickupCollected {
        /// Pickup kind
        kind: PickupKind,
    },
    /// A boss entered view and its intro started
    BossIntroStarted {
        /// Boss ID
        enemy: EntityId,
        /// Boss kind
        kind: EnemyKind,
    },
    /// A cutscene finished and combat resumed
    CutsceneEnded,
    /// The current level was completed
    LevelCompleted {
        /// Level number
        level: u32,
    },
    /// The final level was completed
    GameCompleted,
}

impl GameEvent {
    /// A sound event at the cue's channel volume.
    #[must_use]
    pub fn sound(cue: SoundCue, config: &SimConfig) -> Self {
        Self::Sound {
            cue,
            volume: cue.channel().volume(config),
        }
    }
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}

/// Typed event handler trait.
pub trait EventHandler {
    /// Handles an event.
    fn handle(&mut self, event: &GameEvent);
}
