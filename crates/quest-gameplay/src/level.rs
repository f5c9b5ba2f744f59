//! Level definitions.
//!
//! A level is plain data: its width, the player's walking speed, the enemy
//! spawn list, the exit landmark and the opening narration. Levels can be
//! loaded from RON or built in code; the six campaign levels are built in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quest_common::{QuestError, Rect};

use crate::config::SimConfig;
use crate::enemy::{Enemy, EnemyKind};
use crate::events::SoundCue;
use crate::pickup::{Pickup, PickupKind, Trophy, TrophyKind};

/// Number of built-in campaign levels.
pub const BUILTIN_LEVELS: u32 = 6;

/// Level loading errors.
#[derive(Debug, Error)]
pub enum LevelError {
    /// No level with this number exists
    #[error("Unknown level: {0}")]
    UnknownLevel(u32),

    /// RON syntax or schema error
    #[error("Failed to parse level: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Parsed but unusable level
    #[error("Invalid level: {0}")]
    Invalid(String),
}

impl From<LevelError> for QuestError {
    fn from(err: LevelError) -> Self {
        QuestError::Level(err.to_string())
    }
}

/// One enemy placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    /// Enemy kind
    pub kind: EnemyKind,
    /// Left edge
    pub x: f32,
    /// Top edge, placed on the road when absent
    #[serde(default)]
    pub y: Option<f32>,
}

impl SpawnSpec {
    /// A road-level spawn.
    #[must_use]
    pub fn at(kind: EnemyKind, x: f32) -> Self {
        Self { kind, x, y: None }
    }
}

/// Exit landmark placed against the right wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrophySpec {
    /// Landmark type
    pub kind: TrophyKind,
    /// Landmark width
    pub width: f32,
    /// How far the landmark pokes past the right wall
    pub inset: f32,
}

/// A pickup present from the start of the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedPickup {
    /// Item type
    pub kind: PickupKind,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width and height
    pub size: f32,
}

/// A voice line with its subtitle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceLine {
    /// Voice cue
    pub cue: SoundCue,
    /// Subtitle text
    pub text: String,
}

/// A sound played at a fixed time after the level starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedCue {
    /// Delay in milliseconds
    pub at_ms: u32,
    /// Cue to play
    pub cue: SoundCue,
}

/// Complete description of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level number, starting at 1
    pub number: u32,
    /// Chapter title
    pub name: String,
    /// World width
    pub width: f32,
    /// Player walking speed
    pub player_speed: f32,
    /// Background track, defaults to the level number
    #[serde(default)]
    pub music: Option<u8>,
    /// Opening narration
    #[serde(default)]
    pub opening: Option<VoiceLine>,
    /// Extra timed sounds
    #[serde(default)]
    pub cues: Vec<TimedCue>,
    /// Enemy roster
    pub spawns: Vec<SpawnSpec>,
    /// Exit landmark, if the level ends by walking out
    #[serde(default)]
    pub trophy: Option<TrophySpec>,
    /// Pickups present from the start
    #[serde(default)]
    pub pickups: Vec<PlacedPickup>,
}

impl LevelConfig {
    /// Parses and validates a level from RON.
    pub fn from_ron_str(source: &str) -> Result<Self, LevelError> {
        let level: Self = ron::from_str(source)?;
        level.validate()?;
        Ok(level)
    }

    /// Checks that the level can be played.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.number == 0 {
            return Err(LevelError::Invalid("level numbers start at 1".into()));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(LevelError::Invalid(format!(
                "level {} has width {}",
                self.number, self.width
            )));
        }
        if !self.player_speed.is_finite() || self.player_speed <= 0.0 {
            return Err(LevelError::Invalid(format!(
                "level {} has player speed {}",
                self.number, self.player_speed
            )));
        }
        if let Some(spawn) = self
            .spawns
            .iter()
            .find(|s| !s.x.is_finite() || s.x < 0.0 || s.x > self.width)
        {
            return Err(LevelError::Invalid(format!(
                "{} at x={} is outside level {}",
                spawn.kind.name(),
                spawn.x,
                self.number
            )));
        }
        Ok(())
    }

    /// Background track number.
    #[must_use]
    pub fn music_track(&self) -> u8 {
        self.music
            .unwrap_or_else(|| u8::try_from(self.number).unwrap_or(1))
    }

    /// Builds the enemy roster.
    #[must_use]
    pub fn spawn_enemies(&self, config: &SimConfig) -> Vec<Enemy> {
        self.spawns
            .iter()
            .map(|s| Enemy::spawn(s.kind, s.x, s.y, config))
            .collect()
    }

    /// Builds the exit landmarks.
    #[must_use]
    pub fn trophies(&self, config: &SimConfig) -> Vec<Trophy> {
        self.trophy
            .iter()
            .map(|spec| {
                let height = config.ground_line();
                Trophy {
                    kind: spec.kind,
                    rect: Rect::new(
                        self.width - spec.width + spec.inset,
                        config.viewport_height - height,
                        spec.width,
                        height,
                    ),
                }
            })
            .collect()
    }

    /// Builds the pickups present at the start.
    #[must_use]
    pub fn placed_pickups(&self, frame: u64) -> Vec<Pickup> {
        self.pickups
            .iter()
            .map(|p| Pickup::new(p.kind, Rect::new(p.x, p.y, p.size, p.size), frame))
            .collect()
    }

    /// One of the built-in campaign levels.
    pub fn builtin(number: u32) -> Result<Self, LevelError> {
        let level = match number {
            1 => goblin_attack(),
            2 => village_raid(),
            3 => into_the_wilds(),
            4 => zombie_cave(),
            5 => return_road(),
            6 => bandit_fortress(),
            _ => return Err(LevelError::UnknownLevel(number)),
        };
        Ok(level)
    }
}

// ============================================================================
// Campaign
// ============================================================================

fn level(number: u32, name: &str, width: f32, player_speed: f32) -> LevelConfig {
    LevelConfig {
        number,
        name: name.to_string(),
        width,
        player_speed,
        music: None,
        opening: None,
        cues: Vec::new(),
        spawns: Vec::new(),
        trophy: None,
        pickups: Vec::new(),
    }
}

fn opening(cue: SoundCue, text: &str) -> Option<VoiceLine> {
    Some(VoiceLine {
        cue,
        text: text.to_string(),
    })
}

/// Even spacing of `count` spawns across `[start, end]`, floored like the
/// hand-tuned layouts.
fn spread(start: f32, end: f32, count: u32) -> impl Iterator<Item = (u32, f32)> {
    let spacing = if count > 1 {
        ((end - start) / (count - 1) as f32).floor()
    } else {
        0.0
    };
    (0..count).map(move |i| (i, start + i as f32 * spacing))
}

fn goblin_attack() -> LevelConfig {
    use EnemyKind::{Barricade, BigGoblin, Goblin};

    let mut level = level(1, "Goblin Attack", 5000.0, 18.0);
    level.opening = opening(SoundCue::QuinnBegin, "Look! A fight!");
    level.trophy = Some(TrophySpec {
        kind: TrophyKind::Gate,
        width: 400.0,
        inset: 30.0,
    });
    let layout: [(EnemyKind, f32); 26] = [
        (Goblin, 900.0),
        (Goblin, 950.0),
        (Goblin, 1000.0),
        (Barricade, 1100.0),
        (BigGoblin, 1150.0),
        (BigGoblin, 1200.0),
        (Barricade, 1400.0),
        (Goblin, 1550.0),
        (Goblin, 1700.0),
        (Goblin, 1850.0),
        (Barricade, 2000.0),
        (BigGoblin, 2150.0),
        (BigGoblin, 2300.0),
        (Goblin, 3000.0),
        (Goblin, 3150.0),
        (Goblin, 3300.0),
        (Barricade, 3500.0),
        (BigGoblin, 3700.0),
        (BigGoblin, 3900.0),
        (Barricade, 4100.0),
        (Goblin, 4150.0),
        (Goblin, 4250.0),
        (Goblin, 4350.0),
        (BigGoblin, 4500.0),
        (BigGoblin, 4700.0),
        (BigGoblin, 4750.0),
    ];
    level.spawns = layout
        .iter()
        .map(|&(kind, x)| SpawnSpec::at(kind, x))
        .collect();
    level
}

fn village_raid() -> LevelConfig {
    use EnemyKind::{Bandit, BanditCrossbow, BanditLeader, Barricade};

    let mut level = level(2, "Village Raid", 6000.0, 18.0);
    level.opening = opening(SoundCue::QuinnCriminal, "I'll get you, criminal!");
    let spawns = &mut level.spawns;
    spawns.push(SpawnSpec::at(Barricade, 850.0));
    spawns.push(SpawnSpec::at(BanditCrossbow, 950.0));
    spawns.push(SpawnSpec::at(Barricade, 1100.0));
    for (i, x) in spread(1400.0, 5400.0, 8) {
        spawns.push(SpawnSpec::at(Bandit, x));
        spawns.push(SpawnSpec::at(BanditCrossbow, x + 200.0));
        if i % 2 == 0 {
            spawns.push(SpawnSpec::at(Barricade, x + 100.0));
        }
    }
    spawns.push(SpawnSpec::at(BanditCrossbow, 5600.0));
    spawns.push(SpawnSpec::at(Bandit, 5700.0));
    spawns.push(SpawnSpec::at(BanditLeader, 5750.0));
    level
}

fn into_the_wilds() -> LevelConfig {
    use EnemyKind::{Bandit, BanditCrossbow, Barricade, BigGoblin, Goblin, Necromancer, Zombie};

    let mut level = level(3, "Into the Wilds", 6500.0, 18.0);
    level.opening = opening(SoundCue::QuinnComing, "I'm coming, Claire!");
    level.trophy = Some(TrophySpec {
        kind: TrophyKind::Cave,
        width: 750.0,
        inset: 40.0,
    });
    let spawns = &mut level.spawns;
    spawns.push(SpawnSpec::at(Barricade, 850.0));
    spawns.push(SpawnSpec::at(Barricade, 1100.0));
    for (i, x) in spread(1300.0, 1800.0, 5) {
        spawns.push(SpawnSpec::at(Goblin, x));
        if i % 2 == 1 {
            spawns.push(SpawnSpec::at(BigGoblin, x + 50.0));
        }
    }
    for (i, x) in spread(2000.0, 3300.0, 8) {
        spawns.push(SpawnSpec::at(Bandit, x));
        spawns.push(SpawnSpec::at(BanditCrossbow, x + 100.0));
        if i % 2 == 0 {
            spawns.push(SpawnSpec::at(Barricade, x + 50.0));
        }
    }
    for (_, x) in spread(3600.0, 4000.0, 5) {
        spawns.push(SpawnSpec::at(Zombie, x));
    }
    spawns.push(SpawnSpec::at(Necromancer, 5000.0));
    spawns.push(SpawnSpec::at(Necromancer, 5050.0));
    level
}

fn zombie_cave() -> LevelConfig {
    use EnemyKind::{Barricade, Necromancer, Zombie, ZombieLord};

    let mut level = level(4, "Zombie Cave", 7000.0, 20.0);
    level.opening = opening(SoundCue::QuinnMagicLight, "I'll use my magic light.");
    let spawns = &mut level.spawns;
    spawns.push(SpawnSpec::at(Barricade, 600.0));
    spawns.push(SpawnSpec::at(Barricade, 900.0));
    for (i, x) in spread(1000.0, 6000.0, 12) {
        spawns.push(SpawnSpec::at(Zombie, x));
        if i % 3 == 0 {
            spawns.push(SpawnSpec::at(Barricade, x + 50.0));
        }
    }
    for (_, x) in spread(2000.0, 5500.0, 7) {
        spawns.push(SpawnSpec::at(Necromancer, x));
    }
    let lair = 6300.0;
    spawns.push(SpawnSpec::at(Necromancer, lair - 120.0));
    spawns.push(SpawnSpec::at(Necromancer, lair + 120.0));
    spawns.push(SpawnSpec::at(ZombieLord, lair));

    let heart_y = SimConfig::default().ground_line() - 80.0;
    for fraction in [0.25, 0.75] {
        level.pickups.push(PlacedPickup {
            kind: PickupKind::Heart,
            x: level.width * fraction,
            y: heart_y,
            size: 48.0,
        });
    }
    level
}

fn return_road() -> LevelConfig {
    use EnemyKind::{Bandit, BanditCrossbow, Barricade, Goblin};

    let mut level = level(5, "Return Road", 7500.0, 21.0);
    level.opening = opening(
        SoundCue::QuinnScaryRoad,
        "I have to get down this scary road.",
    );
    level.trophy = Some(TrophySpec {
        kind: TrophyKind::Gate2,
        width: 600.0,
        inset: 30.0,
    });
    let spawns = &mut level.spawns;
    spawns.push(SpawnSpec::at(Barricade, 900.0));
    spawns.push(SpawnSpec::at(Barricade, 1300.0));
    for (i, x) in spread(1500.0, 3500.0, 8) {
        spawns.push(SpawnSpec::at(Goblin, x));
        if i % 3 == 0 {
            spawns.push(SpawnSpec::at(Barricade, x + 50.0));
        }
    }
    for (i, x) in spread(4000.0, 7000.0, 8) {
        spawns.push(SpawnSpec::at(Bandit, x));
        spawns.push(SpawnSpec::at(BanditCrossbow, x + 80.0));
        if i % 2 == 0 {
            spawns.push(SpawnSpec::at(Barricade, x + 40.0));
        }
    }
    level
}

fn bandit_fortress() -> LevelConfig {
    use EnemyKind::{
        Bandit, BanditCrossbow, BanditLord, Barricade, BigGoblin, Goblin, Hound, Necromancer,
        Zombie,
    };

    let mut level = level(6, "Bandit Fortress", 8000.0, 21.0);
    level.opening = opening(
        SoundCue::QuinnHideout,
        "This is where the bandits are hiding.",
    );
    level.cues.push(TimedCue {
        at_ms: 2200,
        cue: SoundCue::BanditLordCackle,
    });

    let rotation = [Goblin, BigGoblin, Bandit, BanditCrossbow, Zombie, Necromancer];
    let cycles = 8;
    let slots = cycles * rotation.len() as u32;
    let spacing = ((7600.0 - 900.0) / (slots - 1) as f32).floor();
    let mut x = 900.0;
    let spawns = &mut level.spawns;
    for cycle in 0..cycles {
        for kind in rotation {
            spawns.push(SpawnSpec::at(kind, x));
            x += spacing;
        }
        if cycle % 2 == 1 {
            spawns.push(SpawnSpec::at(Barricade, x));
            x += spacing;
        }
    }

    let hound_x = (level.width * 0.66).floor().min(level.width - 220.0);
    spawns.push(SpawnSpec::at(Hound, hound_x));
    let (lord_width, _) = BanditLord.size();
    spawns.push(SpawnSpec::at(BanditLord, level.width - lord_width - 32.0));
    level
}
