//! Tick-based queue for scripted narrative actions.
//!
//! Boss intros, level openings and victory sequences are timed voice lines and
//! state changes. They are queued here with a tick deadline and the level
//! generation that scheduled them, and the simulation drains due actions at
//! the start of every tick. Actions from an earlier generation are dropped,
//! so a restart can never be disturbed by the previous attempt's script.

use serde::{Deserialize, Serialize};
use tracing::debug;

use quest_common::Generation;

use crate::config::ms_to_ticks;
use crate::events::SoundCue;

/// A deferred action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Play a cue
    PlaySound(SoundCue),
    /// Stop a cue
    StopSound(SoundCue),
    /// Show a subtitle
    Subtitle {
        /// Line text
        text: String,
        /// Display time in ticks
        ticks: u64,
    },
    /// Release the cutscene lock
    EndCutscene,
    /// Finish the current level
    CompleteLevel,
    /// Finish the game
    CompleteGame,
}

impl ScheduledAction {
    /// Subtitle shown for `ms` milliseconds.
    #[must_use]
    pub fn subtitle(text: impl Into<String>, ms: u32) -> Self {
        Self::Subtitle {
            text: text.into(),
            ticks: ms_to_ticks(ms),
        }
    }
}

/// A queued action with its deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEntry {
    /// Tick at which the action fires
    pub due: u64,
    /// Generation that scheduled it
    pub generation: Generation,
    /// Insertion order, breaks ties between equal deadlines
    pub seq: u64,
    /// The action
    pub action: ScheduledAction,
}

/// Ordered queue of deferred actions.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<ScheduledEntry>,
    generation: Generation,
    next_seq: u64,
}

impl Scheduler {
    /// Creates an empty scheduler at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Starts a new generation and forgets everything queued so far.
    pub fn advance_generation(&mut self) -> Generation {
        self.entries.clear();
        self.generation = self.generation.next();
        self.generation
    }

    /// Queue `action` to fire `delay` ticks after `now`.
    pub fn schedule(&mut self, now: u64, delay: u64, action: ScheduledAction) {
        self.schedule_stamped(now.saturating_add(delay), self.generation, action);
    }

    /// Queue `action` to fire `ms` milliseconds after `now`.
    pub fn schedule_ms(&mut self, now: u64, ms: u32, action: ScheduledAction) {
        self.schedule(now, ms_to_ticks(ms), action);
    }

    /// Queue an action at an absolute tick under an explicit generation.
    pub fn schedule_stamped(&mut self, due: u64, generation: Generation, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let entry = ScheduledEntry {
            due,
            generation,
            seq,
            action,
        };
        let index = self
            .entries
            .partition_point(|e| (e.due, e.seq) <= (entry.due, entry.seq));
        self.entries.insert(index, entry);
    }

    /// Removes and returns every current-generation action due at or before `now`.
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledAction> {
        let split = self.entries.partition_point(|e| e.due <= now);
        let due: Vec<ScheduledEntry> = self.entries.drain(..split).collect();
        let current = self.generation;
        due.into_iter()
            .filter_map(|entry| {
                if entry.generation == current {
                    Some(entry.action)
                } else {
                    debug!(
                        "Discarding stale {:?} from generation {}",
                        entry.action,
                        entry.generation.raw()
                    );
                    None
                }
            })
            .collect()
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deadline of the next queued action.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due)
    }
}
