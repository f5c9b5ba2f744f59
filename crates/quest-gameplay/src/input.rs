//! Input handling for player controls.
//!
//! The simulation never sees raw keyboard events. The host feeds key
//! transitions into an [`InputManager`], which maps them through rebindable
//! bindings and produces an [`InputState`] of held intents once per tick.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur in the input system.
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// Action not found in bindings
    #[error("action not bound: {0:?}")]
    ActionNotBound(Action),

    /// Key already bound to another action
    #[error("key {key:?} already bound to action: {action:?}")]
    KeyAlreadyBound {
        /// The key that's already bound
        key: KeyCode,
        /// The action it's bound to
        action: Action,
    },
}

/// Keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Space bar
    Space,
    /// Shift
    Shift,
    /// A key
    A,
    /// D key
    D,
    /// W key
    W,
    /// S key
    S,
    /// I key
    I,
    /// M key
    M,
    /// P key
    P,
    /// R key
    R,
    /// Escape
    Escape,
}

/// State of a button (pressed, just pressed, released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held down
    pub pressed: bool,
    /// Whether the button was just pressed this frame
    pub just_pressed: bool,
    /// Whether the button was just released this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Update the button state based on whether it's currently pressed.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }

    /// Clear the frame-specific state (just_pressed, just_released).
    pub fn clear_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Game actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk left
    MoveLeft,
    /// Walk right
    MoveRight,
    /// Jump
    Jump,
    /// Hold to block
    Block,
    /// Sword swing
    Attack,
    /// Fireball
    Cast,
    /// Toggle pause
    Pause,
    /// Toggle the invincibility cheat
    ToggleInvincible,
    /// Restart after game over
    Restart,
    /// Toggle audio mute
    Mute,
}

impl Action {
    /// Every bindable action.
    pub const ALL: [Action; 10] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Block,
        Action::Attack,
        Action::Cast,
        Action::Pause,
        Action::ToggleInvincible,
        Action::Restart,
        Action::Mute,
    ];
}

/// Held gameplay intents for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Walk left held
    pub move_left: bool,
    /// Walk right held
    pub move_right: bool,
    /// Jump held
    pub jump: bool,
    /// Block held
    pub block: bool,
    /// Attack held
    pub attack: bool,
    /// Cast held
    pub cast: bool,
}

impl InputState {
    /// Create an empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal intent: -1, 0 or 1. Left wins when both are held.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        if self.move_left {
            -1.0
        } else if self.move_right {
            1.0
        } else {
            0.0
        }
    }

    /// Builder: hold right.
    #[must_use]
    pub fn with_right(mut self) -> Self {
        self.move_right = true;
        self
    }

    /// Builder: hold left.
    #[must_use]
    pub fn with_left(mut self) -> Self {
        self.move_left = true;
        self
    }

    /// Builder: hold block.
    #[must_use]
    pub fn with_block(mut self) -> Self {
        self.block = true;
        self
    }

    /// Builder: hold attack.
    #[must_use]
    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    /// Builder: hold cast.
    #[must_use]
    pub fn with_cast(mut self) -> Self {
        self.cast = true;
        self
    }

    /// Builder: hold jump.
    #[must_use]
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

/// Key binding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key for this action
    pub primary: KeyCode,
    /// Optional secondary key
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    /// Create a new key binding with only a primary key.
    #[must_use]
    pub const fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Create a new key binding with primary and secondary keys.
    #[must_use]
    pub const fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Check if a key matches this binding.
    #[must_use]
    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

/// Maps raw key transitions to game actions.
#[derive(Debug)]
pub struct InputManager {
    /// Current key states
    key_states: HashMap<KeyCode, ButtonState>,
    /// Action to key bindings
    bindings: HashMap<Action, KeyBinding>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Create a new input manager with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self {
            key_states: HashMap::new(),
            bindings: HashMap::new(),
        };
        manager.set_default_bindings();
        manager
    }

    /// Arrow keys move, block and swing; space jumps; shift casts.
    pub fn set_default_bindings(&mut self) {
        self.bindings.clear();
        self.bindings.insert(
            Action::MoveLeft,
            KeyBinding::with_secondary(KeyCode::ArrowLeft, KeyCode::A),
        );
        self.bindings.insert(
            Action::MoveRight,
            KeyBinding::with_secondary(KeyCode::ArrowRight, KeyCode::D),
        );
        self.bindings.insert(
            Action::Block,
            KeyBinding::with_secondary(KeyCode::ArrowUp, KeyCode::W),
        );
        self.bindings.insert(
            Action::Attack,
            KeyBinding::with_secondary(KeyCode::ArrowDown, KeyCode::S),
        );
        self.bindings
            .insert(Action::Jump, KeyBinding::new(KeyCode::Space));
        self.bindings
            .insert(Action::Cast, KeyBinding::new(KeyCode::Shift));
        self.bindings
            .insert(Action::Pause, KeyBinding::new(KeyCode::P));
        self.bindings
            .insert(Action::ToggleInvincible, KeyBinding::new(KeyCode::I));
        self.bindings
            .insert(Action::Restart, KeyBinding::new(KeyCode::R));
        self.bindings
            .insert(Action::Mute, KeyBinding::new(KeyCode::M));
    }

    /// Bind an action, refusing keys already used by another action.
    pub fn bind(&mut self, action: Action, binding: KeyBinding) -> Result<(), InputError> {
        let keys = std::iter::once(binding.primary).chain(binding.secondary);
        for key in keys {
            if let Some(owner) = self.action_for_key(key) {
                if owner != action {
                    return Err(InputError::KeyAlreadyBound { key, action: owner });
                }
            }
        }
        self.bindings.insert(action, binding);
        Ok(())
    }

    /// Remove the binding for an action.
    pub fn unbind(&mut self, action: Action) -> Result<KeyBinding, InputError> {
        self.bindings
            .remove(&action)
            .ok_or(InputError::ActionNotBound(action))
    }

    /// Get the current binding for an action.
    #[must_use]
    pub fn get_binding(&self, action: Action) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Finds the action a key is bound to.
    #[must_use]
    pub fn action_for_key(&self, key: KeyCode) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.matches(key))
            .map(|(action, _)| *action)
    }

    /// Update a key state.
    pub fn update_key(&mut self, key: KeyCode, is_pressed: bool) {
        self.key_states.entry(key).or_default().update(is_pressed);
    }

    /// Presses or releases the primary key bound to `action`.
    ///
    /// Returns an error if the action has no binding.
    pub fn set_action(&mut self, action: Action, pressed: bool) -> Result<(), InputError> {
        let key = self
            .get_binding(action)
            .map(|binding| binding.primary)
            .ok_or(InputError::ActionNotBound(action))?;
        self.update_key(key, pressed);
        Ok(())
    }

    /// Whether any key bound to `action` is held.
    #[must_use]
    pub fn is_held(&self, action: Action) -> bool {
        self.keys_for(action)
            .any(|key| self.key_states.get(&key).is_some_and(|s| s.pressed))
    }

    /// Whether any key bound to `action` went down this frame.
    #[must_use]
    pub fn just_pressed(&self, action: Action) -> bool {
        self.keys_for(action)
            .any(|key| self.key_states.get(&key).is_some_and(|s| s.just_pressed))
    }

    fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .get(&action)
            .into_iter()
            .flat_map(|b| std::iter::once(b.primary).chain(b.secondary))
    }

    /// Snapshot of held gameplay intents.
    #[must_use]
    pub fn state(&self) -> InputState {
        InputState {
            move_left: self.is_held(Action::MoveLeft),
            move_right: self.is_held(Action::MoveRight),
            jump: self.is_held(Action::Jump),
            block: self.is_held(Action::Block),
            attack: self.is_held(Action::Attack),
            cast: self.is_held(Action::Cast),
        }
    }

    /// Clear per-frame edges. Call once after the tick consumed them.
    pub fn end_frame(&mut self) {
        for state in self.key_states.values_mut() {
            state.clear_frame();
        }
    }
}
