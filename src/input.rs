//! Window-system independent input: events, key bindings, and toggles.

use std::collections::HashMap;

use crate::camera::Modifiers;
use crate::math::vec3::Vec3;

/// Input events after translation from the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// Window closed or Escape pressed.
    Quit,
    /// A typed character, after keyboard layout and shift are applied.
    Char(char),
    /// Left button pressed at `(x, y)` window pixels.
    MousePressed { x: f32, y: f32, modifiers: Modifiers },
    /// Pointer moved while the left button is held.
    MouseDragged { x: f32, y: f32 },
    Resized { width: u32, height: u32 },
}

/// Render state flags flipped by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleAction {
    Culling,
    Wireframe,
    Animation,
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Toggle(ToggleAction),
    NextProgram,
    PreviousProgram,
    NextMaterial,
    PreviousMaterial,
    NextLight,
    PreviousLight,
    /// Move the selected light by one nudge step along this unit direction.
    NudgeLight(Vec3),
    Quit,
}

/// On/off state per [`ToggleAction`]. Everything starts off.
#[derive(Debug, Clone, Default)]
pub struct Toggles {
    states: HashMap<ToggleAction, bool>,
}

impl Toggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self, action: ToggleAction) -> bool {
        self.states.get(&action).copied().unwrap_or(false)
    }

    /// Flips `action` and returns its new state.
    pub fn toggle(&mut self, action: ToggleAction) -> bool {
        let state = self.states.entry(action).or_insert(false);
        *state = !*state;
        *state
    }
}

/// Character to action table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<char, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use InputAction::*;

        let map = HashMap::from([
            ('c', Toggle(ToggleAction::Culling)),
            ('z', Toggle(ToggleAction::Wireframe)),
            (' ', Toggle(ToggleAction::Animation)),
            ('s', NextProgram),
            ('S', PreviousProgram),
            ('m', NextMaterial),
            ('M', PreviousMaterial),
            ('l', NextLight),
            ('L', PreviousLight),
            ('x', NudgeLight(-Vec3::X)),
            ('X', NudgeLight(Vec3::X)),
            ('y', NudgeLight(-Vec3::Y)),
            ('Y', NudgeLight(Vec3::Y)),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: char) -> Option<InputAction> {
        self.map.get(&key).copied()
    }

    /// Binds `key`, replacing any previous binding.
    pub fn bind(&mut self, key: char, action: InputAction) {
        self.map.insert(key, action);
    }
}
