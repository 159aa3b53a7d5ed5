//! Keyboard state. Movement keys are level-triggered flags read once per
//! frame; debug keys fire a one-shot action on key-down.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugAction {
    Heal,
    Damage,
    /// Fast-forward the storm's current phase.
    SkipStorm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Move(Key),
    Debug(DebugAction),
}

/// Maps a `KeyboardEvent.key` value onto a binding (case-insensitive).
pub fn bind(key: &str) -> Option<Binding> {
    let binding = match key.to_ascii_lowercase().as_str() {
        "w" | "arrowup" => Binding::Move(Key::Up),
        "s" | "arrowdown" => Binding::Move(Key::Down),
        "a" | "arrowleft" => Binding::Move(Key::Left),
        "d" | "arrowright" => Binding::Move(Key::Right),
        "n" => Binding::Debug(DebugAction::Heal),
        "m" => Binding::Debug(DebugAction::Damage),
        "b" => Binding::Debug(DebugAction::SkipStorm),
        _ => return None,
    };
    Some(binding)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Left => self.left,
            Key::Right => self.right,
        }
    }

    /// Records a key-down; returns the debug action it triggers, if any.
    pub fn key_down(&mut self, key: &str) -> Option<DebugAction> {
        match bind(key)? {
            Binding::Move(k) => {
                self.set(k, true);
                None
            }
            Binding::Debug(action) => Some(action),
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(Binding::Move(k)) = bind(key) {
            self.set(k, false);
        }
    }

    /// Releases everything, e.g. when the page loses focus mid-press.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Unit (or zero) movement vector for the held keys. Opposite keys cancel;
    /// diagonals are normalized so they are not faster than straight moves.
    pub fn direction(&self) -> (f64, f64) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f64;
        let dx = axis(self.left, self.right);
        let dy = axis(self.up, self.down);
        if dx != 0.0 && dy != 0.0 {
            let len = (dx * dx + dy * dy).sqrt();
            (dx / len, dy / len)
        } else {
            (dx, dy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_case_insensitive() {
        assert_eq!(bind("W"), Some(Binding::Move(Key::Up)));
        assert_eq!(bind("ArrowLeft"), Some(Binding::Move(Key::Left)));
        assert_eq!(bind("B"), Some(Binding::Debug(DebugAction::SkipStorm)));
        assert_eq!(bind("Shift"), None);
        assert_eq!(bind("q"), None);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::new();
        input.key_down("a");
        input.key_down("d");
        assert_eq!(input.direction(), (0.0, 0.0));
        input.key_down("w");
        assert_eq!(input.direction(), (0.0, -1.0));
    }

    #[test]
    fn diagonal_is_unit_length() {
        let mut input = InputState::new();
        input.key_down("s");
        input.key_down("d");
        let (dx, dy) = input.direction();
        assert!((dx * dx + dy * dy - 1.0).abs() < 1e-12);
        assert!(dx > 0.0 && dy > 0.0);
    }

    #[test]
    fn key_up_releases_and_debug_keys_do_not_latch() {
        let mut input = InputState::new();
        assert_eq!(input.key_down("m"), Some(DebugAction::Damage));
        assert_eq!(input, InputState::default());
        input.key_down("d");
        assert!(input.is_held(Key::Right));
        input.key_up("D");
        assert!(!input.is_held(Key::Right));
        input.key_down("w");
        input.clear();
        assert_eq!(input.direction(), (0.0, 0.0));
    }
}
