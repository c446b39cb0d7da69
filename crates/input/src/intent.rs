use winit::keyboard::KeyCode;

/// A named movement intent a key can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Back,
    Left,
    Right,
    Sprint,
}

impl Intent {
    /// Physical key mapping: W/S/A/D and either Shift. Layout-independent.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Back),
            KeyCode::KeyA => Some(Self::Left),
            KeyCode::KeyD => Some(Self::Right),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Self::Sprint),
            _ => None,
        }
    }

    /// The key that drives this intent. Sprint reports the left shift.
    pub fn key(self) -> KeyCode {
        match self {
            Self::Forward => KeyCode::KeyW,
            Self::Back => KeyCode::KeyS,
            Self::Left => KeyCode::KeyA,
            Self::Right => KeyCode::KeyD,
            Self::Sprint => KeyCode::ShiftLeft,
        }
    }

    /// Parse a key or intent name, case-insensitively: `w`, `forward`, `shift`, `sprint`, ...
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "w" | "forward" => Some(Self::Forward),
            "s" | "back" | "backward" => Some(Self::Back),
            "a" | "left" => Some(Self::Left),
            "d" | "right" => Some(Self::Right),
            "shift" | "sprint" => Some(Self::Sprint),
            _ => None,
        }
    }
}

/// Snapshot of the five held intents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

impl Intents {
    /// True when no intent is held.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    fn slot(&mut self, intent: Intent) -> &mut bool {
        match intent {
            Intent::Forward => &mut self.forward,
            Intent::Back => &mut self.back,
            Intent::Left => &mut self.left,
            Intent::Right => &mut self.right,
            Intent::Sprint => &mut self.sprint,
        }
    }
}

/// Tracks key presses and releases into an [`Intents`] snapshot.
///
/// Both shift keys share the sprint slot: releasing either one clears it.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    intents: Intents,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key event. Returns the intent it touched, if the key is mapped.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> Option<Intent> {
        let intent = Intent::from_key(key)?;
        let slot = self.intents.slot(intent);
        if *slot != pressed {
            tracing::trace!(?intent, pressed, "intent changed");
        }
        *slot = pressed;
        Some(intent)
    }

    /// Read-only snapshot of the current intents.
    pub fn snapshot(&self) -> Intents {
        self.intents
    }

    /// Release every intent, e.g. when the window loses focus and key-ups will never arrive.
    pub fn clear(&mut self) {
        self.intents = Intents::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_shift_map_to_intents() {
        let mut t = InputTracker::new();
        t.handle_key(KeyCode::KeyW, true);
        t.handle_key(KeyCode::KeyA, true);
        t.handle_key(KeyCode::ShiftRight, true);
        let s = t.snapshot();
        assert!(s.forward && s.left && s.sprint);
        assert!(!s.back && !s.right);
    }

    #[test]
    fn release_clears_intent() {
        let mut t = InputTracker::new();
        t.handle_key(KeyCode::KeyD, true);
        t.handle_key(KeyCode::KeyD, false);
        assert!(t.snapshot().is_idle());
    }

    #[test]
    fn repeated_presses_keep_intent_until_release() {
        let mut t = InputTracker::new();
        for _ in 0..5 {
            t.handle_key(KeyCode::KeyS, true);
        }
        assert!(t.snapshot().back);
        t.handle_key(KeyCode::KeyS, false);
        assert!(!t.snapshot().back);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut t = InputTracker::new();
        assert_eq!(t.handle_key(KeyCode::KeyQ, true), None);
        assert_eq!(t.handle_key(KeyCode::Space, true), None);
        assert!(t.snapshot().is_idle());
    }

    #[test]
    fn either_shift_drives_sprint() {
        let mut t = InputTracker::new();
        assert_eq!(t.handle_key(KeyCode::ShiftLeft, true), Some(Intent::Sprint));
        t.handle_key(KeyCode::ShiftLeft, false);
        t.handle_key(KeyCode::ShiftRight, true);
        assert!(t.snapshot().sprint);
    }

    #[test]
    fn clear_releases_everything() {
        let mut t = InputTracker::new();
        t.handle_key(KeyCode::KeyW, true);
        t.handle_key(KeyCode::ShiftLeft, true);
        t.clear();
        assert!(t.snapshot().is_idle());
    }

    #[test]
    fn names_parse_to_intents_and_back_to_keys() {
        assert_eq!(Intent::from_name("W"), Some(Intent::Forward));
        assert_eq!(Intent::from_name(" sprint "), Some(Intent::Sprint));
        assert_eq!(Intent::from_name("jump"), None);
        for intent in [
            Intent::Forward,
            Intent::Back,
            Intent::Left,
            Intent::Right,
            Intent::Sprint,
        ] {
            assert_eq!(Intent::from_key(intent.key()), Some(intent));
        }
    }
}
