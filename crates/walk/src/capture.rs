/// Hint shown while the pointer is free.
pub const HINT_UNLOCKED: &str = "Click to enter • WASD move • Mouse look • Shift sprint • Esc exit";
/// Hint shown while the pointer is captured.
pub const HINT_LOCKED: &str = "WASD move • Mouse look • Shift sprint • Esc exit";

/// Pointer capture lifecycle.
///
/// A request is asynchronous: it moves to `Pending` and only becomes `Locked` when the
/// platform grants it. A denied request falls back to `Unlocked` and is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Unlocked,
    Pending,
    Locked,
}

/// Out-of-band notifications, used to update the hint text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureNotice {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PointerCapture {
    state: CaptureState,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == CaptureState::Locked
    }

    /// Ask for capture. Returns true when the caller should forward the request to the platform.
    pub fn request(&mut self) -> bool {
        if self.state != CaptureState::Unlocked {
            return false;
        }
        self.state = CaptureState::Pending;
        true
    }

    /// The platform granted capture.
    pub fn grant(&mut self) -> Option<CaptureNotice> {
        if self.state == CaptureState::Locked {
            return None;
        }
        self.state = CaptureState::Locked;
        tracing::info!("pointer locked");
        Some(CaptureNotice::Locked)
    }

    /// The platform refused capture. The state settles back to unlocked without a notice.
    pub fn deny(&mut self) {
        if self.state == CaptureState::Pending {
            tracing::warn!("pointer capture denied");
            self.state = CaptureState::Unlocked;
        }
    }

    /// Capture ended: Escape, focus loss, or a programmatic release.
    pub fn release(&mut self) -> Option<CaptureNotice> {
        let was_locked = self.is_locked();
        self.state = CaptureState::Unlocked;
        if was_locked {
            tracing::info!("pointer unlocked");
            Some(CaptureNotice::Unlocked)
        } else {
            None
        }
    }

    /// Hint text for the current state. Only a granted lock switches to the in-gallery hint.
    pub fn hint(&self) -> &'static str {
        if self.is_locked() {
            HINT_LOCKED
        } else {
            HINT_UNLOCKED
        }
    }
}
