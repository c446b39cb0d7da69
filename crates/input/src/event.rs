use winit::keyboard::KeyCode;

/// An event the window layer delivers to the gallery state.
///
/// The desktop loop translates winit callbacks into these; the gallery state never sees raw
/// window events. Headless drivers (tests, the CLI) produce the same events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A physical key changed state.
    Key { code: KeyCode, pressed: bool },
    /// Raw relative mouse motion, in pixels.
    PointerMotion { dx: f32, dy: f32 },
    /// The render surface was clicked; requests pointer capture.
    Click,
    /// The platform granted pointer capture.
    CaptureGranted,
    /// The platform refused pointer capture.
    CaptureDenied,
    /// Capture ended (Escape, focus loss, or programmatic release).
    CaptureReleased,
    /// The window lost keyboard focus; pending key-ups will never arrive.
    FocusLost,
    /// The viewport changed size, in physical pixels.
    Resized { width: u32, height: u32 },
}

impl InputEvent {
    pub fn key_down(code: KeyCode) -> Self {
        Self::Key {
            code,
            pressed: true,
        }
    }

    pub fn key_up(code: KeyCode) -> Self {
        Self::Key {
            code,
            pressed: false,
        }
    }
}
