//! Device service traits.

use std::time::Duration;

use clicker_types::error::Result;
use clicker_types::input::{KeyPress, MouseButton};

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Abstraction over keyboard and pointer synthesis.
///
/// Shared by every shell task, so all methods take `&self`; implementations
/// provide their own interior synchronization.
pub trait InputDevice: Send + Sync {
    /// Press (and hold) the key producing `key`.
    fn press_key(&self, key: char) -> Result<()>;

    /// Release the key producing `key`.
    fn release_key(&self, key: char) -> Result<()>;

    /// Press (and hold) a pointer button.
    fn press_button(&self, button: MouseButton) -> Result<()>;

    /// Release a pointer button.
    fn release_button(&self, button: MouseButton) -> Result<()>;

    /// Move the cursor to absolute screen coordinates.
    fn move_cursor(&self, x: i32, y: i32) -> Result<()>;

    /// Current cursor position.
    fn query_cursor(&self) -> Result<(i32, i32)>;

    /// Press then release a key.
    fn tap_key(&self, key: char) -> Result<()> {
        self.press_key(key)?;
        self.release_key(key)
    }

    /// Press then release a pointer button.
    fn click(&self, button: MouseButton) -> Result<()> {
        self.press_button(button)?;
        self.release_button(button)
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Source of physical key presses for the hotkey listener.
pub trait KeySource: Send + Sync {
    /// Wait up to `timeout` for the next key press.
    fn next_key(&self, timeout: Duration) -> Option<KeyPress>;
}
