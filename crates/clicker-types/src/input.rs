//! Input values exchanged with the device boundary.
//!
//! Device implementations map their native input to these types. The shell
//! never sees raw platform input.

use crate::error::{ClickerError, Result};

/// Pointer buttons addressable by index 0, 1, 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a button index to a button. Only 0, 1 and 2 are valid.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Middle),
            _ => None,
        }
    }

    /// Parse a button argument as typed at the prompt.
    pub fn parse(arg: &str) -> Result<Self> {
        arg.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_index)
            .ok_or_else(|| {
                ClickerError::InvalidArgument(format!("button must be 0, 1 or 2, got '{arg}'"))
            })
    }
}

/// A raw key press observed at the device boundary.
///
/// `key` is the unshifted identity of the physical key (what the key cap
/// produces without modifiers); `shift` reports whether shift was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub shift: bool,
}

impl KeyPress {
    /// A press without shift.
    pub fn plain(key: char) -> Self {
        Self { key, shift: false }
    }

    /// A press with shift held.
    pub fn shifted(key: char) -> Self {
        Self { key, shift: true }
    }

    /// The character this press produces on a US layout.
    pub fn normalized(self) -> char {
        if self.shift {
            shifted_char(self.key)
        } else {
            self.key
        }
    }
}

/// US-layout shift mapping. Characters without a shifted form map to
/// themselves.
pub fn shifted_char(key: char) -> char {
    match key {
        'a'..='z' => key.to_ascii_uppercase(),
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        '`' => '~',
        other => other,
    }
}

/// An action synthesized by a device, as recorded by simulated devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    KeyDown(char),
    KeyUp(char),
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    CursorMove { x: i32, y: i32 },
}
