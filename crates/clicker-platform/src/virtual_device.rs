//! Simulated keyboard/pointer device.
//!
//! Tracks cursor position and held keys/buttons, records every synthesized
//! action, and serves injected key presses to the hotkey listener.

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use clicker_types::error::{ClickerError, Result};
use clicker_types::input::{DeviceEvent, KeyPress, MouseButton};
use parking_lot::{Condvar, Mutex};

use crate::services::{InputDevice, KeySource};

/// Oldest events are dropped past this many.
const MAX_EVENT_LOG: usize = 4096;
/// Oldest unread key presses are dropped past this many.
const MAX_PENDING_KEYS: usize = 256;

#[derive(Debug)]
struct DeviceState {
    cursor: (i32, i32),
    held_keys: BTreeSet<char>,
    held_buttons: Vec<MouseButton>,
    events: VecDeque<DeviceEvent>,
}

impl DeviceState {
    fn record(&mut self, event: DeviceEvent) {
        log::debug!("device: {event:?}");
        if self.events.len() == MAX_EVENT_LOG {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// A simulated device with a fixed screen size.
#[derive(Debug)]
pub struct VirtualDevice {
    width: i32,
    height: i32,
    state: Mutex<DeviceState>,
    pending_keys: Mutex<VecDeque<KeyPress>>,
    key_ready: Condvar,
}

impl VirtualDevice {
    /// Create a device whose cursor is confined to `width` x `height`.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            state: Mutex::new(DeviceState {
                cursor: (0, 0),
                held_keys: BTreeSet::new(),
                held_buttons: Vec::new(),
                events: VecDeque::new(),
            }),
            pending_keys: Mutex::new(VecDeque::new()),
            key_ready: Condvar::new(),
        }
    }

    /// Feed a physical key press to whoever is listening.
    pub fn inject_key(&self, press: KeyPress) {
        let mut queue = self.pending_keys.lock();
        if queue.len() == MAX_PENDING_KEYS {
            queue.pop_front();
        }
        queue.push_back(press);
        drop(queue);
        self.key_ready.notify_one();
    }

    /// Snapshot of recorded events, oldest first.
    pub fn events(&self) -> Vec<DeviceEvent> {
        self.state.lock().events.iter().copied().collect()
    }

    /// Drain recorded events.
    pub fn take_events(&self) -> Vec<DeviceEvent> {
        self.state.lock().events.drain(..).collect()
    }

    /// Keys currently held down.
    pub fn held_keys(&self) -> Vec<char> {
        self.state.lock().held_keys.iter().copied().collect()
    }

    /// Buttons currently held down.
    pub fn held_buttons(&self) -> Vec<MouseButton> {
        self.state.lock().held_buttons.clone()
    }

    fn check_key(key: char) -> Result<()> {
        if key.is_ascii() && !key.is_ascii_control() {
            Ok(())
        } else {
            Err(ClickerError::Device(format!("no key produces {key:?}")))
        }
    }
}

impl Default for VirtualDevice {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl InputDevice for VirtualDevice {
    fn press_key(&self, key: char) -> Result<()> {
        Self::check_key(key)?;
        let mut state = self.state.lock();
        state.held_keys.insert(key);
        state.record(DeviceEvent::KeyDown(key));
        Ok(())
    }

    fn release_key(&self, key: char) -> Result<()> {
        Self::check_key(key)?;
        let mut state = self.state.lock();
        state.held_keys.remove(&key);
        state.record(DeviceEvent::KeyUp(key));
        Ok(())
    }

    fn press_button(&self, button: MouseButton) -> Result<()> {
        let mut state = self.state.lock();
        if !state.held_buttons.contains(&button) {
            state.held_buttons.push(button);
        }
        state.record(DeviceEvent::ButtonDown(button));
        Ok(())
    }

    fn release_button(&self, button: MouseButton) -> Result<()> {
        let mut state = self.state.lock();
        state.held_buttons.retain(|b| *b != button);
        state.record(DeviceEvent::ButtonUp(button));
        Ok(())
    }

    fn move_cursor(&self, x: i32, y: i32) -> Result<()> {
        let x = x.clamp(0, self.width - 1);
        let y = y.clamp(0, self.height - 1);
        let mut state = self.state.lock();
        state.cursor = (x, y);
        state.record(DeviceEvent::CursorMove { x, y });
        Ok(())
    }

    fn query_cursor(&self) -> Result<(i32, i32)> {
        Ok(self.state.lock().cursor)
    }
}

impl KeySource for VirtualDevice {
    fn next_key(&self, timeout: Duration) -> Option<KeyPress> {
        let mut queue = self.pending_keys.lock();
        if queue.is_empty() {
            let _ = self.key_ready.wait_for(&mut queue, timeout);
        }
        queue.pop_front()
    }
}
