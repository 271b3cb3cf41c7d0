//! Long-running background tasks and the detached-thread helper.

use std::sync::Arc;
use std::time::Duration;

use clicker_platform::KeySource;
use clicker_types::error::Result;

use crate::interpreter::Shell;
use crate::options::{ENABLE_CPS_REGISTER, ENABLE_HOTKEY};
use crate::slots::{HotkeyId, RegisterId, SlotKey};
use crate::tokenizer::tokenize;

/// Default wait for a key press while hotkeys are enabled.
pub const DEFAULT_HOTKEY_POLL: Duration = Duration::from_millis(50);
/// Default sleep while hotkeys are disabled.
pub const DEFAULT_HOTKEY_IDLE: Duration = Duration::from_millis(100);
/// Default sampler period.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Start `f` on a named OS thread that nobody joins.
pub fn spawn_detached<F>(name: &str, f: F) -> Result<()>
where
    F: FnOnce() + Send + 'static,
{
    log::debug!("spawning task {name}");
    std::thread::Builder::new().name(name.to_string()).spawn(f)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Hotkey listener
// ---------------------------------------------------------------------------

/// Fires bound hotkeys as key presses arrive.
pub struct HotkeyListener {
    shell: Shell,
    keys: Arc<dyn KeySource>,
    poll: Duration,
    idle: Duration,
}

impl HotkeyListener {
    pub fn new(shell: Shell, keys: Arc<dyn KeySource>) -> Self {
        Self {
            shell,
            keys,
            poll: DEFAULT_HOTKEY_POLL,
            idle: DEFAULT_HOTKEY_IDLE,
        }
    }

    pub fn with_intervals(mut self, poll: Duration, idle: Duration) -> Self {
        self.poll = poll;
        self.idle = idle;
        self
    }

    /// Wait once for a key press and run its binding.
    ///
    /// Returns the trigger that fired, if any.
    pub fn step(&self) -> Option<char> {
        let state = self.shell.state();
        if !state.options().is_true(ENABLE_HOTKEY) {
            std::thread::sleep(self.idle);
            return None;
        }
        let press = self.keys.next_key(self.poll)?;
        let key = press.normalized();
        let text = state.hotkeys().get(HotkeyId::from_char(key)?)?;

        log::debug!("hotkey {key:?} fired: {text}");
        match tokenize(&text) {
            Ok(cmd) => self.shell.dispatch(&cmd, 1),
            Err(e) => log::debug!("hotkey {key:?}: {e}"),
        }
        Some(key)
    }

    /// Step until quit.
    pub fn run(self) {
        while !self.shell.quit_requested() {
            self.step();
        }
        log::debug!("hotkey listener stopped");
    }

    pub fn spawn(self) -> Result<()> {
        spawn_detached("hotkey-listener", move || self.run())
    }
}

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

/// Publishes clicks per period into register `C`.
pub struct Sampler {
    shell: Shell,
    interval: Duration,
}

impl Sampler {
    pub fn new(shell: Shell) -> Self {
        Self {
            shell,
            interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Take one sample, returning the click count.
    pub fn step(&self) -> u64 {
        let state = self.shell.state();
        let clicks = state.take_clicks();
        if state.options().is_true(ENABLE_CPS_REGISTER) {
            state.registers().set(RegisterId::CPS, clicks.to_string());
        }
        log::trace!("sampled {clicks} clicks");
        clicks
    }

    pub fn run(self) {
        loop {
            std::thread::sleep(self.interval);
            if self.shell.quit_requested() {
                break;
            }
            self.step();
        }
        log::debug!("sampler stopped");
    }

    pub fn spawn(self) -> Result<()> {
        spawn_detached("sampler", move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use clicker_platform::VirtualDevice;
    use clicker_types::input::{DeviceEvent, KeyPress};

    use super::*;
    use crate::interpreter::testing::{test_shell, wait_until};

    fn listener(shell: &Shell, device: &Arc<VirtualDevice>) -> HotkeyListener {
        HotkeyListener::new(shell.clone(), Arc::clone(device) as _)
            .with_intervals(Duration::from_millis(10), Duration::from_millis(1))
    }

    #[test]
    fn bound_key_fires() {
        let (shell, device, _) = test_shell();
        shell.execute_line("& k K z");
        let listener = listener(&shell, &device);

        device.inject_key(KeyPress::plain('k'));
        assert_eq!(listener.step(), Some('k'));
        assert_eq!(
            device.events(),
            [DeviceEvent::KeyDown('z'), DeviceEvent::KeyUp('z')]
        );
    }

    #[test]
    fn shift_is_normalized() {
        let (shell, device, _) = test_shell();
        shell.execute_line("& K K u");
        shell.execute_line("& ! K b");
        let listener = listener(&shell, &device);

        device.inject_key(KeyPress::shifted('k'));
        assert_eq!(listener.step(), Some('K'));
        device.inject_key(KeyPress::shifted('1'));
        assert_eq!(listener.step(), Some('!'));
        device.inject_key(KeyPress::plain('k'));
        assert_eq!(listener.step(), None);
    }

    #[test]
    fn unbound_and_out_of_range_keys_are_ignored() {
        let (shell, device, _) = test_shell();
        let listener = listener(&shell, &device);
        device.inject_key(KeyPress::plain('q'));
        assert_eq!(listener.step(), None);
        device.inject_key(KeyPress::plain('\t'));
        assert_eq!(listener.step(), None);
        assert_eq!(listener.step(), None);
        assert!(device.events().is_empty());
    }

    #[test]
    fn disabled_listener_leaves_keys_queued() {
        let (shell, device, _) = test_shell();
        shell.execute_line("& k K z");
        shell.execute_line("! enable_hotkey false");
        let listener = listener(&shell, &device);

        device.inject_key(KeyPress::plain('k'));
        assert_eq!(listener.step(), None);
        shell.execute_line("! enable_hotkey true");
        assert_eq!(listener.step(), Some('k'));
    }

    #[test]
    fn spawned_listener_reacts_to_injected_keys() {
        let (shell, device, _) = test_shell();
        shell.execute_line("& x @ r hit");
        listener(&shell, &device).spawn().unwrap();

        device.inject_key(KeyPress::plain('x'));
        let r = RegisterId::from_char('r').unwrap();
        assert!(wait_until(|| shell.state().registers().get(r).is_some()));
        shell.state().set_quit();
    }

    #[test]
    fn sampler_publishes_only_when_enabled() {
        let (shell, _, _) = test_shell();
        let sampler = Sampler::new(shell.clone());
        shell.execute_line("C 0");
        assert_eq!(sampler.step(), 1);
        assert_eq!(shell.state().registers().get(RegisterId::CPS), None);

        shell.execute_line("! enable_cps_register true");
        shell.execute_line("C 0");
        shell.execute_line("C 1");
        assert_eq!(sampler.step(), 2);
        assert_eq!(
            shell.state().registers().get(RegisterId::CPS).as_deref(),
            Some("2")
        );
        assert_eq!(sampler.step(), 0);
        assert_eq!(
            shell.state().registers().get(RegisterId::CPS).as_deref(),
            Some("0")
        );
    }

    #[test]
    fn spawned_sampler_ticks() {
        let (shell, _, _) = test_shell();
        shell.execute_line("! enable_cps_register true");
        shell.execute_line("C 0");
        Sampler::new(shell.clone())
            .with_interval(Duration::from_millis(10))
            .spawn()
            .unwrap();
        assert!(wait_until(|| {
            shell.state().registers().get(RegisterId::CPS).is_some()
        }));
        shell.state().set_quit();
    }

    #[test]
    fn spawn_detached_runs_closure() {
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_detached("test", move || tx.send(7).unwrap()).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(7));
    }
}
