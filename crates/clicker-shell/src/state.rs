//! Process-wide interpreter state shared by every task.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::options::OptionTable;
use crate::slots::{HotkeyId, RegisterId, SlotTable};

/// Registers, hotkeys, options and counters.
///
/// Constructed once and handed to each task through the shell; there is no
/// global instance.
#[derive(Debug, Default)]
pub struct ShellState {
    registers: SlotTable<RegisterId>,
    hotkeys: SlotTable<HotkeyId>,
    options: OptionTable,
    clicks: AtomicU64,
    quit: AtomicBool,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registers(&self) -> &SlotTable<RegisterId> {
        &self.registers
    }

    pub fn hotkeys(&self) -> &SlotTable<HotkeyId> {
        &self.hotkeys
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// Count one click for the sampler.
    pub fn record_click(&self) {
        self.clicks.fetch_add(1, Ordering::Relaxed);
    }

    /// Clicks since the last call, resetting the counter.
    pub fn take_clicks(&self) -> u64 {
        self.clicks.swap(0, Ordering::Relaxed)
    }

    pub(crate) fn set_quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    /// Whether the quit verb has run.
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }
}
