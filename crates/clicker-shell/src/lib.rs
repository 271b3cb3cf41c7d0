//! Macro shell: single-character verbs over registers, hotkeys and a
//! simulated input device.
//!
//! A line is tokenized into a [`Command`], its opcode selects a [`Verb`] in
//! the [`VerbRegistry`], and the [`Shell`] runs it. Verbs can store command
//! text in registers and hotkeys, recall it (recursively), or hand it to
//! background loops. All tasks share one [`ShellState`].

mod commands;
mod device_commands;
pub mod interpolate;
mod interpreter;
mod loop_commands;
pub mod options;
pub mod persist;
mod register_commands;
pub mod slots;
mod state;
pub mod tasks;
pub mod tokenizer;

/// Register every built-in verb into a registry.
pub use commands::register_builtins;
/// Register pointer and keyboard verbs.
pub use device_commands::register_device_commands;
/// Console sinks, verb plumbing and the shell itself.
pub use interpreter::{
    Arity, BufferConsole, CommandOutput, Console, Environment, MAX_RECALL_DEPTH, Shell,
    ShellBuilder, StdoutConsole, Verb, VerbRegistry, strip_leader,
};
/// Register repeat and while.
pub use loop_commands::register_loop_commands;
/// Register bind, record, clone and the recall verbs.
pub use register_commands::register_register_commands;
/// Registers, hotkeys, options and counters shared by every task.
pub use state::ShellState;
pub use tasks::{HotkeyListener, Sampler};
pub use tokenizer::{Command, tokenize};
