//! Saving and loading shell state.
//!
//! A state file is an ordinary script: `!` lines for options, then `@` lines
//! for registers and `&` lines for hotkeys, each in index order. Loading runs
//! the file through the interpreter line by line.

use std::fmt::Write as _;
use std::path::Path;

use clicker_types::error::{ClickerError, Result};

use crate::interpreter::Environment;
use crate::slots::SlotKey;
use crate::state::ShellState;
use crate::tokenizer::quote_token;

/// Render `state` as a script that recreates it.
pub fn encode(state: &ShellState) -> String {
    let mut out = String::new();
    for (key, value) in state.options().entries() {
        let _ = writeln!(out, "! {key} {}", quote_token(&value));
    }
    for (id, text) in state.registers().entries() {
        let _ = writeln!(out, "@ {} {text}", id.to_char());
    }
    for (id, text) in state.hotkeys().entries() {
        let trigger = id.to_char().to_string();
        let _ = writeln!(out, "& {} {text}", quote_token(&trigger));
    }
    out
}

/// Write the encoded state to `path`.
pub fn save(state: &ShellState, path: &Path) -> Result<()> {
    std::fs::write(path, encode(state)).map_err(|source| file_error(path, source))?;
    log::info!("saved state to {}", path.display());
    Ok(())
}

/// Execute every non-blank line of `path`, returning how many ran.
///
/// The file is read completely before anything executes.
pub fn load(env: &Environment<'_>, path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path).map_err(|source| file_error(path, source))?;
    log::info!("loading {}", path.display());
    let mut count = 0;
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        env.recall(line)?;
        count += 1;
    }
    Ok(count)
}

fn file_error(path: &Path, source: std::io::Error) -> ClickerError {
    ClickerError::File {
        path: path.display().to_string(),
        source,
    }
}
