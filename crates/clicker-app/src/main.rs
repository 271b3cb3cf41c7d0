//! clicker entry point.
//!
//! Reads commands from stdin, one per line, and runs them against a simulated
//! input device. The optional first argument (or `CLICKER_CONFIG`) names a
//! TOML startup config. Logging goes to stderr; set `RUST_LOG` for more.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use clicker_platform::VirtualDevice;
use clicker_shell::tokenizer::join_tokens;
use clicker_shell::{HotkeyListener, Sampler, Shell, strip_leader};
use clicker_types::config::ClickerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CLICKER_CONFIG").ok())
        .map(PathBuf::from);
    let config = ClickerConfig::load(config_path.as_deref())?;

    let device = Arc::new(VirtualDevice::default());
    let mut builder = Shell::builder(Arc::clone(&device) as _)
        .dotfile(config.dotfile_path())
        .on_quit(|| std::process::exit(0));
    for (key, value) in &config.options {
        builder = builder.option(key, value);
    }
    let shell = builder.build()?;
    log::info!("Starting clicker (dotfile {})", shell.dotfile().display());

    if config.autoload && shell.dotfile().exists() {
        let dotfile = shell.dotfile().display().to_string();
        shell.execute_line(&join_tokens(&["<", dotfile.as_str()]));
    }

    HotkeyListener::new(shell.clone(), device)
        .with_intervals(config.hotkey_poll(), config.hotkey_idle())
        .spawn()?;
    Sampler::new(shell.clone())
        .with_interval(config.sample_interval())
        .spawn()?;

    let stdin = std::io::stdin();
    run_repl(&shell, stdin.lock(), std::io::stdout());
    Ok(())
}

/// Prompt with the leader, read a line, run it; stop at end of input.
fn run_repl(shell: &Shell, input: impl BufRead, mut prompt: impl Write) {
    let mut lines = input.lines();
    loop {
        let leader = shell.state().options().leader();
        let _ = write!(prompt, "{leader}");
        let _ = prompt.flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                log::warn!("stdin: {e}");
                break;
            },
            None => break,
        };
        let line = line.trim_end_matches('\r');
        // The leader may have changed while the line was being typed.
        let leader = shell.state().options().leader();
        shell.execute_line(strip_leader(line, &leader));
        if shell.quit_requested() {
            break;
        }
    }
}
