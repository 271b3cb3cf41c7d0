//! Verb trait, registry, and the execution engine.
//!
//! Every line goes through [`tokenize`] and [`Shell::dispatch`]. Dispatch
//! looks the opcode up, checks the verb's arity, runs it, and turns the
//! outcome into console output. Failures stop at the verb: they become a
//! one-line diagnostic and never reach the caller.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clicker_platform::InputDevice;
use clicker_types::config::default_dotfile;
use clicker_types::error::{ClickerError, Result};
use parking_lot::Mutex;

use crate::state::ShellState;
use crate::tokenizer::{Command, tokenize};

/// Nested recalls allowed below one top-level command.
pub const MAX_RECALL_DEPTH: usize = 256;

/// Output produced by a verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Always printed.
    Text(String),
    /// Confirmation, suppressed when `quiet` is set.
    Notice(String),
    /// Nothing to print.
    None,
    /// Ask the shell to terminate.
    Quit,
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Line sink shared by every task.
pub trait Console: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes to the process's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct BufferConsole {
    lines: Mutex<Vec<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines equal to `line`.
    pub fn count(&self, line: &str) -> usize {
        self.lines.lock().iter().filter(|l| l.as_str() == line).count()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Console for BufferConsole {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

/// Accepted operand counts (opcode token excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    /// Inclusive on both ends.
    Range(usize, usize),
    OneOf(&'static [usize]),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exact(k) => n == k,
            Self::AtLeast(k) => n >= k,
            Self::Range(lo, hi) => (lo..=hi).contains(&n),
            Self::OneOf(counts) => counts.contains(&n),
        }
    }
}

/// A single verb.
pub trait Verb: Send + Sync {
    /// Opcode characters that select this verb.
    fn aliases(&self) -> &'static [char];

    /// Upper-case verb name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Usage string for `?` and arity diagnostics.
    fn usage(&self) -> &'static str;

    /// One-line description for `?`.
    fn description(&self) -> &'static str;

    fn arity(&self) -> Arity;

    /// Run the verb. The operand count has already been checked.
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Opcode table, fixed once the shell is built.
#[derive(Default)]
pub struct VerbRegistry {
    verbs: Vec<Box<dyn Verb>>,
    by_opcode: HashMap<char, usize>,
}

impl VerbRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a verb under each of its aliases, replacing earlier owners.
    pub fn register(&mut self, verb: Box<dyn Verb>) {
        let index = self.verbs.len();
        for &alias in verb.aliases() {
            self.by_opcode.insert(alias, index);
        }
        self.verbs.push(verb);
    }

    pub fn lookup(&self, opcode: char) -> Option<&dyn Verb> {
        self.by_opcode
            .get(&opcode)
            .map(|&index| self.verbs[index].as_ref())
    }

    /// Verbs in registration order.
    pub fn verbs(&self) -> impl Iterator<Item = &dyn Verb> {
        self.verbs.iter().map(|v| v.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// What a running verb can reach.
pub struct Environment<'a> {
    shell: &'a Shell,
    depth: usize,
}

impl<'a> Environment<'a> {
    pub fn shell(&self) -> &'a Shell {
        self.shell
    }

    pub fn state(&self) -> &'a ShellState {
        self.shell.state()
    }

    pub fn device(&self) -> &'a dyn InputDevice {
        self.shell.device()
    }

    /// Print a confirmation unless `quiet` is set.
    pub fn notice(&self, text: &str) {
        self.shell.notice(text);
    }

    /// Tokenize stored command text and execute it one level deeper.
    pub fn recall(&self, text: &str) -> Result<()> {
        self.check_depth()?;
        let cmd = tokenize(text)?;
        self.shell.dispatch(&cmd, self.depth + 1);
        Ok(())
    }

    fn check_depth(&self) -> Result<()> {
        if self.depth >= MAX_RECALL_DEPTH {
            return Err(ClickerError::RecallDepth(MAX_RECALL_DEPTH));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

type QuitHook = Box<dyn Fn() + Send + Sync>;

struct ShellInner {
    registry: VerbRegistry,
    state: ShellState,
    device: Arc<dyn InputDevice>,
    console: Arc<dyn Console>,
    dotfile: PathBuf,
    on_quit: Option<QuitHook>,
}

/// Handle to the interpreter, cheap to clone into background tasks.
#[derive(Clone)]
pub struct Shell {
    inner: Arc<ShellInner>,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("state", &self.inner.state)
            .field("dotfile", &self.inner.dotfile)
            .finish_non_exhaustive()
    }
}

impl Shell {
    pub fn builder(device: Arc<dyn InputDevice>) -> ShellBuilder {
        ShellBuilder::new(device)
    }

    pub fn state(&self) -> &ShellState {
        &self.inner.state
    }

    pub fn device(&self) -> &dyn InputDevice {
        self.inner.device.as_ref()
    }

    pub fn registry(&self) -> &VerbRegistry {
        &self.inner.registry
    }

    /// Default file for save and load.
    pub fn dotfile(&self) -> &Path {
        &self.inner.dotfile
    }

    pub fn quit_requested(&self) -> bool {
        self.inner.state.quit_requested()
    }

    /// Tokenize and execute one input line at top level.
    pub fn execute_line(&self, line: &str) {
        match tokenize(line) {
            Ok(cmd) => self.execute(&cmd),
            Err(e) => self.report(Err(e)),
        }
    }

    /// Execute a parsed command at top level.
    pub fn execute(&self, cmd: &Command) {
        self.dispatch(cmd, 0);
    }

    /// Execute `cmd` at recall depth `depth`, reporting its outcome.
    ///
    /// Unknown opcodes are ignored.
    pub fn dispatch(&self, cmd: &Command, depth: usize) {
        let Some(verb) = self.inner.registry.lookup(cmd.opcode()) else {
            log::trace!("ignoring unknown opcode {:?}", cmd.opcode());
            return;
        };
        let result = if verb.arity().accepts(cmd.operands().len()) {
            let mut env = Environment { shell: self, depth };
            verb.execute(cmd, &mut env)
        } else {
            Err(ClickerError::Arity {
                verb: verb.name(),
                usage: verb.usage(),
            })
        };
        if let Err(e) = &result {
            log::debug!("{} failed at depth {depth}: {e}", verb.name());
        }
        self.report(result);
    }

    fn report(&self, result: Result<CommandOutput>) {
        match result {
            Ok(CommandOutput::Text(text)) => self.inner.console.write_line(&text),
            Ok(CommandOutput::Notice(text)) => self.notice(&text),
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Quit) => self.quit(),
            Err(e) => self.notice(&e.to_string()),
        }
    }

    fn notice(&self, text: &str) {
        if !self.inner.state.options().quiet() {
            self.inner.console.write_line(text);
        }
    }

    fn quit(&self) {
        log::info!("quit requested");
        self.inner.state.set_quit();
        if let Some(hook) = &self.inner.on_quit {
            hook();
        }
    }
}

/// Builder for [`Shell`].
pub struct ShellBuilder {
    device: Arc<dyn InputDevice>,
    console: Arc<dyn Console>,
    dotfile: Option<PathBuf>,
    on_quit: Option<QuitHook>,
    options: Vec<(String, String)>,
}

impl ShellBuilder {
    pub fn new(device: Arc<dyn InputDevice>) -> Self {
        Self {
            device,
            console: Arc::new(StdoutConsole),
            dotfile: None,
            on_quit: None,
            options: Vec::new(),
        }
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    /// Default file for save and load (`~/.clickerrc` otherwise).
    pub fn dotfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotfile = Some(path.into());
        self
    }

    /// Called after the quit flag is set.
    pub fn on_quit(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_quit = Some(Box::new(hook));
        self
    }

    /// Start with `key` set to `value` instead of its default.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Fails on an unknown option key.
    pub fn build(self) -> Result<Shell> {
        let state = ShellState::new();
        for (key, value) in self.options {
            state.options().set(&key, value)?;
        }
        let mut registry = VerbRegistry::new();
        crate::commands::register_builtins(&mut registry);

        Ok(Shell {
            inner: Arc::new(ShellInner {
                registry,
                state,
                device: self.device,
                console: self.console,
                dotfile: self.dotfile.unwrap_or_else(default_dotfile),
                on_quit: self.on_quit,
            }),
        })
    }
}

/// Remove the `leader` prompt from the front of an input line.
pub fn strip_leader<'a>(line: &'a str, leader: &str) -> &'a str {
    if leader.is_empty() {
        line
    } else {
        line.strip_prefix(leader).unwrap_or(line)
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use std::time::{Duration, Instant};

    use clicker_platform::VirtualDevice;

    use super::*;

    /// A shell over a fresh virtual device, writing into a buffer.
    pub(crate) fn test_shell() -> (Shell, Arc<VirtualDevice>, Arc<BufferConsole>) {
        let device = Arc::new(VirtualDevice::default());
        let console = Arc::new(BufferConsole::new());
        let shell = Shell::builder(Arc::clone(&device) as _)
            .console(Arc::clone(&console) as _)
            .dotfile(std::env::temp_dir().join("clicker-test-unused-dotfile"))
            .build()
            .unwrap();
        (shell, device, console)
    }

    /// Poll `cond` until it holds or five seconds pass.
    pub(crate) fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        cond()
    }
}
