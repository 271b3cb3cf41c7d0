//! Built-in verbs: help, options, persistence, print, quit.

use std::path::PathBuf;

use clicker_types::error::{ClickerError, Result};

use crate::interpolate::interpolate;
use crate::interpreter::{Arity, CommandOutput, Environment, Verb, VerbRegistry};
use crate::persist;
use crate::tokenizer::Command;

/// Register every verb, in help-listing order.
pub fn register_builtins(reg: &mut VerbRegistry) {
    reg.register(Box::new(HelpCmd));
    crate::register_commands::register_register_commands(reg);
    crate::loop_commands::register_loop_commands(reg);
    reg.register(Box::new(OptionCmd));
    reg.register(Box::new(SaveCmd));
    reg.register(Box::new(LoadCmd));
    crate::device_commands::register_device_commands(reg);
    reg.register(Box::new(PrintCmd));
    reg.register(Box::new(QuitCmd));
}

// ---------------------------------------------------------------------------
// ?
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Verb for HelpCmd {
    fn aliases(&self) -> &'static [char] {
        &['?']
    }
    fn name(&self) -> &'static str {
        "HELP"
    }
    fn usage(&self) -> &'static str {
        "HELP"
    }
    fn description(&self) -> &'static str {
        "Shows helptext"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }
    fn execute(&self, _cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let lines: Vec<String> = env
            .shell()
            .registry()
            .verbs()
            .map(|verb| {
                let aliases: String = verb.aliases().iter().collect();
                format!("{aliases} - {} - {}", verb.usage(), verb.description())
            })
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// !
// ---------------------------------------------------------------------------

struct OptionCmd;
impl Verb for OptionCmd {
    fn aliases(&self) -> &'static [char] {
        &['!']
    }
    fn name(&self) -> &'static str {
        "OPT"
    }
    fn usage(&self) -> &'static str {
        "OPT [option] [value]"
    }
    fn description(&self) -> &'static str {
        "Lists, prints or sets options"
    }
    fn arity(&self) -> Arity {
        Arity::Range(0, 2)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let options = env.state().options();
        match cmd.operands() {
            [] => {
                let lines: Vec<String> = options
                    .entries()
                    .into_iter()
                    .map(|(key, value)| format!("{key} = {value}"))
                    .collect();
                Ok(CommandOutput::Text(lines.join("\n")))
            },
            [key] => {
                let value = options
                    .get(key)
                    .ok_or_else(|| ClickerError::UnknownOption(key.clone()))?;
                Ok(CommandOutput::Text(format!("{key} = {value}")))
            },
            [key, value, ..] => {
                options.set(key, value.as_str())?;
                Ok(CommandOutput::Notice(format!("Option {key} set to {value}")))
            },
        }
    }
}

// ---------------------------------------------------------------------------
// > and <
// ---------------------------------------------------------------------------

struct SaveCmd;
impl Verb for SaveCmd {
    fn aliases(&self) -> &'static [char] {
        &['>']
    }
    fn name(&self) -> &'static str {
        "SAVE"
    }
    fn usage(&self) -> &'static str {
        "SAVE [file]"
    }
    fn description(&self) -> &'static str {
        "Saves options, registers and hotkeys to a file, ~/.clickerrc by default"
    }
    fn arity(&self) -> Arity {
        Arity::Range(0, 1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path: PathBuf = match cmd.operand(0) {
            Some(file) => file.into(),
            None => env.shell().dotfile().to_path_buf(),
        };
        persist::save(env.state(), &path)?;
        Ok(CommandOutput::Notice(format!("Saved state to {}", path.display())))
    }
}

struct LoadCmd;
impl Verb for LoadCmd {
    fn aliases(&self) -> &'static [char] {
        &['<']
    }
    fn name(&self) -> &'static str {
        "LOAD"
    }
    fn usage(&self) -> &'static str {
        "LOAD [file]"
    }
    fn description(&self) -> &'static str {
        "Runs every command in a file, ~/.clickerrc by default"
    }
    fn arity(&self) -> Arity {
        Arity::Range(0, 1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path: PathBuf = match cmd.operand(0) {
            Some(file) => file.into(),
            None => env.shell().dotfile().to_path_buf(),
        };
        let count = persist::load(env, &path)?;
        Ok(CommandOutput::Notice(format!(
            "Loaded {count} commands from {}",
            path.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// P
// ---------------------------------------------------------------------------

struct PrintCmd;
impl Verb for PrintCmd {
    fn aliases(&self) -> &'static [char] {
        &['P']
    }
    fn name(&self) -> &'static str {
        "PRINT"
    }
    fn usage(&self) -> &'static str {
        "PRINT <text> [text] ..."
    }
    fn description(&self) -> &'static str {
        "Prints text, expanding @<register> references"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let registers = env.state().registers();
        let joined = cmd.operands().join(" ");
        let text = interpolate(joined.trim(), |id| registers.get(id));
        Ok(CommandOutput::Text(text))
    }
}

// ---------------------------------------------------------------------------
// Q
// ---------------------------------------------------------------------------

struct QuitCmd;
impl Verb for QuitCmd {
    fn aliases(&self) -> &'static [char] {
        &['Q']
    }
    fn name(&self) -> &'static str {
        "QUIT"
    }
    fn usage(&self) -> &'static str {
        "QUIT"
    }
    fn description(&self) -> &'static str {
        "Quits the program"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }
    fn execute(&self, _cmd: &Command, _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Quit)
    }
}
