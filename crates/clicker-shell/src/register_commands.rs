//! Register and hotkey verbs: bind, record, clone and the recall family.

use clicker_types::error::Result;

use crate::interpreter::{Arity, CommandOutput, Environment, Verb, VerbRegistry};
use crate::slots::{HotkeyId, RegisterId, SlotKey};
use crate::tokenizer::{Command, join_tokens};

/// Register `&`, `@`, `:`, `#`, `=`, `-` and `/`.
pub fn register_register_commands(reg: &mut VerbRegistry) {
    reg.register(Box::new(BindCmd));
    reg.register(Box::new(RecordCmd));
    reg.register(Box::new(CloneCmd));
    reg.register(Box::new(RecallCmd));
    reg.register(Box::new(RecallIfCmd));
    reg.register(Box::new(RecallIfNotCmd));
    reg.register(Box::new(RecallIfElseCmd));
}

/// Resolve every argument to a register before anything runs.
pub(crate) fn parse_registers(args: &[String]) -> Result<Vec<RegisterId>> {
    args.iter().map(|arg| RegisterId::parse(arg)).collect()
}

/// Recall `ids` in order, stopping at the first empty register.
///
/// Registers recalled before the failure keep their effects.
pub(crate) fn recall_registers(env: &Environment<'_>, ids: &[RegisterId]) -> Result<()> {
    for &id in ids {
        let text = env.state().registers().require(id)?;
        env.notice(&format!(
            "Recalling command in register '{}': {text}",
            id.to_char()
        ));
        env.recall(&text)?;
    }
    Ok(())
}

/// Does the condition register hold exactly `value`? Empty registers fail.
fn condition_holds(env: &Environment<'_>, register: &str, value: &str) -> Result<bool> {
    let id = RegisterId::parse(register)?;
    Ok(env.state().registers().require(id)? == value)
}

// ---------------------------------------------------------------------------
// & and @
// ---------------------------------------------------------------------------

struct BindCmd;
impl Verb for BindCmd {
    fn aliases(&self) -> &'static [char] {
        &['&']
    }
    fn name(&self) -> &'static str {
        "HOTKEY"
    }
    fn usage(&self) -> &'static str {
        "HOTKEY <key> <command> ..."
    }
    fn description(&self) -> &'static str {
        "Binds a command to a hotkey"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(2)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let key = HotkeyId::parse(&cmd.operands()[0])?;
        let text = join_tokens(&cmd.operands()[1..]);
        env.state().hotkeys().set(key, text.clone());
        Ok(CommandOutput::Notice(format!(
            "Hotkey '{}' set to command: {text}",
            key.to_char()
        )))
    }
}

struct RecordCmd;
impl Verb for RecordCmd {
    fn aliases(&self) -> &'static [char] {
        &['@']
    }
    fn name(&self) -> &'static str {
        "RECORD"
    }
    fn usage(&self) -> &'static str {
        "RECORD <register> <command> ..."
    }
    fn description(&self) -> &'static str {
        "Records a command to a register"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(2)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let id = RegisterId::parse(&cmd.operands()[0])?;
        let text = join_tokens(&cmd.operands()[1..]);
        env.state().registers().set(id, text.clone());
        Ok(CommandOutput::Notice(format!(
            "Recorded command in register '{}': {text}",
            id.to_char()
        )))
    }
}

// ---------------------------------------------------------------------------
// :
// ---------------------------------------------------------------------------

struct CloneCmd;
impl Verb for CloneCmd {
    fn aliases(&self) -> &'static [char] {
        &[':']
    }
    fn name(&self) -> &'static str {
        "CLONE"
    }
    fn usage(&self) -> &'static str {
        "CLONE <from> <to>"
    }
    fn description(&self) -> &'static str {
        "Copies one register into another"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ids = parse_registers(cmd.operands())?;
        let (from, to) = (ids[0], ids[1]);
        let registers = env.state().registers();
        let text = registers.require(from)?;
        registers.set(to, text);
        Ok(CommandOutput::Notice(format!(
            "Cloned register '{}' to '{}'",
            from.to_char(),
            to.to_char()
        )))
    }
}

// ---------------------------------------------------------------------------
// # = - /
// ---------------------------------------------------------------------------

struct RecallCmd;
impl Verb for RecallCmd {
    fn aliases(&self) -> &'static [char] {
        &['#']
    }
    fn name(&self) -> &'static str {
        "RECALL"
    }
    fn usage(&self) -> &'static str {
        "RECALL <register> [register] ..."
    }
    fn description(&self) -> &'static str {
        "Recalls the commands in every listed register, in order"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ids = parse_registers(cmd.operands())?;
        recall_registers(env, &ids)?;
        Ok(CommandOutput::None)
    }
}

fn recall_when(cmd: &Command, env: &Environment<'_>, equal: bool) -> Result<CommandOutput> {
    let ops = cmd.operands();
    let targets = parse_registers(&ops[2..])?;
    if condition_holds(env, &ops[0], &ops[1])? == equal {
        recall_registers(env, &targets)?;
    }
    Ok(CommandOutput::None)
}

struct RecallIfCmd;
impl Verb for RecallIfCmd {
    fn aliases(&self) -> &'static [char] {
        &['=']
    }
    fn name(&self) -> &'static str {
        "RECALL_IF"
    }
    fn usage(&self) -> &'static str {
        "RECALL_IF <condition> <value> <register> [register] ..."
    }
    fn description(&self) -> &'static str {
        "Recalls the listed registers if the condition register equals value"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(3)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        recall_when(cmd, env, true)
    }
}

struct RecallIfNotCmd;
impl Verb for RecallIfNotCmd {
    fn aliases(&self) -> &'static [char] {
        &['-']
    }
    fn name(&self) -> &'static str {
        "RECALL_IF_NOT"
    }
    fn usage(&self) -> &'static str {
        "RECALL_IF_NOT <condition> <value> <register> [register] ..."
    }
    fn description(&self) -> &'static str {
        "Recalls the listed registers unless the condition register equals value"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(3)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        recall_when(cmd, env, false)
    }
}

struct RecallIfElseCmd;
impl Verb for RecallIfElseCmd {
    fn aliases(&self) -> &'static [char] {
        &['/']
    }
    fn name(&self) -> &'static str {
        "RECALL_IF_ELSE"
    }
    fn usage(&self) -> &'static str {
        "RECALL_IF_ELSE <condition> <value> <then> <else>"
    }
    fn description(&self) -> &'static str {
        "Recalls one of two registers depending on the condition register"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(4)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ops = cmd.operands();
        let branches = parse_registers(&ops[2..])?;
        let chosen = if condition_holds(env, &ops[0], &ops[1])? {
            branches[0]
        } else {
            branches[1]
        };
        recall_registers(env, &[chosen])?;
        Ok(CommandOutput::None)
    }
}
