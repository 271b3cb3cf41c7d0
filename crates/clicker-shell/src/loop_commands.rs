//! Looping verbs. Both run their body on a detached background thread and
//! return to the caller immediately.

use std::time::Duration;

use clicker_types::error::{ClickerError, Result};

use crate::interpreter::{Arity, CommandOutput, Environment, Shell, Verb, VerbRegistry};
use crate::register_commands::parse_registers;
use crate::slots::{RegisterId, SlotKey};
use crate::tasks::spawn_detached;
use crate::tokenizer::{Command, tokenize};

/// Pause between condition checks while a `^` loop is not running its body.
const WHILE_IDLE: Duration = Duration::from_millis(10);

/// Register `*` and `^`.
pub fn register_loop_commands(reg: &mut VerbRegistry) {
    reg.register(Box::new(RepeatCmd));
    reg.register(Box::new(WhileCmd));
}

/// Copy the current text of every register, failing on the first empty one.
fn snapshot(env: &Environment<'_>, ids: &[RegisterId]) -> Result<Vec<String>> {
    let registers = env.state().registers();
    ids.iter().map(|&id| registers.require(id)).collect()
}

fn parse_all(texts: &[String]) -> Result<Vec<Command>> {
    texts.iter().map(|text| tokenize(text)).collect()
}

fn describe(ids: &[RegisterId]) -> String {
    ids.iter().map(|id| id.to_char()).collect()
}

// ---------------------------------------------------------------------------
// *
// ---------------------------------------------------------------------------

struct RepeatCmd;
impl Verb for RepeatCmd {
    fn aliases(&self) -> &'static [char] {
        &['*']
    }
    fn name(&self) -> &'static str {
        "REPEAT"
    }
    fn usage(&self) -> &'static str {
        "REPEAT <count> <register> [register] ..."
    }
    fn description(&self) -> &'static str {
        "Runs the listed registers count times in the background"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(2)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ops = cmd.operands();
        let count = match ops[0].parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ClickerError::InvalidArgument(format!(
                    "repeat count must be a positive integer, got '{}'",
                    ops[0]
                )));
            },
        };
        let ids = parse_registers(&ops[1..])?;
        let texts = snapshot(env, &ids)?;
        let shell = env.shell().clone();
        let label = describe(&ids);

        spawn_detached("repeat", move || run_repeat(&shell, &texts, count))?;
        Ok(CommandOutput::Notice(format!(
            "Repeating registers '{label}' {count} times"
        )))
    }
}

fn run_repeat(shell: &Shell, texts: &[String], count: u64) {
    let cmds = match parse_all(texts) {
        Ok(cmds) => cmds,
        Err(e) => {
            log::warn!("repeat aborted: {e}");
            return;
        },
    };
    for _ in 0..count {
        for cmd in &cmds {
            if shell.quit_requested() {
                return;
            }
            shell.dispatch(cmd, 1);
        }
    }
    log::debug!("repeat finished after {count} passes");
}

// ---------------------------------------------------------------------------
// ^
// ---------------------------------------------------------------------------

struct WhileCmd;
impl Verb for WhileCmd {
    fn aliases(&self) -> &'static [char] {
        &['^']
    }
    fn name(&self) -> &'static str {
        "WHILE"
    }
    fn usage(&self) -> &'static str {
        "WHILE <condition> <value> <register> [register] ..."
    }
    fn description(&self) -> &'static str {
        "Runs the listed registers in the background whenever the condition register equals value"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(3)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ops = cmd.operands();
        let condition = RegisterId::parse(&ops[0])?;
        let value = ops[1].clone();
        let ids = parse_registers(&ops[2..])?;
        let texts = snapshot(env, &ids)?;
        let shell = env.shell().clone();
        let label = describe(&ids);

        spawn_detached("while", move || run_while(&shell, condition, &value, &texts))?;
        Ok(CommandOutput::Notice(format!(
            "Looping registers '{label}' while '{}' is {}",
            condition.to_char(),
            ops[1]
        )))
    }
}

/// Runs until quit. The live condition is read before every body command;
/// when it fails the pass ends and the loop idles until it holds again.
fn run_while(shell: &Shell, condition: RegisterId, value: &str, texts: &[String]) {
    let cmds = match parse_all(texts) {
        Ok(cmds) => cmds,
        Err(e) => {
            log::warn!("while aborted: {e}");
            return;
        },
    };
    let holds = || shell.state().registers().get(condition).as_deref() == Some(value);

    'outer: while !shell.quit_requested() {
        for cmd in &cmds {
            if !holds() {
                std::thread::sleep(WHILE_IDLE);
                continue 'outer;
            }
            shell.dispatch(cmd, 1);
        }
    }
    log::debug!("while loop on '{}' stopped", condition.to_char());
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clicker_types::input::DeviceEvent;

    use crate::interpreter::testing::{test_shell, wait_until};
    use crate::slots::{RegisterId, SlotKey};

    fn taps(events: &[DeviceEvent], key: char) -> usize {
        events
            .iter()
            .filter(|e| **e == DeviceEvent::KeyDown(key))
            .count()
    }

    #[test]
    fn repeat_runs_exactly_count_times() {
        let (shell, _, console) = test_shell();
        shell.execute_line("@ a P tick");
        shell.execute_line("* 3 a");
        assert!(wait_until(|| console.count("tick") == 3));
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(console.count("tick"), 3);
    }

    #[test]
    fn repeat_returns_before_task_finishes() {
        let (shell, _, console) = test_shell();
        shell.execute_line("@ a W 200");
        shell.execute_line("@ b P done");
        shell.execute_line("* 1 a b");
        assert_eq!(console.count("done"), 0);
        assert!(wait_until(|| console.count("done") == 1));
    }

    #[test]
    fn repeat_uses_snapshot_taken_at_spawn() {
        let (shell, _, console) = test_shell();
        shell.execute_line("@ a W 100");
        shell.execute_line("@ b P before");
        shell.execute_line("* 1 a b");
        shell.execute_line("@ b P after");
        assert!(wait_until(|| console.count("before") == 1));
        assert_eq!(console.count("after"), 0);
    }

    #[test]
    fn repeat_argument_errors() {
        let (shell, _, console) = test_shell();
        shell.execute_line("@ a P tick");
        shell.execute_line("* 0 a");
        shell.execute_line("* -2 a");
        shell.execute_line("* x a");
        shell.execute_line("* 2 a z");
        let lines = console.lines();
        assert_eq!(
            &lines[1..4],
            [
                "invalid argument: repeat count must be a positive integer, got '0'",
                "invalid argument: repeat count must be a positive integer, got '-2'",
                "invalid argument: repeat count must be a positive integer, got 'x'",
            ]
        );
        assert_eq!(lines[4], "no command found in register 'z'");
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(console.count("tick"), 0);
    }

    #[test]
    fn while_stops_within_a_pass_when_condition_changes() {
        let (shell, device, _) = test_shell();
        shell.execute_line("@ c go");
        shell.execute_line("@ a K a");
        shell.execute_line("@ s @ c stop");
        shell.execute_line("@ z K z");
        shell.execute_line("^ c go a s z");

        let registers = shell.state().registers();
        let c = RegisterId::from_char('c').unwrap();
        assert!(wait_until(|| registers.get(c).as_deref() == Some("stop")));
        std::thread::sleep(Duration::from_millis(50));

        let events = device.events();
        assert_eq!(taps(&events, 'a'), 1);
        assert_eq!(taps(&events, 'z'), 0);
        shell.state().set_quit();
    }

    #[test]
    fn while_pauses_and_resumes() {
        let (shell, device, _) = test_shell();
        shell.execute_line("@ c off");
        shell.execute_line("@ a K a");
        shell.execute_line("^ c on a");
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(taps(&device.events(), 'a'), 0);

        shell.execute_line("@ c on");
        assert!(wait_until(|| taps(&device.events(), 'a') > 0));

        shell.execute_line("@ c off");
        std::thread::sleep(Duration::from_millis(50));
        device.take_events();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(taps(&device.events(), 'a'), 0);

        shell.execute_line("@ c on");
        assert!(wait_until(|| taps(&device.events(), 'a') > 0));
        shell.state().set_quit();
    }

    #[test]
    fn while_requires_body_registers() {
        let (shell, _, console) = test_shell();
        shell.execute_line("@ c go");
        console.clear();
        shell.execute_line("^ c go q");
        assert_eq!(console.lines(), ["no command found in register 'q'"]);
    }
}
