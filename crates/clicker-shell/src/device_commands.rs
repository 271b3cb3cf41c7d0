//! Pointer and keyboard verbs, forwarded to the input device.

use std::time::Duration;

use clicker_types::error::{ClickerError, Result};
use clicker_types::input::MouseButton;

use crate::interpreter::{Arity, CommandOutput, Environment, Verb, VerbRegistry};
use crate::options::ENABLE_LAST_LOCATION_REGISTER;
use crate::slots::RegisterId;
use crate::tokenizer::Command;

/// Register `M`, `C`, `}`, `{`, `K`, `]`, `[`, `S` and `W`.
pub fn register_device_commands(reg: &mut VerbRegistry) {
    reg.register(Box::new(MoveCmd));
    for verb in BUTTON_VERBS {
        reg.register(Box::new(verb));
    }
    for verb in KEY_VERBS {
        reg.register(Box::new(verb));
    }
    reg.register(Box::new(SequenceCmd));
    reg.register(Box::new(DelayCmd));
}

#[derive(Debug, Clone, Copy)]
enum Stroke {
    /// Press and release.
    Tap,
    Down,
    Up,
}

// ---------------------------------------------------------------------------
// M
// ---------------------------------------------------------------------------

struct MoveCmd;
impl Verb for MoveCmd {
    fn aliases(&self) -> &'static [char] {
        &['M']
    }
    fn name(&self) -> &'static str {
        "MOVE"
    }
    fn usage(&self) -> &'static str {
        "MOVE [x] [y]"
    }
    fn description(&self) -> &'static str {
        "Moves the mouse, or stores its position in register L when given no coordinates"
    }
    fn arity(&self) -> Arity {
        Arity::OneOf(&[0, 2])
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        match cmd.operands() {
            [x, y] => {
                let x = parse_coordinate(x)?;
                let y = parse_coordinate(y)?;
                env.device().move_cursor(x, y)?;
                Ok(CommandOutput::None)
            },
            _ => {
                let state = env.state();
                if !state.options().is_true(ENABLE_LAST_LOCATION_REGISTER) {
                    return Err(ClickerError::InvalidArgument(format!(
                        "MOVE needs coordinates unless {ENABLE_LAST_LOCATION_REGISTER} is true"
                    )));
                }
                let (x, y) = env.device().query_cursor()?;
                let text = format!("M {x} {y}");
                state.registers().set(RegisterId::LAST_LOCATION, text.clone());
                Ok(CommandOutput::Notice(format!(
                    "Recorded command in register 'L': {text}"
                )))
            },
        }
    }
}

fn parse_coordinate(arg: &str) -> Result<i32> {
    arg.parse()
        .map_err(|_| ClickerError::InvalidArgument(format!("invalid coordinate '{arg}'")))
}

// ---------------------------------------------------------------------------
// C } {
// ---------------------------------------------------------------------------

struct ButtonCmd {
    opcode: &'static [char],
    name: &'static str,
    usage: &'static str,
    description: &'static str,
    stroke: Stroke,
}

const BUTTON_VERBS: [ButtonCmd; 3] = [
    ButtonCmd {
        opcode: &['C'],
        name: "CLICK",
        usage: "CLICK <button>",
        description: "Clicks a mouse button (0 left, 1 right, 2 middle)",
        stroke: Stroke::Tap,
    },
    ButtonCmd {
        opcode: &['}'],
        name: "CLICK_DOWN",
        usage: "CLICK_DOWN <button>",
        description: "Presses and holds a mouse button",
        stroke: Stroke::Down,
    },
    ButtonCmd {
        opcode: &['{'],
        name: "CLICK_UP",
        usage: "CLICK_UP <button>",
        description: "Releases a mouse button",
        stroke: Stroke::Up,
    },
];

impl Verb for ButtonCmd {
    fn aliases(&self) -> &'static [char] {
        self.opcode
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn usage(&self) -> &'static str {
        self.usage
    }
    fn description(&self) -> &'static str {
        self.description
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let button = MouseButton::parse(&cmd.operands()[0])?;
        let device = env.device();
        match self.stroke {
            Stroke::Tap => {
                device.click(button)?;
                env.state().record_click();
            },
            Stroke::Down => device.press_button(button)?,
            Stroke::Up => device.release_button(button)?,
        }
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// K ] [
// ---------------------------------------------------------------------------

struct KeyCmd {
    opcode: &'static [char],
    name: &'static str,
    usage: &'static str,
    description: &'static str,
    stroke: Stroke,
}

const KEY_VERBS: [KeyCmd; 3] = [
    KeyCmd {
        opcode: &['K'],
        name: "KEY",
        usage: "KEY <key>",
        description: "Presses and releases a key",
        stroke: Stroke::Tap,
    },
    KeyCmd {
        opcode: &[']'],
        name: "KEY_DOWN",
        usage: "KEY_DOWN <key>",
        description: "Presses and holds a key",
        stroke: Stroke::Down,
    },
    KeyCmd {
        opcode: &['['],
        name: "KEY_UP",
        usage: "KEY_UP <key>",
        description: "Releases a key",
        stroke: Stroke::Up,
    },
];

impl Verb for KeyCmd {
    fn aliases(&self) -> &'static [char] {
        self.opcode
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn usage(&self) -> &'static str {
        self.usage
    }
    fn description(&self) -> &'static str {
        self.description
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let key = cmd.operands()[0]
            .chars()
            .next()
            .ok_or_else(|| ClickerError::InvalidArgument("empty key".to_string()))?;
        let device = env.device();
        match self.stroke {
            Stroke::Tap => device.tap_key(key)?,
            Stroke::Down => device.press_key(key)?,
            Stroke::Up => device.release_key(key)?,
        }
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// S
// ---------------------------------------------------------------------------

struct SequenceCmd;
impl Verb for SequenceCmd {
    fn aliases(&self) -> &'static [char] {
        &['S']
    }
    fn name(&self) -> &'static str {
        "SEQUENCE"
    }
    fn usage(&self) -> &'static str {
        "SEQUENCE <keys> [keys] ..."
    }
    fn description(&self) -> &'static str {
        "Types every character, with a space between arguments"
    }
    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }
    fn execute(&self, cmd: &Command, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let device = env.device();
        for (i, word) in cmd.operands().iter().enumerate() {
            if i > 0 {
                device.tap_key(' ')?;
            }
            for key in word.chars() {
                device.tap_key(key)?;
            }
        }
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// W
// ---------------------------------------------------------------------------

struct DelayCmd;
impl Verb for DelayCmd {
    fn aliases(&self) -> &'static [char] {
        &['W']
    }
    fn name(&self) -> &'static str {
        "DELAY"
    }
    fn usage(&self) -> &'static str {
        "DELAY <ms>"
    }
    fn description(&self) -> &'static str {
        "Waits for the given number of milliseconds"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn execute(&self, cmd: &Command, _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let arg = &cmd.operands()[0];
        let ms: u64 = arg.parse().map_err(|_| {
            ClickerError::InvalidArgument(format!("invalid number of milliseconds '{arg}'"))
        })?;
        std::thread::sleep(Duration::from_millis(ms));
        Ok(CommandOutput::None)
    }
}
