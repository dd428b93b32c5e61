// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

//! Scripts of guest accesses to run against the board.
//!
//! One command per line, `#` starts a comment:
//! ```text
//! write 0x50000000 1
//! advance 0.5
//! irq 42
//! read 0x50000000
//! ```

use common::{common::width::Width, numutil::parse_u64};
use sabrelite::Sabrelite;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Read { addr: u64, width: Width },
    Write { addr: u64, value: u64, width: Width },
    Advance { seconds: f64 },
    Irq { pin: usize },
    Reset,
    Method,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{name}'")]
    UnknownCommand { line: usize, name: String },
    #[error("line {line}: '{command}' is missing its {what}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        what: &'static str,
    },
    #[error("line {line}: unexpected argument '{arg}'")]
    ExtraArgument { line: usize, arg: String },
    #[error("line {line}: '{text}' is not a valid number")]
    InvalidNumber { line: usize, text: String },
    #[error("line {line}: access size {size} is not 1, 2, 4 or 8")]
    InvalidSize { line: usize, size: u64 },
}

/// Parse a whole script. Line numbers in errors start at 1.
pub fn parse(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(cmd) = parse_line(idx + 1, line)? {
            commands.push(cmd);
        }
    }
    Ok(commands)
}

fn parse_line(line: usize, text: &str) -> Result<Option<Command>, ScriptError> {
    let text = text.split_once('#').map_or(text, |(code, _)| code);
    let mut args = text.split_whitespace();
    let Some(name) = args.next() else {
        return Ok(None);
    };

    let cmd = match name {
        "read" => Command::Read {
            addr: number(line, args.next(), "read", "address")?,
            width: width(line, args.next())?,
        },
        "write" => Command::Write {
            addr: number(line, args.next(), "write", "address")?,
            value: number(line, args.next(), "write", "value")?,
            width: width(line, args.next())?,
        },
        "advance" => {
            let text = args.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "advance",
                what: "seconds",
            })?;
            let seconds = text
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .ok_or_else(|| ScriptError::InvalidNumber {
                    line,
                    text: text.to_string(),
                })?;
            Command::Advance { seconds }
        }
        "irq" => Command::Irq {
            pin: number(line, args.next(), "irq", "pin")? as usize,
        },
        "reset" => Command::Reset,
        "method" => Command::Method,
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                name: name.to_string(),
            })
        }
    };

    match args.next() {
        Some(arg) => Err(ScriptError::ExtraArgument {
            line,
            arg: arg.to_string(),
        }),
        None => Ok(Some(cmd)),
    }
}

fn number(
    line: usize,
    arg: Option<&str>,
    command: &'static str,
    what: &'static str,
) -> Result<u64, ScriptError> {
    let arg = arg.ok_or(ScriptError::MissingArgument {
        line,
        command,
        what,
    })?;
    parse_u64(arg).ok_or_else(|| ScriptError::InvalidNumber {
        line,
        text: arg.to_string(),
    })
}

/// Access width from an optional size in bytes; 4 if not given.
fn width(line: usize, arg: Option<&str>) -> Result<Width, ScriptError> {
    let Some(arg) = arg else {
        return Ok(Width::Word);
    };
    let size = parse_u64(arg).ok_or_else(|| ScriptError::InvalidNumber {
        line,
        text: arg.to_string(),
    })?;
    u32::try_from(size)
        .ok()
        .and_then(Width::from_size)
        .ok_or(ScriptError::InvalidSize { line, size })
}

/// Run a command against the board, returning the line to print.
pub fn execute(sb: &mut Sabrelite, cmd: Command) -> String {
    match cmd {
        Command::Read { addr, width } => {
            let value = sb.read(addr, width);
            format!("read  0x{addr:08X} ({}) = 0x{value:08X}", width.size())
        }
        Command::Write { addr, value, width } => {
            sb.write(addr, value, width);
            format!("write 0x{addr:08X} ({}) = 0x{value:08X}", width.size())
        }
        Command::Advance { seconds } => {
            sb.advance_delta(seconds);
            format!("time  {:.9}s", sb.now() as f64 / 1e9)
        }
        Command::Irq { pin } => format!("irq   {pin} = {}", u8::from(sb.irq_level(pin))),
        Command::Reset => {
            sb.reset();
            "reset".to_string()
        }
        Command::Method => {
            sb.mytest_method();
            "method".to_string()
        }
    }
}
