// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use common::{
    common::options::{GlobalProperty, SystemConfig, DEFAULT_RAM_SIZE},
    numutil::parse_u64,
};
use sabrelite::Sabrelite;

mod script;

/// Run a script of guest accesses against a board with a mytest device.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Amount of guest RAM in bytes
    #[arg(long, default_value_t = DEFAULT_RAM_SIZE, value_parser = parse_size)]
    ram_size: u64,
    /// Set a device property before realize, as driver.property=value
    #[arg(short, long)]
    global: Vec<GlobalProperty>,
    /// Device options; `mytest,help` lists the mytest properties
    #[arg(long)]
    device: Option<String>,
    /// Log filter, in env_logger syntax. Overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Script to run; read from stdin if not given
    script: Option<PathBuf>,
}

fn parse_size(text: &str) -> Result<u64, String> {
    parse_u64(text).ok_or_else(|| format!("'{text}' is not a valid size"))
}

fn main() -> ExitCode {
    let args = Args::parse();
    match &args.log_level {
        Some(filter) => env_logger::Builder::new().parse_filters(filter).init(),
        None => env_logger::init(),
    }

    if let Some(device) = &args.device {
        return match device.as_str() {
            "mytest,help" | "help" => {
                print!("{}", mytest::help());
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("unsupported device option '{device}', try 'mytest,help'");
                ExitCode::FAILURE
            }
        };
    }

    let text = match &args.script {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map(|_| text)
        }
    };
    let text = match text {
        Ok(text) => text,
        Err(err) => {
            eprintln!("failed to read script: {err}");
            return ExitCode::FAILURE;
        }
    };
    let commands = match script::parse(&text) {
        Ok(commands) => commands,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let config = SystemConfig {
        ram_size: args.ram_size,
        globals: args.global,
        ..SystemConfig::default()
    };
    let mut sb = match Sabrelite::new(&config) {
        Ok(sb) => sb,
        Err(err) => {
            eprintln!("failed to create board: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::debug!("running {} script commands", commands.len());
    for cmd in commands {
        println!("{}", script::execute(&mut sb, cmd));
    }
    let events = sb.c.diagnostics.take_events();
    if !events.is_empty() {
        eprintln!("{} diagnostic event(s):", events.len());
        for event in events {
            eprintln!("  {event}");
        }
    }
    ExitCode::SUCCESS
}
