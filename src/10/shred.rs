use anyhow::Result;
use env_logger::Env;
use std::env;
use std::ffi::OsString;
use std::io;
use std::process;

use shred::cli;

fn main() -> Result<()> {
    let args: Vec<OsString> = env::args_os().collect();

    let command = cli::parse_args(&args);

    // stdout carries only the result line, logs go to stderr
    let level = if command.verbose() { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init()?;

    let stdout = io::stdout();
    let status = cli::execute(&command, &mut stdout.lock())?;

    process::exit(status);
}
