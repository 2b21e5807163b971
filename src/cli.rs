use getopts::Options;
use log::debug;
use std::ffi::OsString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::shredder::{shred_with, ShredOptions};

pub const USAGE: &str = "Usage: shred [-h] [-v] [--no-sync] <file_path>";
pub const SUCCESS_MESSAGE: &str = "File shredded and deleted successfully.";

#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub path: PathBuf,
    pub options: ShredOptions,
    pub verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help(String),
    Usage,
    Shred(Invocation),
}

impl Command {
    pub fn verbose(&self) -> bool {
        matches!(self, Command::Shred(inv) if inv.verbose)
    }
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("v", "verbose", "log each step to stderr");
    opts.optflag("", "no-sync", "do not fsync after each pass");
    opts
}

/// Arguments that are not options, taken from the raw list so a path need not
/// be UTF-8. Every option is a flag: an argument is free when it is `-`, does
/// not start with `-`, or follows `--`.
fn free_args(args: &[OsString]) -> Vec<&OsString> {
    let mut free = Vec::new();
    let mut rest = false;
    for arg in args.iter().skip(1) {
        let bytes = arg.as_bytes();
        if rest || bytes == b"-" || !bytes.starts_with(b"-") {
            free.push(arg);
        } else if bytes == b"--" {
            rest = true;
        }
    }
    free
}

/// `args` includes the program name at index 0.
pub fn parse_args(args: &[OsString]) -> Command {
    let opts = options();

    // getopts rejects non-UTF-8 arguments, so it only sees a lossy copy
    let lossy: Vec<String> = args
        .iter()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let matches = match opts.parse(&lossy) {
        Ok(m) => m,
        Err(_) => return Command::Usage,
    };

    if matches.opt_present("h") {
        return Command::Help(opts.usage(USAGE));
    }

    let path = match free_args(args).as_slice() {
        [path] if matches.free.len() == 1 => PathBuf::from(*path),
        _ => return Command::Usage,
    };

    Command::Shred(Invocation {
        path,
        options: ShredOptions {
            sync_each_pass: !matches.opt_present("no-sync"),
        },
        verbose: matches.opt_present("v"),
    })
}

/// Prints the outcome of `command` to `out` and returns the exit status.
pub fn execute(command: &Command, out: &mut dyn Write) -> io::Result<i32> {
    match command {
        Command::Help(text) => {
            write!(out, "{}", text)?;
            Ok(0)
        }
        Command::Usage => {
            writeln!(out, "{}", USAGE)?;
            Ok(1)
        }
        Command::Shred(inv) => match shred_with(&inv.path, inv.options) {
            Ok(report) => {
                debug!(
                    "{}: {} bytes in {} passes",
                    inv.path.display(),
                    report.bytes_written,
                    report.passes
                );
                writeln!(out, "{}", SUCCESS_MESSAGE)?;
                Ok(0)
            }
            Err(why) => {
                writeln!(out, "Error: {}", why)?;
                Ok(1)
            }
        },
    }
}

pub fn run(args: &[OsString], out: &mut dyn Write) -> io::Result<i32> {
    execute(&parse_args(args), out)
}
