//! Command-line argument parsing.

use std::path::PathBuf;

pub const USAGE: &str = "\
usage: flcache <command> [dir]

commands:
  open <dir>   show the cached listing, then rescan and cache the fresh one
  scan <dir>   scan a directory and cache the listing
  show <dir>   show the cached listing without scanning
  clear        remove every cached listing";

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Open(PathBuf),
    Scan(PathBuf),
    Show(PathBuf),
    Clear,
    Help,
}

/// Parses the arguments after the program name.
///
/// A missing directory defaults to the current directory.
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };
    let dir = args.next().map(PathBuf::from);
    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument: {extra}"));
    }

    let dir_or_cwd = || dir.clone().unwrap_or_else(|| PathBuf::from("."));
    match command.as_str() {
        "open" => Ok(CliCommand::Open(dir_or_cwd())),
        "scan" => Ok(CliCommand::Scan(dir_or_cwd())),
        "show" => Ok(CliCommand::Show(dir_or_cwd())),
        "clear" if dir.is_none() => Ok(CliCommand::Clear),
        "clear" => Err("clear takes no directory".to_string()),
        "help" | "-h" | "--help" => Ok(CliCommand::Help),
        other => Err(format!("unknown command: {other}")),
    }
}
