//! Text commands: one per line, whitespace-separated, short aliases accepted.

use cubeclear::Coord;
use thiserror::Error;

/// Command from an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pick(Coord),
    Remove,
    Clear,
    Reset,
    Show,
    Snapshot,
    Status,
    Help,
    Quit,
    /// Blank line or comment.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),
    #[error("pick needs three coordinates: pick X Y Z")]
    MissingCoord,
    #[error("not a coordinate: {0}")]
    BadCoord(String),
    #[error("unexpected argument: {0}")]
    Trailing(String),
}

pub const HELP: &str = "\
commands:
  pick X Y Z   (p)     select the cluster at X Y Z, or remove it if already selected
  remove       (r)     remove the current selection
  clear        (c)     drop the current selection
  reset                start over with a new cube
  show         (s)     print the cube
  snapshot     (json)  print every cell as JSON
  status               score, level, target
  help         (?)     this text
  quit         (q)     exit";

/// Parse one input line. `#` starts a comment.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.split('#').next().unwrap_or_default();
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "pick" | "p" => {
            let mut axis = || -> Result<usize, CommandError> {
                let word = words.next().ok_or(CommandError::MissingCoord)?;
                word.parse()
                    .map_err(|_| CommandError::BadCoord(word.to_string()))
            };
            let (x, y, z) = (axis()?, axis()?, axis()?);
            Command::Pick(Coord::new(x, y, z))
        }
        "remove" | "r" => Command::Remove,
        "clear" | "c" => Command::Clear,
        "reset" | "restart" => Command::Reset,
        "show" | "s" => Command::Show,
        "snapshot" | "json" => Command::Snapshot,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    match words.next() {
        Some(extra) => Err(CommandError::Trailing(extra.to_string())),
        None => Ok(command),
    }
}
