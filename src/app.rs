//! App: reads commands line by line, drives the session, writes text or JSON replies.

use crate::OutputFormat;
use crate::input::{Command, HELP, parse_command};
use crate::view;
use anyhow::Result;
use cubeclear::{GameConfig, GameError, GameSession, PickOutcome};
use serde::Serialize;
use serde_json::json;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    session: GameSession,
    format: OutputFormat,
    /// Text mode: skip the board after each command.
    quiet: bool,
}

impl App {
    pub fn new(config: &GameConfig, format: OutputFormat, quiet: bool) -> Result<Self> {
        Ok(Self {
            session: GameSession::new(config)?,
            format,
            quiet,
        })
    }

    #[cfg(test)]
    fn with_session(session: GameSession, format: OutputFormat) -> Self {
        Self {
            session,
            format,
            quiet: true,
        }
    }

    /// Runs until `quit` or end of input on stdin/stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        if self.format == OutputFormat::Text && !self.quiet {
            writeln!(out, "{}", view::render_session(&self.session))?;
        }
        for line in input.lines() {
            let line = line?;
            let flow = match parse_command(&line) {
                Ok(command) => self.apply_command(command, &mut out)?,
                Err(e) => {
                    debug!(%line, error = %e, "unparsed input");
                    self.report_error(&e.to_string(), false, &mut out)?;
                    Flow::Continue
                }
            };
            out.flush()?;
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn apply_command<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::None => return Ok(Flow::Continue),
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => match self.format {
                OutputFormat::Text => writeln!(out, "{HELP}")?,
                OutputFormat::Json => self.emit(&json!({ "help": HELP }), out)?,
            },
            Command::Pick(coord) => match self.session.pick_cell(coord) {
                Ok(outcome) => self.report_pick(&outcome, out)?,
                Err(e) => self.report_game_error(e, out)?,
            },
            Command::Remove => match self.session.remove_selection() {
                Ok(report) => self.report_pick(&PickOutcome::Removed(report), out)?,
                Err(e) => self.report_game_error(e, out)?,
            },
            Command::Clear => {
                self.session.clear_selection();
                self.report_board(&self.session.selection_snapshot(), out)?;
            }
            Command::Reset => {
                self.session.reset();
                self.report_board(&self.session.status(), out)?;
            }
            Command::Show => match self.format {
                OutputFormat::Text => writeln!(out, "{}", view::render_session(&self.session))?,
                OutputFormat::Json => self.emit(&self.session.status(), out)?,
            },
            Command::Snapshot => self.emit(&self.session.grid_snapshot(), out)?,
            Command::Status => match self.format {
                OutputFormat::Text => {
                    writeln!(out, "{}", view::render_status(&self.session.status()))?;
                }
                OutputFormat::Json => self.emit(&self.session.status(), out)?,
            },
        }
        Ok(Flow::Continue)
    }

    fn report_pick<W: Write>(&self, outcome: &PickOutcome, out: &mut W) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.emit(outcome, out);
        }
        match outcome {
            PickOutcome::Selected(snap) => writeln!(
                out,
                "selected {} cell(s){}",
                snap.size,
                if snap.removable { "" } else { " (not removable)" }
            )?,
            PickOutcome::Unchanged(_) => writeln!(out, "nothing to remove")?,
            PickOutcome::Removed(report) => {
                writeln!(out, "+{} points", report.points_awarded)?;
                if let Some(level) = report.new_level {
                    writeln!(out, "level up! now level {level}")?;
                }
            }
        }
        self.show_board(out)
    }

    /// JSON: emit `value`. Text: print the board unless quiet.
    fn report_board<W: Write, T: Serialize>(&self, value: &T, out: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.emit(value, out),
            OutputFormat::Text => self.show_board(out),
        }
    }

    fn show_board<W: Write>(&self, out: &mut W) -> Result<()> {
        if !self.quiet {
            writeln!(out, "{}", view::render_session(&self.session))?;
        }
        Ok(())
    }

    fn report_game_error<W: Write>(&self, error: GameError, out: &mut W) -> Result<()> {
        if !error.is_noop() {
            warn!(%error, "rejected command");
        }
        self.report_error(&error.to_string(), error.is_noop(), out)
    }

    fn report_error<W: Write>(&self, message: &str, noop: bool, out: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.emit(&json!({ "error": message, "noop": noop }), out),
            OutputFormat::Text if noop => Ok(writeln!(out, "no-op: {message}")?),
            OutputFormat::Text => Ok(writeln!(out, "error: {message}")?),
        }
    }

    fn emit<W: Write, T: Serialize + ?Sized>(&self, value: &T, out: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}
