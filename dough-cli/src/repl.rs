use anyhow::Result;
use clap::{Parser, Subcommand};
use dough_core::FermentationHours;
use std::io::{BufRead, Write};
use tracing::trace;

use crate::session::{Field, Session};
use crate::ModeFlag;

/// One line typed at the `dough>` prompt.
#[derive(Parser, Debug)]
#[command(multicall = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Switch recipe
    Mode {
        #[arg(value_enum)]
        mode: ModeFlag,
    },
    /// Change one input of the current recipe
    Set {
        #[arg(value_enum)]
        field: Field,
        value: String,
    },
    /// Set the kneading (or poolish) time, HH:MM
    Start { time: String },
    /// Restore the current recipe's defaults
    Reset,
    /// Print the current recipe again
    Show,
    /// List the poolish fermentation windows
    Hours,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Read commands until `quit` or end of input, re-rendering the recipe
/// after every change.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "Type `help` for commands.")?;
    write!(out, "{}", session.report().to_text())?;

    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        trace!(?words, "command line");

        let command = match Line::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{e}")?;
                continue;
            }
        };

        match command {
            Command::Mode { mode } => {
                session.select(mode.into());
                writeln!(out, "Mode: {:?}", session.mode())?;
            }
            Command::Set { field, value } => {
                if let Err(e) = session.set(field, &value) {
                    writeln!(out, "error: {e:#}")?;
                    continue;
                }
            }
            Command::Start { time } => session.set_start(&time),
            Command::Reset => session.reset(),
            Command::Show => {}
            Command::Hours => {
                for h in FermentationHours::all() {
                    writeln!(out, "{:>5}  {:.3} % yeast", h.to_string(), h.yeast_percent())?;
                }
                continue;
            }
            Command::Quit => break,
        }

        write!(out, "{}", session.report().to_text())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dough_core::{ModeKind, RecipeInputs};

    fn drive(script: &str) -> (Session, String) {
        let mut session =
            Session::new(RecipeInputs::defaults(ModeKind::Standard), "10:00".to_string());
        let mut out = Vec::new();
        run(&mut session, script.as_bytes(), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_commands_update_session() {
        let (s, _) = drive("mode custom\nset balls 8\nset yeast 0.4\n");
        assert_eq!(s.mode(), ModeKind::Custom);
        assert_eq!(s.current().balls, 8);
        assert_eq!(s.current().yeast_pct(), 0.4);
    }

    #[test]
    fn test_bad_input_reports_and_continues() {
        let (s, out) = drive("set salt 2\nfly away\nset balls 5\n");
        assert!(out.contains("error: salt can't be changed in Standard mode"));
        assert_eq!(s.current().balls, 5);
    }

    #[test]
    fn test_quit_stops_reading() {
        let (s, _) = drive("quit\nset balls 7\n");
        assert_eq!(s.current().balls, 4);
    }

    #[test]
    fn test_hours_lists_table() {
        let (_, out) = drive("hours\n");
        assert!(out.contains(" 12 h  0.250 % yeast"));
        assert!(out.contains(" 20 h  0.039 % yeast"));
    }

    #[test]
    fn test_start_and_reset() {
        let (s, out) = drive("start 25:99\nset hydration 70\nreset\n");
        assert_eq!(s.start(), "25:99");
        assert!(out.contains("expected HH:MM"));
        assert_eq!(*s.current(), RecipeInputs::defaults(ModeKind::Standard));
    }
}
