//! Blocking user prompts.
//!
//! The collection never talks to the user directly. Front ends hand a
//! `Dialogs` implementation to whatever needs a yes/no answer or has to
//! report a problem.

use std::io::{BufRead, Write};

use console::style;
use log::warn;

use crate::is_affirmative;

pub trait Dialogs {
    /// Asks a yes/no question and blocks until answered.
    fn confirm(&mut self, question: &str) -> bool;

    /// Shows a message and blocks until acknowledged.
    fn alert(&mut self, message: &str);

    /// Reads one line of free text. `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Option<String>;
}

/// Prompts on a text stream, e.g. stdin/stdout.
pub struct ConsoleDialogs<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Dialogs for ConsoleDialogs<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        if write!(self.output, "{} [y/N]: ", question)
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", style(message).red().bold()) {
            warn!("Failed to show alert '{}': {}", message, e);
        }
    }

    fn prompt(&mut self, label: &str) -> Option<String> {
        write!(self.output, "{}", label).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Failed to read input: {}", e);
                None
            }
        }
    }
}
