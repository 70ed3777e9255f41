//! Prompt providers for the interactive cleanup pass.
//!
//! The cleanup pass never reads stdin directly. It asks a [`Console`], so tests
//! can feed it a [`ScriptedConsole`] with canned answers.

use crate::output::OutputFormatter;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// A synchronous request/response prompt.
pub trait Console {
    /// Shows `prompt` and returns the user's answer without the line ending.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Clears the screen before a new question sequence.
    fn clear_screen(&mut self) {}
}

/// Reads answers from the terminal.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn clear_screen(&mut self) {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return;
        }
        if let Err(e) = clear_terminal(&mut stdout) {
            OutputFormatter::warning(&format!("Could not clear the screen: {}", e));
        }
    }
}

/// Erases the whole screen and moves the cursor to the top-left corner.
fn clear_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))
}

/// Replays a fixed list of answers.
///
/// Once the answers run out every further prompt gets an empty answer, which
/// the cleanup pass treats as "no" / "skip".
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    /// Every prompt shown, in order.
    pub prompts: Vec<String>,
    /// How many times the screen was cleared.
    pub clears: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            clears: 0,
        }
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn clear_screen(&mut self) {
        self.clears += 1;
    }
}
