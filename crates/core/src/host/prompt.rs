use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Modal interaction surface: a button choice and a single-line text prompt.
pub trait Prompter {
    /// Present `buttons` and return the selected index, or `None` when dismissed.
    fn choose(&mut self, message: &str, buttons: &[&str]) -> Option<usize>;
    /// Ask for a line of text. `None` means cancelled; an empty string is a valid answer.
    fn ask(&mut self, message: &str) -> Option<String>;
}

/// Line-oriented prompter over any reader/writer pair (stdin/stdout in the CLI).
///
/// End of input counts as cancel.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose(&mut self, message: &str, buttons: &[&str]) -> Option<usize> {
        let _ = writeln!(self.output, "{message}");
        for (idx, label) in buttons.iter().enumerate() {
            let _ = writeln!(self.output, "  {}) {}", idx + 1, label);
        }
        let _ = write!(self.output, "> ");
        let _ = self.output.flush();

        let answer = self.read_line()?;
        let choice: usize = answer.trim().parse().ok()?;
        (1..=buttons.len()).contains(&choice).then(|| choice - 1)
    }

    fn ask(&mut self, message: &str) -> Option<String> {
        let _ = write!(self.output, "{message} ");
        let _ = self.output.flush();
        self.read_line()
    }
}

/// Replays canned answers; used by tests and non-interactive callers.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    choices: VecDeque<Option<usize>>,
    answers: VecDeque<Option<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_choice(mut self, choice: Option<usize>) -> Self {
        self.choices.push_back(choice);
        self
    }

    pub fn with_answer(mut self, answer: Option<&str>) -> Self {
        self.answers.push_back(answer.map(str::to_string));
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, _message: &str, _buttons: &[&str]) -> Option<usize> {
        self.choices.pop_front().flatten()
    }

    fn ask(&mut self, _message: &str) -> Option<String> {
        self.answers.pop_front().flatten()
    }
}
