//! Line input for the shell, the form and confirmation prompts.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Read one command line. `None` on Ctrl-C or end of input.
    pub fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Read a form field, pre-filled with its current value.
    pub fn field(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        match self.editor.readline_with_initial(&format!("{label}: "), (current, "")) {
            Ok(value) => Ok(Some(value)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Ask a yes/no question. Anything but an explicit yes, including a
    /// read failure, is a no.
    pub fn confirm(&mut self, question: &str) -> bool {
        match self.editor.readline(&format!("{question} [y/N] ")) {
            Ok(answer) => is_yes(&answer),
            Err(err) => {
                tracing::debug!(error = %err, "confirmation aborted");
                false
            }
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
