//! Interactive credential re-entry.

use crate::config::CredentialsSection;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Source of answers to interactive questions.
pub trait Prompter {
    /// Ask a question; `None` when the user aborted (Ctrl-C / Ctrl-D).
    fn ask(&mut self, question: &str) -> Result<Option<String>>;
}

/// Prompter reading from the terminal.
pub struct TerminalPrompter {
    editor: DefaultEditor,
}

impl TerminalPrompter {
    /// Create a terminal prompter.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| CliError::Prompt(format!("Failed to initialize editor: {}", e)))?;
        Ok(Self { editor })
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        match self.editor.readline(question) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(CliError::Prompt(err.to_string())),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes" | "true")
}

/// Offer to enter the login manually.
///
/// Returns `None` when the user declines or aborts.
pub fn reenter_credentials<P: Prompter>(
    prompter: &mut P,
    formatter: &Formatter,
) -> Result<Option<CredentialsSection>> {
    let Some(answer) =
        prompter.ask("Would you like to manually enter server credentials? [y/N] ")?
    else {
        return Ok(None);
    };
    if !is_yes(&answer) {
        return Ok(None);
    }

    println!("{}", formatter.warning("Input is echoed to the terminal"));

    let questions = [
        "Instance URL: ",
        "Username (basic auth) or client id (OAuth): ",
        "Password (basic auth) or client secret (OAuth): ",
        "Using OAuth? [y/N] ",
    ];
    let mut answers = Vec::with_capacity(questions.len());
    for question in questions {
        match prompter.ask(question)? {
            Some(answer) => answers.push(answer),
            None => return Ok(None),
        }
    }

    let using_oauth = is_yes(&answers[3]);
    let mut answers = answers.into_iter();
    Ok(Some(CredentialsSection {
        instance_url: answers.next(),
        username: answers.next(),
        password: answers.next(),
        using_oauth: Some(using_oauth),
    }))
}
