//! Operator prompts

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;

use crate::award::Choice;

/// Source of operator answers
pub trait Prompter {
    /// Ask a question and return the raw answer
    fn ask(&mut self, prompt: &str) -> Result<String>;
    /// Tell the operator something went wrong with their answer
    fn warn(&mut self, message: &str);
}

/// Interactive terminal prompts
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")
    }

    fn warn(&mut self, message: &str) {
        eprintln!("{}", message.yellow());
    }
}

/// Ask until the answer is one of the accepted tokens of `T`
pub fn prompt_choice<T: Choice>(prompter: &mut dyn Prompter, prompt: &str) -> Result<T> {
    loop {
        let answer = prompter.ask(prompt)?;
        match T::parse_token(&answer) {
            Some(value) => return Ok(value),
            None => {
                log::debug!("Rejected {} input '{}'", T::LABEL, answer.trim());
                prompter.warn(&format!("Invalid input. Choose from {}.", T::tokens()));
            }
        }
    }
}

/// Ask for free text, trimmed
pub fn prompt_text(prompter: &mut dyn Prompter, prompt: &str) -> Result<String> {
    Ok(prompter.ask(prompt)?.trim().to_string())
}

/// Replays canned answers; runs out with an error
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().context("No more scripted answers")
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::award::{Category, Kind};

    #[test]
    fn test_invalid_tokens_reprompt() {
        let mut prompter = ScriptedPrompter::new(&["x", "gold", "  ", " G "]);
        let category: Category = prompt_choice(&mut prompter, "Color").unwrap();

        assert_eq!(category, Category::Gold);
        assert_eq!(prompter.prompts.len(), 4);
        assert_eq!(prompter.warnings.len(), 3);
        assert_eq!(prompter.warnings[0], "Invalid input. Choose from b, s, g.");
    }

    #[test]
    fn test_kind_accepts_first_valid() {
        let mut prompter = ScriptedPrompter::new(&["a", "h"]);
        let kind: Kind = prompt_choice(&mut prompter, "Type").unwrap();
        assert_eq!(kind, Kind::Activator);
        assert!(prompter.warnings.is_empty());
    }

    #[test]
    fn test_end_of_input_stops_loop() {
        let mut prompter = ScriptedPrompter::new(&["x"]);
        assert!(prompt_choice::<Kind>(&mut prompter, "Type").is_err());
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut prompter = ScriptedPrompter::new(&["  Erwin - PA3EFR \n"]);
        assert_eq!(prompt_text(&mut prompter, "Name").unwrap(), "Erwin - PA3EFR");
    }
}
