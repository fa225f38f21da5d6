#[cfg(test)]
use std::collections::VecDeque;

use dialoguer::Input;

use crate::error::{HsaError, Result};

/// Source of answers for every interactive question the workflows ask.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| HsaError::Prompt(e.to_string()))?;
        Ok(answer.trim().to_string())
    }
}

/// Replays a fixed list of answers; errors once they run out.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| HsaError::Prompt(format!("no scripted answer for '{prompt}'")))
    }
}

/// Print a numbered menu and loop until a valid choice is made.
pub fn choose<T: Copy>(
    prompter: &mut dyn Prompter,
    title: &str,
    choices: &[T],
    label: impl Fn(&T) -> &'static str,
) -> Result<T> {
    loop {
        println!("{title}");
        for (i, choice) in choices.iter().enumerate() {
            println!("{}. {}", i + 1, label(choice));
        }
        let answer = prompter.ask("Choose an option by number")?;
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= choices.len() => return Ok(choices[n - 1]),
            _ => println!("That's not a valid choice. Please choose again."),
        }
    }
}

/// Keep asking until `parse` accepts the answer.
pub fn ask_until<T>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    parse: impl Fn(&str) -> Option<T>,
    complaint: &str,
) -> Result<T> {
    loop {
        let answer = prompter.ask(prompt)?;
        if let Some(v) = parse(&answer) {
            return Ok(v);
        }
        println!("{complaint}");
    }
}
