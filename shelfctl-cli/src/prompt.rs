//! Prompting abstraction for the interactive flows.
//!
//! Flows take a `Prompter` instead of reading the terminal directly, so the
//! confirm/modify logic is testable without a TTY. The real implementation
//! is backed by `inquire`; tests use a scripted one.

use anyhow::Result;
use inquire::{Confirm, Text};

/// Injected input source for the menu flows.
pub trait Prompter {
    /// Ask a yes/no question, defaulting to no.
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Read one line of input.
    fn line(&mut self, message: &str) -> Result<String>;

    /// Read one line, falling back to `current` on blank input.
    fn line_with_default(&mut self, message: &str, current: &str) -> Result<String>;
}

/// Terminal-backed prompter.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Ok(Confirm::new(message).with_default(false).prompt()?)
    }

    fn line(&mut self, message: &str) -> Result<String> {
        Ok(Text::new(message).prompt()?)
    }

    fn line_with_default(&mut self, message: &str, current: &str) -> Result<String> {
        Ok(Text::new(message).with_default(current).prompt()?)
    }
}

/// Scripted prompter for flow tests: pops pre-seeded answers in order.
#[cfg(test)]
pub struct ScriptedPrompter {
    lines: std::collections::VecDeque<String>,
    confirms: std::collections::VecDeque<bool>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(lines: &[&str], confirms: &[bool]) -> Self {
        Self {
            lines: lines.iter().map(|s| (*s).to_owned()).collect(),
            confirms: confirms.iter().copied().collect(),
        }
    }

    /// Answers left unconsumed by the flow under test.
    pub fn remaining_confirms(&self) -> usize {
        self.confirms.len()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _message: &str) -> Result<bool> {
        self.confirms
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("confirm script exhausted"))
    }

    fn line(&mut self, _message: &str) -> Result<String> {
        self.lines
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("line script exhausted"))
    }

    fn line_with_default(&mut self, _message: &str, current: &str) -> Result<String> {
        let input = self
            .lines
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("line script exhausted"))?;
        if input.is_empty() {
            Ok(current.to_owned())
        } else {
            Ok(input)
        }
    }
}
