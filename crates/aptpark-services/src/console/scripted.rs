//! Scripted console for tests and demos.

use super::Console;
use std::collections::VecDeque;

/// Console that answers prompts from a fixed queue of input lines and
/// records everything written.
///
/// # Examples
///
/// ```
/// use aptpark_services::console::{Console, ScriptedConsole};
///
/// let mut console = ScriptedConsole::new(["amit", "shah"]);
///
/// assert_eq!(console.read_line("First Name: ").as_deref(), Some("amit"));
/// console.say("Hello");
///
/// assert!(console.output_contains("Hello"));
/// assert_eq!(console.remaining(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    /// Lines still to be answered
    inputs: VecDeque<String>,

    /// Everything printed to stdout, prompts included
    output: Vec<String>,

    /// Everything printed to stderr
    errors: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Queue more input lines after the current ones.
    pub fn push_inputs<I, S>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(inputs.into_iter().map(Into::into));
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Whether any stdout line contains `needle`.
    pub fn output_contains(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn warn(&mut self, line: &str) {
        self.errors.push(line.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.output.push(prompt.to_string());
        self.inputs.pop_front()
    }
}
