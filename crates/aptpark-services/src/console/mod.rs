//! Line-oriented operator console.
//!
//! Services talk to the operator only through [`Console`], so interactive
//! flows run unchanged against the terminal ([`StdConsole`]) and against a
//! scripted input queue in tests ([`ScriptedConsole`]).

mod scripted;
mod stdio;

pub use scripted::ScriptedConsole;
pub use stdio::StdConsole;

/// Operator I/O.
pub trait Console {
    /// Print one line to standard output.
    fn say(&mut self, line: &str);

    /// Print one line to standard error.
    fn warn(&mut self, line: &str);

    /// Show `prompt` without a newline and read one line.
    ///
    /// Returns `None` once input is exhausted. The trailing newline is
    /// stripped; other whitespace is left to the caller.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}
