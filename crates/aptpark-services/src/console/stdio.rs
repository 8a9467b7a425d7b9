use super::Console;
use std::io::{self, BufRead, Write};

/// Console bound to the process's stdin, stdout and stderr.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn warn(&mut self, line: &str) {
        eprintln!("{line}");
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        // A prompt that fails to flush still accepts input
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\r', '\n']).len();
                line.truncate(trimmed);
                Some(line)
            }
        }
    }
}
