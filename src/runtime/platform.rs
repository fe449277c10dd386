use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Terminal I/O used by built-in modules. Swapping the implementation lets
/// hosts and tests capture output and script input.
pub trait Platform {
    fn write(&self, text: &str) -> Result<(), String>;
    /// Reads one line without its terminator. `Ok(None)` signals end of input.
    fn read_line(&self) -> Result<Option<String>, String>;
}

pub struct StdPlatform;

impl Platform for StdPlatform {
    fn write(&self, text: &str) -> Result<(), String> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|err| err.to_string())
    }

    fn read_line(&self) -> Result<Option<String>, String> {
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(line)))
    }
}

/// In-memory platform: output accumulates in a buffer and input is served
/// from a queue of lines.
#[derive(Default)]
pub struct BufferPlatform {
    output: RefCell<String>,
    input: RefCell<VecDeque<String>>,
}

impl BufferPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: RefCell::new(String::new()),
            input: RefCell::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }
}

impl Platform for BufferPlatform {
    fn write(&self, text: &str) -> Result<(), String> {
        self.output.borrow_mut().push_str(text);
        Ok(())
    }

    fn read_line(&self) -> Result<Option<String>, String> {
        Ok(self.input.borrow_mut().pop_front())
    }
}

fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
