//! Operator input - reads selections and registration numbers

use crate::domain::error::InputError;
use parking_lot::Mutex;
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use tracing::{debug, warn};

/// Selection returned when the operator types something that is not a number
pub const INVALID_SELECTION: i32 = -1;

/// Source of operator input
pub trait InputSource: Send + Sync {
    /// Show a message before the next read
    fn prompt(&self, _message: &str) {}

    /// Read a numeric menu selection
    fn read_selection(&self) -> Result<i32, InputError>;

    /// Read a vehicle registration number
    fn read_vehicle_registration_number(&self) -> Result<String, InputError>;
}

/// Line-based reader over any buffered input, prompting on `out`
pub struct ConsoleInput<R, W> {
    reader: Mutex<R>,
    out: Mutex<W>,
}

impl ConsoleInput<BufReader<Stdin>, Stdout> {
    /// Console bound to the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> ConsoleInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader: Mutex::new(reader), out: Mutex::new(out) }
    }

    /// Read one line with the trailing newline and surrounding spaces removed
    fn read_line(&self) -> Result<String, InputError> {
        let mut line = String::new();
        let n = self.reader.lock().read_line(&mut line)?;
        if n == 0 {
            return Err(InputError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Consume the console and return the prompt sink
    pub fn into_output(self) -> W {
        self.out.into_inner()
    }
}

impl<R: BufRead + Send, W: Write + Send> InputSource for ConsoleInput<R, W> {
    fn prompt(&self, message: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
            warn!(error = %e, "prompt_write_failed");
        }
    }

    fn read_selection(&self) -> Result<i32, InputError> {
        let line = self.read_line()?;
        match line.parse::<i32>() {
            Ok(selection) => Ok(selection),
            Err(_) => {
                debug!(input = %line, "selection_not_a_number");
                Ok(INVALID_SELECTION)
            }
        }
    }

    fn read_vehicle_registration_number(&self) -> Result<String, InputError> {
        let line = self.read_line()?;
        if line.is_empty() {
            return Err(InputError::EmptyRegistration);
        }
        Ok(line)
    }
}
