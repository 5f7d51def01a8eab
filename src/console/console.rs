//! Main console struct integrating all components

use core::fmt::Write;
use super::{execute, parse_bytes, ConsoleError, LineBuffer};
use crate::generator::SignalGenerator;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Line reception state machine
///
/// Feeds bytes into a [`LineBuffer`]; a line ends at `\r`, `\n`, or when the
/// buffer is full. No echo, no editing: the peer is a program.
pub struct Console {
    line: LineBuffer,
}

impl Console {
    /// Create new console
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) if a line was dispatched, None if more input needed.
    pub fn process_byte<G>(
        &mut self,
        byte: u8,
        generator: &mut G,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>>
    where
        G: SignalGenerator + ?Sized,
    {
        match byte {
            b'\r' | b'\n' => self.dispatch_line(generator, out),

            // Line too long: process what we have, byte starts the next line
            _ if self.line.is_full() => {
                let result = self.dispatch_line(generator, out);
                self.line.push(byte);
                result
            }

            _ => {
                self.line.push(byte);
                None
            }
        }
    }

    fn dispatch_line<G>(&mut self, generator: &mut G, out: &mut dyn Write) -> Option<Result<(), ConsoleError>>
    where
        G: SignalGenerator + ?Sized,
    {
        if self.line.is_empty() {
            return None;
        }

        let outcome = parse_bytes(self.line.as_bytes());
        self.line.clear();
        Some(execute(outcome, generator, out))
    }

    /// Bytes of the line currently being assembled
    pub fn pending(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Print welcome banner
    pub fn print_banner(&self, out: &mut dyn Write) {
        let _ = write!(out, "\r\n{}. Commands: FREQ, DUTY, ON, OFF, ?, HELP\r\n", VERSION);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
