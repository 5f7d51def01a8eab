//! Serial command console
//!
//! Line-oriented text protocol: bytes in, one reply line (or a help block)
//! out per command. Zero heap allocation - all static buffers.

pub mod commands;
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, CommandDescriptor, COMMANDS};
pub use console::Console;
pub use error::{ConsoleError, Field, ParseError};
pub use line_buffer::LineBuffer;
pub use parser::{parse_bytes, parse_line, Command, ParseOutcome};
