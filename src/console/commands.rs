//! Command dispatch
//!
//! Applies a parse outcome to the generator and writes the protocol reply.
//! Every reply line ends with `\r\n`.

use core::fmt::Write;

use super::error::{ConsoleError, Field, ParseError};
use super::parser::{Command, ParseOutcome, DUTY_MAX_PERCENT, FREQ_MAX_HZ, FREQ_MIN_HZ};
use crate::config::{FIRMWARE_ID, FIRMWARE_VERSION};
use crate::generator::{GeneratorError, SignalGenerator};

/// Help table entry
pub struct CommandDescriptor {
    pub usage: &'static str,
    pub brief: &'static str,
}

/// All protocol commands, in help order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { usage: "FREQ <Hz>", brief: "frequency 1..40000000" },
    CommandDescriptor { usage: "DUTY <0-100>", brief: "duty cycle %" },
    CommandDescriptor { usage: "ON|START", brief: "enable output" },
    CommandDescriptor { usage: "OFF|STOP", brief: "disable output" },
    CommandDescriptor { usage: "?|STATUS", brief: "status" },
    CommandDescriptor { usage: "VER?|ID?", brief: "identification (UART-GEN,version)" },
    CommandDescriptor { usage: "HELP", brief: "this help" },
];

/// Reply for an unrecognized line
pub const UNKNOWN_COMMAND_REPLY: &str = "ERR unknown command (HELP)\r\n";

/// Execute a parse outcome against the generator
///
/// The reply is always written before returning; `Err` only reports what
/// went wrong for logging.
pub fn execute<G>(outcome: ParseOutcome, generator: &mut G, out: &mut dyn Write) -> Result<(), ConsoleError>
where
    G: SignalGenerator + ?Sized,
{
    let command = match outcome {
        Ok(command) => command,
        Err(e) => {
            write_parse_error(e, out);
            return Err(e.into());
        }
    };

    match command {
        Command::None => {}
        Command::QueryStatus => {
            let _ = write!(
                out,
                "FREQ={} DUTY={} {}\r\n",
                generator.frequency(),
                generator.duty(),
                if generator.is_running() { "ON" } else { "OFF" }
            );
        }
        Command::TurnOn => {
            generator.start();
            let _ = out.write_str("OK ON\r\n");
        }
        Command::TurnOff => {
            generator.stop();
            let _ = out.write_str("OK OFF\r\n");
        }
        Command::SetFrequency(hz) => {
            if let Err(e) = generator.set_frequency(hz) {
                return Err(write_generator_error(Field::Frequency, e, out));
            }
            let _ = write!(out, "OK FREQ {}\r\n", hz);
        }
        Command::SetDutyCycle(pct) => {
            if let Err(e) = generator.set_duty(pct) {
                return Err(write_generator_error(Field::DutyCycle, e, out));
            }
            let _ = write!(out, "OK DUTY {}\r\n", pct);
        }
        Command::Identify => {
            let _ = write!(out, "{},{}\r\n", FIRMWARE_ID, FIRMWARE_VERSION);
        }
        Command::ShowHelp => write_help(out),
    }

    Ok(())
}

fn write_parse_error(e: ParseError, out: &mut dyn Write) {
    let _ = match e {
        ParseError::UnrecognizedCommand => out.write_str(UNKNOWN_COMMAND_REPLY),
        ParseError::ValueOutOfRange(field @ Field::Frequency) => {
            write!(out, "ERR {} range {}..{}\r\n", field.keyword(), FREQ_MIN_HZ, FREQ_MAX_HZ)
        }
        ParseError::ValueOutOfRange(field @ Field::DutyCycle) => {
            write!(out, "ERR {} 0..{}\r\n", field.keyword(), DUTY_MAX_PERCENT)
        }
    };
}

fn write_generator_error(field: Field, e: GeneratorError, out: &mut dyn Write) -> ConsoleError {
    let _ = write!(out, "ERR {}\r\n", field.keyword());
    ConsoleError::Generator(field, e)
}

fn write_help(out: &mut dyn Write) {
    for c in COMMANDS {
        let _ = write!(out, "{:<12} - {}\r\n", c.usage, c.brief);
    }
}
