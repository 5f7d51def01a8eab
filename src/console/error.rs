//! Console error types

use crate::generator::GeneratorError;

/// Numeric field of a protocol command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `FREQ <Hz>`
    Frequency,
    /// `DUTY <0-100>`
    DutyCycle,
}

impl Field {
    /// Protocol keyword for this field
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Frequency => "FREQ",
            Self::DutyCycle => "DUTY",
        }
    }
}

/// Classified parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not match any known command
    UnrecognizedCommand,
    /// Numeric command with a value outside the field's bounds
    ValueOutOfRange(Field),
}

impl ParseError {
    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnrecognizedCommand => "unknown command",
            Self::ValueOutOfRange(Field::Frequency) => "frequency out of range",
            Self::ValueOutOfRange(Field::DutyCycle) => "duty cycle out of range",
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Failure reported by the dispatcher after the reply was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01/E02: line rejected by the parser
    Parse(ParseError),
    /// E03: generator refused a validated value
    Generator(Field, GeneratorError),
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(ParseError::UnrecognizedCommand) => "E01",
            Self::Parse(ParseError::ValueOutOfRange(_)) => "E02",
            Self::Generator(..) => "E03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.message(),
            Self::Generator(Field::Frequency, _) => "frequency rejected by generator",
            Self::Generator(Field::DutyCycle, _) => "duty cycle rejected by generator",
        }
    }
}

impl From<ParseError> for ConsoleError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Generator(_, cause) => write!(f, "{}: {} ({})", self.code(), self.message(), cause),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}
