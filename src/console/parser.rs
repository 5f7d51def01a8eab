//! Command line parser
//!
//! Maps one protocol line to a typed [`Command`]. Pure and stateless: no
//! hardware access, no allocation, safe to call from any context.
//!
//! Matching is case-sensitive. Numeric arguments follow C `strtoul(s, _, 0)`
//! literal rules (decimal, `0x` hex, leading-`0` octal, optional sign).

use super::error::{Field, ParseError};

/// Characters of a line considered by the parser; the rest is never read.
pub const MAX_LINE_LEN: usize = 63;

/// Lowest accepted frequency, Hz
pub const FREQ_MIN_HZ: u32 = 1;

/// Highest accepted frequency, Hz
pub const FREQ_MAX_HZ: u32 = 40_000_000;

/// Highest accepted duty cycle, percent
pub const DUTY_MAX_PERCENT: u8 = 100;

/// Validated protocol command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Blank line, no reply
    None,
    /// `FREQ <Hz>`, always within `FREQ_MIN_HZ..=FREQ_MAX_HZ`
    SetFrequency(u32),
    /// `DUTY <percent>`, always within `0..=DUTY_MAX_PERCENT`
    SetDutyCycle(u8),
    /// `ON` / `START`
    TurnOn,
    /// `OFF` / `STOP`
    TurnOff,
    /// `?` / `STATUS`
    QueryStatus,
    /// `VER?` / `ID?`
    Identify,
    /// `HELP`
    ShowHelp,
}

/// Result of parsing one line
pub type ParseOutcome = Result<Command, ParseError>;

/// Parse a command line
pub fn parse_line(line: &str) -> ParseOutcome {
    parse_bytes(line.as_bytes())
}

/// Parse a raw command line (may contain non-UTF-8 garbage from the wire)
pub fn parse_bytes(line: &[u8]) -> ParseOutcome {
    let line = trim(working_slice(line));

    if line.is_empty() {
        return Ok(Command::None);
    }

    match line {
        b"?" | b"STATUS" => return Ok(Command::QueryStatus),
        b"ON" | b"START" => return Ok(Command::TurnOn),
        b"OFF" | b"STOP" => return Ok(Command::TurnOff),
        b"HELP" => return Ok(Command::ShowHelp),
        b"VER?" | b"ID?" => return Ok(Command::Identify),
        _ => {}
    }

    if let Some(arg) = line.strip_prefix(b"FREQ ") {
        return match parse_argument(arg)? {
            Some(hz) if (FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&hz) => Ok(Command::SetFrequency(hz)),
            _ => Err(ParseError::ValueOutOfRange(Field::Frequency)),
        };
    }

    if let Some(arg) = line.strip_prefix(b"DUTY ") {
        return match parse_argument(arg)?.and_then(|v| u8::try_from(v).ok()) {
            Some(pct) if pct <= DUTY_MAX_PERCENT => Ok(Command::SetDutyCycle(pct)),
            _ => Err(ParseError::ValueOutOfRange(Field::DutyCycle)),
        };
    }

    Err(ParseError::UnrecognizedCommand)
}

/// Prefix up to the first line terminator, capped at `MAX_LINE_LEN`
fn working_slice(line: &[u8]) -> &[u8] {
    let line = &line[..line.len().min(MAX_LINE_LEN)];
    match line.iter().position(|&b| b == b'\r' || b == b'\n') {
        Some(end) => &line[..end],
        None => line,
    }
}

fn trim(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n' | b' '] = line {
        line = rest;
    }
    while let [b' ', rest @ ..] = line {
        line = rest;
    }
    line
}

/// Numeric argument of `FREQ`/`DUTY`.
///
/// `Ok(None)` is a well-formed literal whose value is not representable
/// (overflow, negative); callers report it as out of range.
fn parse_argument(arg: &[u8]) -> Result<Option<u32>, ParseError> {
    let (value, rest) = scan_unsigned(arg).ok_or(ParseError::UnrecognizedCommand)?;

    if rest.iter().any(|&b| b != b' ') {
        return Err(ParseError::UnrecognizedCommand);
    }

    Ok(value)
}

/// Scan an unsigned integer literal with automatic radix.
///
/// Returns `None` when no digits were found, otherwise the value (if it fits
/// in `u32`) and the unconsumed remainder.
fn scan_unsigned(input: &[u8]) -> Option<(Option<u32>, &[u8])> {
    let mut s = input;
    while let [b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r', rest @ ..] = s {
        s = rest;
    }

    let negative = match s {
        [b'-', rest @ ..] => {
            s = rest;
            true
        }
        [b'+', rest @ ..] => {
            s = rest;
            false
        }
        _ => false,
    };

    let (radix, digits) = match s {
        [b'0', b'x' | b'X', d, ..] if d.is_ascii_hexdigit() => (16, &s[2..]),
        [b'0', ..] => (8, s),
        _ => (10, s),
    };

    let len = digits
        .iter()
        .take_while(|&&b| char::from(b).is_digit(radix))
        .count();
    if len == 0 {
        return None;
    }

    let magnitude = digits[..len].iter().try_fold(0u32, |acc, &b| {
        let digit = char::from(b).to_digit(radix)?;
        acc.checked_mul(radix)?.checked_add(digit)
    });

    let value = match (negative, magnitude) {
        (true, Some(0)) => Some(0),
        (true, _) => None,
        (false, m) => m,
    };

    Some((value, &digits[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_decimal() {
        assert_eq!(scan_unsigned(b"1234 "), Some((Some(1234), &b" "[..])));
    }

    #[test]
    fn test_scan_hex_and_octal() {
        assert_eq!(scan_unsigned(b"0x1F"), Some((Some(31), &b""[..])));
        assert_eq!(scan_unsigned(b"0X1f"), Some((Some(31), &b""[..])));
        assert_eq!(scan_unsigned(b"017"), Some((Some(15), &b""[..])));
        assert_eq!(scan_unsigned(b"0"), Some((Some(0), &b""[..])));
    }

    #[test]
    fn test_scan_stops_at_invalid_digit() {
        // "0x" without hex digits parses the zero and leaves "x"
        assert_eq!(scan_unsigned(b"0xg"), Some((Some(0), &b"xg"[..])));
        assert_eq!(scan_unsigned(b"09"), Some((Some(0), &b"9"[..])));
        assert_eq!(scan_unsigned(b"12ab"), Some((Some(12), &b"ab"[..])));
    }

    #[test]
    fn test_scan_no_digits() {
        assert_eq!(scan_unsigned(b""), None);
        assert_eq!(scan_unsigned(b"abc"), None);
        assert_eq!(scan_unsigned(b"-"), None);
        assert_eq!(scan_unsigned(b"  +"), None);
    }

    #[test]
    fn test_scan_sign_and_overflow() {
        assert_eq!(scan_unsigned(b"+7"), Some((Some(7), &b""[..])));
        assert_eq!(scan_unsigned(b"-0"), Some((Some(0), &b""[..])));
        assert_eq!(scan_unsigned(b"-1"), Some((None, &b""[..])));
        assert_eq!(scan_unsigned(b"4294967295"), Some((Some(u32::MAX), &b""[..])));
        assert_eq!(scan_unsigned(b"4294967296"), Some((None, &b""[..])));
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(b"  ON \r\n \r"), b"ON");
        assert_eq!(trim(b" \r\n "), b"");
    }

    #[test]
    fn test_working_slice_stops_at_terminator() {
        assert_eq!(working_slice(b"ON\nOFF"), b"ON");
        assert_eq!(working_slice(b"OFF\rON"), b"OFF");
    }
}
