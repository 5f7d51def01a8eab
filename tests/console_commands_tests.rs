//! Dispatcher tests: parse outcome -> generator call -> reply line

use uart_pwm_generator::config::GeneratorConfig;
use uart_pwm_generator::console::commands::{execute, COMMANDS, UNKNOWN_COMMAND_REPLY};
use uart_pwm_generator::console::error::{ConsoleError, Field, ParseError};
use uart_pwm_generator::console::parser::parse_line;
use uart_pwm_generator::generator::{Generator, GeneratorError, SignalGenerator};
use uart_pwm_generator::hal::sim::{SimulatedPwm, ERR_INVALID_ARG};

fn generator() -> Generator<SimulatedPwm> {
    let config = GeneratorConfig::default();
    Generator::new(SimulatedPwm::new(&config), &config).unwrap()
}

/// Run one line, return (result, reply)
fn run(gen: &mut Generator<SimulatedPwm>, line: &str) -> (Result<(), ConsoleError>, String) {
    let mut out = String::new();
    let result = execute(parse_line(line), gen, &mut out);
    (result, out)
}

#[test]
fn test_blank_line_no_reply() {
    let mut gen = generator();
    let (result, out) = run(&mut gen, "   ");

    assert_eq!(result, Ok(()));
    assert!(out.is_empty());
}

#[test]
fn test_status_reply() {
    let mut gen = generator();

    let (_, out) = run(&mut gen, "?");
    assert_eq!(out, "FREQ=1000 DUTY=50 OFF\r\n");

    gen.start();
    let (_, out) = run(&mut gen, "STATUS");
    assert_eq!(out, "FREQ=1000 DUTY=50 ON\r\n");
}

#[test]
fn test_on_off() {
    let mut gen = generator();

    let (result, out) = run(&mut gen, "ON");
    assert_eq!(result, Ok(()));
    assert_eq!(out, "OK ON\r\n");
    assert!(gen.is_running());

    let (_, out) = run(&mut gen, "STOP");
    assert_eq!(out, "OK OFF\r\n");
    assert!(!gen.is_running());

    let (_, out) = run(&mut gen, "START");
    assert_eq!(out, "OK ON\r\n");
    let (_, out) = run(&mut gen, "OFF");
    assert_eq!(out, "OK OFF\r\n");
}

#[test]
fn test_set_frequency_reply() {
    let mut gen = generator();

    let (result, out) = run(&mut gen, "FREQ 5000");
    assert_eq!(result, Ok(()));
    assert_eq!(out, "OK FREQ 5000\r\n");
    assert_eq!(gen.frequency(), 5000);

    // Reply shows the applied value, not the literal
    let (_, out) = run(&mut gen, "FREQ 0x10");
    assert_eq!(out, "OK FREQ 16\r\n");
}

#[test]
fn test_set_duty_reply() {
    let mut gen = generator();

    let (result, out) = run(&mut gen, "DUTY 30");
    assert_eq!(result, Ok(()));
    assert_eq!(out, "OK DUTY 30\r\n");
    assert_eq!(gen.duty(), 30);
}

#[test]
fn test_frequency_out_of_range_reply() {
    let mut gen = generator();

    let (result, out) = run(&mut gen, "FREQ 0");
    assert_eq!(result, Err(ConsoleError::Parse(ParseError::ValueOutOfRange(Field::Frequency))));
    assert_eq!(out, "ERR FREQ range 1..40000000\r\n");
    assert_eq!(gen.frequency(), 1000);
}

#[test]
fn test_duty_out_of_range_reply() {
    let mut gen = generator();

    let (result, out) = run(&mut gen, "DUTY 255");
    assert_eq!(result, Err(ConsoleError::Parse(ParseError::ValueOutOfRange(Field::DutyCycle))));
    assert_eq!(out, "ERR DUTY 0..100\r\n");
    assert_eq!(gen.duty(), 50);
}

#[test]
fn test_unknown_command_reply() {
    let mut gen = generator();

    for line in ["foobar", "freq 1000", "FREQ", "FREQ 1000 2000"] {
        let (result, out) = run(&mut gen, line);
        assert_eq!(result, Err(ConsoleError::Parse(ParseError::UnrecognizedCommand)));
        assert_eq!(out, UNKNOWN_COMMAND_REPLY);
    }
    assert_eq!(UNKNOWN_COMMAND_REPLY, "ERR unknown command (HELP)\r\n");
}

#[test]
fn test_hardware_frequency_failure_reply() {
    let config = GeneratorConfig::default();
    let pwm = SimulatedPwm::new(&config).with_frequency_limit(1_000_000);
    let mut gen = Generator::new(pwm, &config).unwrap();

    let (result, out) = run(&mut gen, "FREQ 2000000");
    assert_eq!(
        result,
        Err(ConsoleError::Generator(Field::Frequency, GeneratorError::Hardware(ERR_INVALID_ARG)))
    );
    assert_eq!(out, "ERR FREQ\r\n");
    assert_eq!(gen.frequency(), 1000);
}

#[test]
fn test_hardware_duty_failure_reply() {
    let mut gen = generator();
    gen.output_mut().set_duty_fault(true);

    let (result, out) = run(&mut gen, "DUTY 10");
    assert!(matches!(result, Err(ConsoleError::Generator(Field::DutyCycle, _))));
    assert_eq!(out, "ERR DUTY\r\n");

    // Status still reports the duty the backend accepted
    assert_eq!(run(&mut gen, "?").1, "FREQ=1000 DUTY=50 OFF\r\n");
}

#[test]
fn test_help_lists_every_command() {
    let mut gen = generator();
    let (result, out) = run(&mut gen, "HELP");

    assert_eq!(result, Ok(()));
    assert_eq!(out.lines().count(), COMMANDS.len());
    for c in COMMANDS {
        assert!(out.contains(c.usage), "help should mention '{}'", c.usage);
    }
    assert!(out.split_terminator('\n').all(|l| l.ends_with('\r')));
    assert!(out.contains("FREQ <Hz>"));
    assert!(out.contains("1..40000000"));
}

#[test]
fn test_identify_reply() {
    let mut gen = generator();
    let (_, out) = run(&mut gen, "VER?");

    assert_eq!(out, "UART-GEN,1.0\r\n");
    assert_eq!(run(&mut gen, "ID?").1, out);
}

#[test]
fn test_field_keywords_prefix_errors() {
    assert_eq!(Field::Frequency.keyword(), "FREQ");
    assert_eq!(Field::DutyCycle.keyword(), "DUTY");

    let mut gen = generator();
    for (line, field) in [("FREQ 0", Field::Frequency), ("DUTY 101", Field::DutyCycle)] {
        let (_, out) = run(&mut gen, line);
        assert!(out.starts_with(&format!("ERR {} ", field.keyword())), "reply {:?}", out);
    }
}

#[test]
fn test_error_codes() {
    assert_eq!(ConsoleError::Parse(ParseError::UnrecognizedCommand).code(), "E01");
    assert_eq!(ConsoleError::Parse(ParseError::ValueOutOfRange(Field::DutyCycle)).code(), "E02");

    let e = ConsoleError::Generator(Field::Frequency, GeneratorError::Hardware(258));
    assert_eq!(e.code(), "E03");
    assert_eq!(e.to_string(), "E03: frequency rejected by generator (hardware error 258)");
}
