//! # UartPwmGenerator
//!
//! PWM signal generator controlled by a line-oriented text protocol over UART.
//!
//! ## Architecture
//!
//! ```text
//! UART0 RX ─▶ Console ─▶ parse_bytes ─▶ execute ─▶ SignalGenerator ─▶ PwmOutput
//!             (lines)    (pure)         (reply)    (state owner)      (LEDC / sim)
//! ```
//!
//! - The parser is a pure function, fully testable on host
//! - Generator state lives in one [`Generator`] owned by the main loop
//! - Hardware code is gated on `target_os = "espidf"`

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod generator;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod uart_logger;

pub use config::{GeneratorConfig, SerialConfig};
pub use console::{parse_line, Command, Console, ParseError};
pub use generator::{Generator, GeneratorError, PwmOutput, SignalGenerator};
pub use log_globals::LOG_STREAM;
