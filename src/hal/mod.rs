//! Hardware Abstraction Layer for the generator firmware.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.

#[cfg(target_os = "espidf")]
pub mod ledc;
#[cfg(target_os = "espidf")]
pub mod serial;
pub mod sim;

#[cfg(target_os = "espidf")]
pub use ledc::LedcPwm;
#[cfg(target_os = "espidf")]
pub use serial::{init_command_uart, UartWriter};
pub use sim::SimulatedPwm;
