//! Module: config
//!
//! Purpose: Compile-time configuration for the generator firmware.
//!
//! There is no runtime configuration source: no NVS, no files, no
//! environment. Every hardware binding takes one of these structs so the
//! defaults live in a single place.

/// Identification reported by `VER?` / `ID?`.
pub const FIRMWARE_ID: &str = "UART-GEN";

/// Protocol version reported by `VER?` / `ID?`.
///
/// Host tools match on this reply, so it does not follow the crate version.
pub const FIRMWARE_VERSION: &str = "1.0";

/// PWM generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// GPIO driving the PWM signal
    pub output_pin: i32,
    /// LEDC duty resolution in bits (max raw duty = 2^bits - 1)
    pub duty_resolution_bits: u32,
    /// Frequency programmed at startup, Hz
    pub default_frequency_hz: u32,
    /// Duty cycle applied on first `ON`, percent
    pub default_duty_percent: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_pin: 5,
            duty_resolution_bits: 10,
            default_frequency_hz: 1000,
            default_duty_percent: 50,
        }
    }
}

impl GeneratorConfig {
    /// Largest raw duty value for the configured resolution.
    pub fn max_duty(&self) -> u32 {
        match self.duty_resolution_bits {
            0 => 0,
            bits if bits >= 32 => u32::MAX,
            bits => (1u32 << bits) - 1,
        }
    }
}

/// Command UART configuration.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// Receive call timeout before the loop goes idle
    pub rx_timeout_ms: u32,
    /// Delay after an empty receive, yields the CPU to the idle task
    pub idle_delay_ms: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            rx_timeout_ms: 50,
            idle_delay_ms: 10,
        }
    }
}
