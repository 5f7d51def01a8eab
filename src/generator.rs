//! PWM signal generator state.
//!
//! [`Generator`] owns frequency, duty cycle and run flag and pushes them to a
//! [`PwmOutput`] backend. The backend is pure I/O (LEDC on target, a
//! simulation on host); all rules about what reaches the pin live here.
//!
//! The dispatcher only sees the [`SignalGenerator`] capability trait.

use crate::config::GeneratorConfig;
use crate::console::parser::{DUTY_MAX_PERCENT, FREQ_MAX_HZ, FREQ_MIN_HZ};

/// Generator failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorError {
    /// Value outside what the generator accepts
    OutOfRange,
    /// Peripheral rejected the configuration (ESP-IDF error code)
    Hardware(i32),
}

impl core::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange => f.write_str("out of range"),
            Self::Hardware(code) => write!(f, "hardware error {}", code),
        }
    }
}

#[cfg(target_os = "espidf")]
impl From<esp_idf_svc::sys::EspError> for GeneratorError {
    fn from(e: esp_idf_svc::sys::EspError) -> Self {
        GeneratorError::Hardware(e.code())
    }
}

/// Control surface used by the command dispatcher.
pub trait SignalGenerator {
    /// Set output frequency in Hz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), GeneratorError>;
    /// Set duty cycle in percent (0-100).
    fn set_duty(&mut self, percent: u8) -> Result<(), GeneratorError>;
    /// Enable output.
    fn start(&mut self);
    /// Disable output (pin held low).
    fn stop(&mut self);
    /// Whether output is enabled.
    fn is_running(&self) -> bool;
    /// Current frequency, Hz.
    fn frequency(&self) -> u32;
    /// Current duty cycle, percent.
    fn duty(&self) -> u8;
}

/// Raw PWM peripheral access.
pub trait PwmOutput {
    /// Reprogram the timer frequency.
    fn set_frequency(&mut self, hz: u32) -> Result<(), GeneratorError>;
    /// Write a raw compare value in `0..=max_duty()`.
    fn set_duty(&mut self, raw: u32) -> Result<(), GeneratorError>;
    /// Largest raw compare value.
    fn max_duty(&self) -> u32;
}

/// Convert a duty percentage to a raw compare value.
///
/// `percent * (max + 1) / 100`, clamped to `max`.
pub fn duty_to_raw(percent: u8, max_duty: u32) -> u32 {
    let raw = percent as u64 * (max_duty as u64 + 1) / 100;
    raw.min(max_duty as u64) as u32
}

/// Signal generator bound to a PWM backend.
pub struct Generator<P: PwmOutput> {
    output: P,
    frequency_hz: u32,
    duty_percent: u8,
    running: bool,
}

impl<P: PwmOutput> Generator<P> {
    /// Program defaults into the backend. Output starts stopped.
    pub fn new(output: P, config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        if !(FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&config.default_frequency_hz)
            || config.default_duty_percent > DUTY_MAX_PERCENT
        {
            return Err(GeneratorError::OutOfRange);
        }

        let mut generator = Self {
            output,
            frequency_hz: config.default_frequency_hz,
            duty_percent: config.default_duty_percent,
            running: false,
        };

        generator.output.set_frequency(generator.frequency_hz)?;
        generator.apply_output()?;
        Ok(generator)
    }

    /// Backend access (diagnostics and tests).
    pub fn output(&self) -> &P {
        &self.output
    }

    /// Mutable backend access (fault injection in tests).
    pub fn output_mut(&mut self) -> &mut P {
        &mut self.output
    }

    fn apply_output(&mut self) -> Result<(), GeneratorError> {
        self.write_duty(self.duty_percent)
    }

    fn write_duty(&mut self, percent: u8) -> Result<(), GeneratorError> {
        let raw = if self.running {
            duty_to_raw(percent, self.output.max_duty())
        } else {
            0
        };
        self.output.set_duty(raw)
    }
}

impl<P: PwmOutput> SignalGenerator for Generator<P> {
    fn set_frequency(&mut self, hz: u32) -> Result<(), GeneratorError> {
        if !(FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&hz) {
            return Err(GeneratorError::OutOfRange);
        }

        // State only follows a frequency the timer accepted
        self.output.set_frequency(hz)?;
        self.frequency_hz = hz;
        Ok(())
    }

    fn set_duty(&mut self, percent: u8) -> Result<(), GeneratorError> {
        if percent > DUTY_MAX_PERCENT {
            return Err(GeneratorError::OutOfRange);
        }

        // Same rule as frequency: keep the old value if the write fails
        self.write_duty(percent)?;
        self.duty_percent = percent;
        Ok(())
    }

    fn start(&mut self) {
        self.running = true;
        // Run flag is authoritative; the next apply retries a failed write
        let _ = self.apply_output();
    }

    fn stop(&mut self) {
        self.running = false;
        let _ = self.apply_output();
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn frequency(&self) -> u32 {
        self.frequency_hz
    }

    fn duty(&self) -> u8 {
        self.duty_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duty_to_raw_10_bit() {
        assert_eq!(duty_to_raw(0, 1023), 0);
        assert_eq!(duty_to_raw(50, 1023), 512);
        assert_eq!(duty_to_raw(100, 1023), 1023); // clamped from 1024
    }

    #[test]
    fn test_duty_to_raw_wide_timer() {
        assert_eq!(duty_to_raw(100, u32::MAX), u32::MAX);
        assert_eq!(duty_to_raw(25, 65535), 16384);
    }
}
