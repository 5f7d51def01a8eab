//! Simulated PWM backend.
//!
//! Used by the host build of the firmware and by tests. Records what the
//! peripheral would have been programmed with.

use crate::config::GeneratorConfig;
use crate::generator::{GeneratorError, PwmOutput};

/// `ESP_ERR_INVALID_ARG`, what LEDC returns for an unreachable frequency.
pub const ERR_INVALID_ARG: i32 = 0x102;

/// `ESP_FAIL`
pub const ERR_FAIL: i32 = -1;

/// In-memory PWM peripheral
#[derive(Debug, Clone)]
pub struct SimulatedPwm {
    max_duty: u32,
    frequency_hz: u32,
    raw_duty: u32,
    frequency_limit_hz: Option<u32>,
    duty_fault: bool,
    duty_writes: u32,
}

impl SimulatedPwm {
    /// Create simulated peripheral with the configured resolution
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            max_duty: config.max_duty(),
            frequency_hz: 0,
            raw_duty: 0,
            frequency_limit_hz: None,
            duty_fault: false,
            duty_writes: 0,
        }
    }

    /// Reject frequencies above `hz`, like a timer that cannot divide further
    pub fn with_frequency_limit(mut self, hz: u32) -> Self {
        self.frequency_limit_hz = Some(hz);
        self
    }

    /// Make duty writes fail (or succeed again)
    pub fn set_duty_fault(&mut self, fault: bool) {
        self.duty_fault = fault;
    }

    /// Last accepted frequency, Hz
    pub fn frequency(&self) -> u32 {
        self.frequency_hz
    }

    /// Last accepted raw duty value
    pub fn raw_duty(&self) -> u32 {
        self.raw_duty
    }

    /// Number of accepted duty writes
    pub fn duty_writes(&self) -> u32 {
        self.duty_writes
    }
}

impl PwmOutput for SimulatedPwm {
    fn set_frequency(&mut self, hz: u32) -> Result<(), GeneratorError> {
        if self.frequency_limit_hz.is_some_and(|limit| hz > limit) {
            return Err(GeneratorError::Hardware(ERR_INVALID_ARG));
        }
        self.frequency_hz = hz;
        Ok(())
    }

    fn set_duty(&mut self, raw: u32) -> Result<(), GeneratorError> {
        if self.duty_fault {
            return Err(GeneratorError::Hardware(ERR_FAIL));
        }
        if raw > self.max_duty {
            return Err(GeneratorError::Hardware(ERR_INVALID_ARG));
        }
        self.raw_duty = raw;
        self.duty_writes += 1;
        Ok(())
    }

    fn max_duty(&self) -> u32 {
        self.max_duty
    }
}
