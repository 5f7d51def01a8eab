//! LEDC PWM backend.
//!
//! Timer 0 / channel 0 in low-speed mode, one output GPIO.
//! Reference: ESP-IDF LEDC driver (`driver/ledc.h`)

use esp_idf_svc::sys::{self, esp, EspError};

use crate::config::GeneratorConfig;
use crate::generator::{GeneratorError, PwmOutput};

const MODE: sys::ledc_mode_t = sys::ledc_mode_t_LEDC_LOW_SPEED_MODE;
const TIMER: sys::ledc_timer_t = sys::ledc_timer_t_LEDC_TIMER_0;
const CHANNEL: sys::ledc_channel_t = sys::ledc_channel_t_LEDC_CHANNEL_0;

/// LEDC-driven PWM output
pub struct LedcPwm {
    max_duty: u32,
}

impl LedcPwm {
    /// Configure timer and channel. Output starts at 0 duty.
    pub fn new(config: &GeneratorConfig) -> Result<Self, EspError> {
        // clk_cfg left at 0 = LEDC_AUTO_CLK
        let timer = sys::ledc_timer_config_t {
            speed_mode: MODE,
            duty_resolution: config.duty_resolution_bits as _,
            timer_num: TIMER,
            freq_hz: config.default_frequency_hz,
            ..Default::default()
        };
        esp!(unsafe { sys::ledc_timer_config(&timer) })?;

        let channel = sys::ledc_channel_config_t {
            gpio_num: config.output_pin,
            speed_mode: MODE,
            channel: CHANNEL,
            intr_type: sys::ledc_intr_type_t_LEDC_INTR_DISABLE,
            timer_sel: TIMER,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        esp!(unsafe { sys::ledc_channel_config(&channel) })?;

        Ok(Self {
            max_duty: config.max_duty(),
        })
    }
}

impl PwmOutput for LedcPwm {
    fn set_frequency(&mut self, hz: u32) -> Result<(), GeneratorError> {
        // Fails when the source clock cannot divide down to hz at this resolution
        esp!(unsafe { sys::ledc_set_freq(MODE, TIMER, hz) })?;
        Ok(())
    }

    fn set_duty(&mut self, raw: u32) -> Result<(), GeneratorError> {
        esp!(unsafe { sys::ledc_set_duty(MODE, CHANNEL, raw) })?;
        esp!(unsafe { sys::ledc_update_duty(MODE, CHANNEL) })?;
        Ok(())
    }

    fn max_duty(&self) -> u32 {
        self.max_duty
    }
}
