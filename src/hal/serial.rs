//! Command UART.
//!
//! UART0 at 115200 8N1, shared with the boot ROM console.

use esp_idf_svc::hal::delay::TickType;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use crate::config::SerialConfig;

/// Initialize UART0 for the command protocol.
pub fn init_command_uart<'d>(
    uart: impl Peripheral<P = uart::UART0> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    config: &SerialConfig,
) -> Result<UartDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(Hertz(config.baud_rate));

    UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<gpio::AnyIOPin>::None,  // CTS
        Option::<gpio::AnyIOPin>::None,  // RTS
        &uart_config,
    )
}

/// Receive timeout in FreeRTOS ticks.
pub fn rx_timeout_ticks(config: &SerialConfig) -> u32 {
    TickType::new_millis(config.rx_timeout_ms as u64).ticks()
}

/// `fmt::Write` adapter over the command UART (replies).
pub struct UartWriter<'a, 'd>(pub &'a UartDriver<'d>);

impl core::fmt::Write for UartWriter<'_, '_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            match self.0.write(bytes) {
                Ok(0) | Err(_) => return Err(core::fmt::Error),
                Ok(n) => bytes = &bytes[n..],
            }
        }
        Ok(())
    }
}
