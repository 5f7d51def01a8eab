//! Log output.
//!
//! Drains [`LogStream`] entries as text lines. On target the lines go to a
//! TX-only UART1 so they never interleave with protocol replies on UART0;
//! the host build writes them to stderr.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 GPIO4 (UART1 TX) ──────▶ USB-UART RX
//!                                 └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::logging::{BufWriter, LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Interval between dropped-message reports, µs.
pub const DROP_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
///
/// The TX pin is chosen by the caller (GPIO4 in the firmware).
pub struct UartLoggerConfig {
    pub baud_rate: u32,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

/// Format log entry to string.
///
/// Format: `[timestamp_us] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);

    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );

    writer.len()
}

/// Moves log entries from a stream to an output sink.
pub struct LogDrain {
    last_dropped_report: i64,
}

impl LogDrain {
    pub const fn new() -> Self {
        Self { last_dropped_report: 0 }
    }

    /// Write every pending entry to `sink`, plus a drop report when due.
    ///
    /// Returns the number of entries written.
    pub fn drain<const N: usize>(
        &mut self,
        stream: &LogStream<N>,
        now_us: i64,
        mut sink: impl FnMut(&[u8]),
    ) -> usize {
        let mut format_buf = [0u8; 160];
        let mut count = 0;

        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut format_buf);
            sink(&format_buf[..len]);
            count += 1;
        }

        if now_us - self.last_dropped_report > DROP_REPORT_INTERVAL_US {
            let dropped = stream.dropped();
            if dropped > 0 {
                let mut w = BufWriter::new(&mut format_buf);
                let _ = write!(w, "[WARN] Dropped: {}\r\n", dropped);
                let len = w.len();
                sink(&format_buf[..len]);
                stream.reset_dropped();
            }
            self.last_dropped_report = now_us;
        }

        count
    }
}

impl Default for LogDrain {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize UART1 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None,  // CTS
        Option::<gpio::AnyIOPin>::None,  // RTS
        &uart_config,
    )
}
