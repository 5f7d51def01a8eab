//! UartPwmGenerator - Main entry point
//!
//! On target:
//! 1. Initialize log UART (UART1), command UART (UART0) and LEDC
//! 2. Print banner
//! 3. Read bytes with a short timeout, dispatch complete lines
//! 4. Drain logs whenever the receiver is idle
//!
//! On host the same console runs over stdin/stdout with a simulated PWM
//! backend, which is handy for exercising the protocol without a board.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{delay::FreeRtos, peripherals::Peripherals, uart::UartTxDriver};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as esp_idf_sys;
#[cfg(target_os = "espidf")]
use uart_pwm_generator::{
    console::console::VERSION,
    hal::{init_command_uart, serial::rx_timeout_ticks, LedcPwm, UartWriter},
    log_error, log_info, log_warn,
    uart_logger::{init_uart_logger, LogDrain, UartLoggerConfig},
    Console, Generator, GeneratorConfig, GeneratorError, SerialConfig, SignalGenerator, LOG_STREAM,
};

/// Bytes requested per UART read.
#[cfg(target_os = "espidf")]
const RX_CHUNK: usize = 256;

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    let Ok(peripherals) = Peripherals::take() else {
        return;
    };
    let pins = peripherals.pins;
    let mut drain = LogDrain::new();

    // Logs are discarded if UART1 is unavailable; the ring must still drain
    let mut log_uart = init_uart_logger(peripherals.uart1, pins.gpio4, &UartLoggerConfig::default()).ok();

    #[cfg(feature = "esp32c3")]
    let (tx_pin, rx_pin) = (pins.gpio21, pins.gpio20);
    #[cfg(not(feature = "esp32c3"))]
    let (tx_pin, rx_pin) = (pins.gpio1, pins.gpio3);

    let serial_config = SerialConfig::default();
    let serial = match init_command_uart(peripherals.uart0, tx_pin, rx_pin, &serial_config) {
        Ok(serial) => serial,
        Err(e) => {
            log_error!(LOG_STREAM, timestamp_us(), "command uart init: {}", e);
            flush_logs(&mut drain, &mut log_uart);
            return;
        }
    };

    let generator_config = GeneratorConfig::default();
    let generator = LedcPwm::new(&generator_config)
        .map_err(GeneratorError::from)
        .and_then(|pwm| Generator::new(pwm, &generator_config));
    let mut generator = match generator {
        Ok(generator) => generator,
        Err(e) => {
            log_error!(LOG_STREAM, timestamp_us(), "generator init failed: {}", e);
            flush_logs(&mut drain, &mut log_uart);
            return;
        }
    };

    let mut console = Console::new();
    let mut out = UartWriter(&serial);
    console.print_banner(&mut out);
    log_info!(
        LOG_STREAM,
        timestamp_us(),
        "{} on GPIO{}, FREQ={} DUTY={}",
        VERSION,
        generator_config.output_pin,
        generator.frequency(),
        generator.duty()
    );

    let timeout = rx_timeout_ticks(&serial_config);
    let mut rx = [0u8; RX_CHUNK];

    loop {
        let len = serial.read(&mut rx, timeout).unwrap_or(0);
        if len == 0 {
            flush_logs(&mut drain, &mut log_uart);
            // Yield so the idle task feeds the watchdog
            FreeRtos::delay_ms(serial_config.idle_delay_ms);
            continue;
        }

        for &byte in &rx[..len] {
            match console.process_byte(byte, &mut generator, &mut out) {
                Some(Ok(())) => log_state(&generator, timestamp_us()),
                Some(Err(e)) => log_warn!(LOG_STREAM, timestamp_us(), "{}", e),
                None => {}
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn flush_logs(drain: &mut LogDrain, log_uart: &mut Option<UartTxDriver<'_>>) {
    drain.drain(&LOG_STREAM, timestamp_us(), |line| {
        if let Some(uart) = log_uart.as_mut() {
            let _ = uart.write(line);
        }
    });
}

#[cfg(target_os = "espidf")]
fn timestamp_us() -> i64 {
    unsafe { esp_idf_sys::esp_timer_get_time() }
}

/// Debug trace of the generator state after a dispatched command.
fn log_state(generator: &impl uart_pwm_generator::SignalGenerator, now_us: i64) {
    uart_pwm_generator::log_debug!(
        uart_pwm_generator::LOG_STREAM,
        now_us,
        "FREQ={} DUTY={} {}",
        generator.frequency(),
        generator.duty(),
        if generator.is_running() { "ON" } else { "OFF" }
    );
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use std::io::{Read, Write};
    use std::time::Instant;

    use uart_pwm_generator::{
        hal::SimulatedPwm,
        log_warn,
        uart_logger::LogDrain,
        Console, Generator, GeneratorConfig, LOG_STREAM,
    };

    let config = GeneratorConfig::default();
    let mut generator = match Generator::new(SimulatedPwm::new(&config), &config) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("generator init failed: {}", e);
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    let now_us = || started.elapsed().as_micros() as i64;

    let mut console = Console::new();
    let mut drain = LogDrain::new();
    let mut out = String::new();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    let flush = |out: &mut String| {
        let mut stdout = stdout.lock();
        let _ = stdout.write_all(out.as_bytes());
        let _ = stdout.flush();
        out.clear();
    };

    console.print_banner(&mut out);
    flush(&mut out);

    for byte in std::io::stdin().lock().bytes() {
        let Ok(byte) = byte else { break };

        match console.process_byte(byte, &mut generator, &mut out) {
            Some(Ok(())) => log_state(&generator, now_us()),
            Some(Err(e)) => log_warn!(LOG_STREAM, now_us(), "{}", e),
            None => {}
        }
        if !out.is_empty() {
            flush(&mut out);
        }

        drain.drain(&LOG_STREAM, now_us(), |line| {
            let _ = stderr.lock().write_all(line);
        });
    }
}
