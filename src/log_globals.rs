//! Global log stream instance.
//!
//! Pushed from the dispatch loop, drained when the receiver is idle.

use crate::logging::{LogLevel, LogStream};

/// Firmware log stream.
///
/// Debug entries (generator state after each dispatched command) are kept;
/// trace is discarded.
pub static LOG_STREAM: LogStream = LogStream::with_level(LogLevel::Debug);
