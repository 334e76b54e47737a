//! Printer configuration

use std::time::Duration;

use crate::document::{DocumentBuilder, PaperSize};
use crate::error::PrintResult;
use crate::transport::EposTransport;

/// Default transmission timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default interval between reachability probes in milliseconds
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 5000;

/// Configuration for one network printer
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Printer host or IP (e.g. "192.168.1.50")
    pub host: String,

    /// Paper roll width, determines the character grid
    pub paper: PaperSize,

    /// Verbose queue/state logging
    pub debug: bool,

    /// Queue failed documents for replay instead of discarding them
    pub retry_on_error: bool,

    /// Transmission timeout in milliseconds
    pub timeout_ms: u64,

    /// Interval between reachability probes in milliseconds
    pub heartbeat_interval_ms: u64,
}

impl PrinterConfig {
    pub fn new(host: impl Into<String>, paper: PaperSize) -> Self {
        Self {
            host: host.into(),
            paper,
            debug: false,
            retry_on_error: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_retry_on_error(mut self, retry_on_error: bool) -> Self {
        self.retry_on_error = retry_on_error;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_heartbeat_interval_ms(mut self, interval_ms: u64) -> Self {
        self.heartbeat_interval_ms = interval_ms;
        self
    }

    /// Create a transport from this configuration
    pub fn build_transport(&self) -> PrintResult<EposTransport> {
        EposTransport::new(&self.host, Duration::from_millis(self.timeout_ms))
    }

    /// Create an empty document buffer for this paper size
    pub fn build_document(&self) -> DocumentBuilder {
        DocumentBuilder::new(self.paper)
    }
}
