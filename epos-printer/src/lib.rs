//! # epos-printer
//!
//! ePOS-Print XML client library for Epson network thermal receipt printers.
//!
//! ## Scope
//!
//! This crate handles HOW to talk to the printer:
//! - Text layout on the character grid (wrapping, right alignment)
//! - ePOS-Print XML document building (SOAP envelope + command fragments)
//! - HTTPS transmission to the printer's service endpoint
//! - Connection monitoring: heartbeat probes and a FIFO retry queue
//!
//! Receipt content (WHAT to print) stays in application code.
//!
//! ## Example
//!
//! ```ignore
//! use epos_printer::{
//!     CutType, DocumentBuilder, PaperSize, PrinterConfig, PrinterMonitor, TextOptions,
//! };
//!
//! let config = PrinterConfig::new("192.168.1.50", PaperSize::Mm80);
//! let monitor = PrinterMonitor::new(config.build_transport()?, &config);
//!
//! let mut doc = config.build_document();
//! doc.append_text("CAFE MOLINO", &TextOptions::default().with_new_line(true));
//! doc.append_text("Table", &TextOptions::default());
//! doc.append_text("12", &TextOptions::default().with_align_right(true).with_new_line(true));
//! doc.add_cut(CutType::Feed);
//!
//! monitor.print(&mut doc).await;
//! ```

mod command;
mod config;
mod document;
mod error;
pub mod layout;
mod monitor;
mod transport;

// Re-exports
pub use command::{
    Align, Color, CutType, Font, StylePatch, SymbolLevel, SymbolOptions, SymbolType, TextSize,
    TextStyle, escape_xml,
};
pub use config::{DEFAULT_HEARTBEAT_INTERVAL_MS, DEFAULT_TIMEOUT_MS, PrinterConfig};
pub use document::{DocumentBuilder, PaperSize, TextOptions};
pub use error::{PrintError, PrintResult};
pub use monitor::{ConnectionStatus, PrintOutcome, PrinterMonitor};
pub use transport::{EposTransport, Transport};
