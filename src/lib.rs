// src/lib.rs
// dlogcsv Library - Public API

//! # dlogcsv
//!
//! A Rust library for converting instrument data-log (dlog) files into
//! delimited text tables.
//!
//! ## Features
//!
//! - Decode dlog files with a lazily streamed sample body
//! - Present header metadata in human-readable form, with engineering
//!   notation for rate and delay settings
//! - Assemble CSV output with optional log and column header rows and an
//!   injected elapsed-time column
//! - Proper error handling
//!
//! ## Example
//!
//! ```no_run
//! use dlogcsv::{format_header_info, write_table, Dlog, TableOptions};
//!
//! let dlog = Dlog::open("capture.dlog").expect("Failed to open log");
//!
//! for line in format_header_info(&dlog.header).expect("Bad header values") {
//!     eprintln!("{line}");
//! }
//!
//! let header = dlog.header.clone();
//! let stdout = std::io::stdout().lock();
//! write_table(&header, dlog.into_samples(), &TableOptions::default(), stdout)
//!     .expect("Failed to write CSV");
//! ```

mod csv;
mod dlog;
mod eng;
mod present;
mod table;

pub use csv::CsvWriter;
pub use dlog::{
    Dlog, DlogError, DlogFormat, Header, Result, Sample, SampleReader, StopReason,
};
pub use present::format_header_info;
pub use table::{
    column_header_row, log_header_row, timestamped_rows, write_table, TableOptions,
    TimestampedRows,
};
