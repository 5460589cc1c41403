//! PDF Range Split Library
//!
//! Splits one PDF into several, driven by a CSV table of page ranges.
//! This library provides functionality to:
//! - Parse range tables in UTF-8 or Windows-1252, with an optional header
//! - Validate ranges against the source page count
//! - Write one PDF per range, never overwriting existing files
//!
//! # Example
//!
//! ```no_run
//! use pdf_range_split::pdf::{split_pdf, SplitOptions};
//! use std::path::PathBuf;
//!
//! let options = SplitOptions {
//!     source: PathBuf::from("submittal.pdf"),
//!     ranges: PathBuf::from("ranges.csv"),
//!     output_base: PathBuf::from("out"),
//! };
//!
//! let report = split_pdf(&options, |_| {}).expect("Failed to split PDF");
//! println!("{} files in {}", report.slices.len(), report.output_dir.display());
//! ```

pub mod error;
pub mod pdf;
pub mod ranges;
pub mod validate;

// Re-export commonly used items
pub use error::{Error, Result};
pub use ranges::{read_ranges, RangeRecord};
