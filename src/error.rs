//! Error types for the PDF range splitter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF range splitter
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV tokenizing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Output path exists but is not a directory
    #[error("Output path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// None of the supported encodings could decode the range table
    #[error("Could not decode {} (last tried {encoding})", .path.display())]
    Encoding { path: PathBuf, encoding: &'static str },

    /// Row has fewer than the three required cells
    #[error("CSV row {row}: expected 3 columns (start, stop, filename), got {found}: {cells:?}")]
    TooFewColumns {
        row: usize,
        found: usize,
        cells: Vec<String>,
    },

    /// Start or stop cell is not an integer
    #[error("CSV row {row}: start/stop must be integers (1-based), got {token:?}")]
    NonIntegerPage { row: usize, token: String },

    /// Filename cell is empty
    #[error("CSV row {row}: filename column (col 3) is blank")]
    BlankFilename { row: usize },

    /// Page number below 1
    #[error("Range {record} ({name}): pages must be >= 1 (got {start}-{end})")]
    PageBelowOne {
        record: usize,
        name: String,
        start: i64,
        end: i64,
    },

    /// End page before start page
    #[error("Range {record} ({name}): end page is before start page ({start}-{end})")]
    InvertedRange {
        record: usize,
        name: String,
        start: i64,
        end: i64,
    },

    /// End page past the last page of the source
    #[error("Range {record} ({name}): end page {end} exceeds total pages {total}")]
    PageOutOfRange {
        record: usize,
        name: String,
        end: i64,
        total: u32,
    },

    /// Document asked for a page it does not have (0-based index)
    #[error("Page index {index} is out of range for a {total}-page document")]
    PageIndex { index: u32, total: u32 },
}
