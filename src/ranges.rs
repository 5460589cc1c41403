//! Range table parsing
//!
//! A range table is a comma-separated file with one output document per row:
//!
//! ```text
//! start,stop,filename
//! 1,5,Introduction
//! 6,10,Chapter1.pdf
//! ```
//!
//! Column 1 is the first page (1-based), column 2 the last page (inclusive)
//! and column 3 the output file name, with or without the `.pdf` extension.
//! Blank rows are ignored and a header row is optional. Page numbers are
//! kept exactly as written; bounds are checked by [`crate::validate`].

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{UTF_8, WINDOWS_1252};
use log::debug;

use crate::error::{Error, Result};

/// One row of the range table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord {
    /// 1-based line of the table this record came from
    pub row: usize,
    /// First page to copy (1-based)
    pub start_page: i64,
    /// Last page to copy (1-based, inclusive)
    pub end_page: i64,
    /// Output file name as written in the table, trimmed
    pub output_name: String,
}

/// Text encodings accepted for range tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEncoding {
    /// UTF-8, with the byte-order mark stripped if present
    Utf8Sig,
    /// UTF-8
    Utf8,
    /// Windows-1252 (Excel's default "CSV" export on Western Windows)
    Windows1252,
}

impl TableEncoding {
    /// Encodings in the order they are tried
    pub const PREFERENCE: [TableEncoding; 3] = [
        TableEncoding::Utf8Sig,
        TableEncoding::Utf8,
        TableEncoding::Windows1252,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableEncoding::Utf8Sig => "utf-8-sig",
            TableEncoding::Utf8 => "utf-8",
            TableEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Decode `bytes`, returning `None` if they are not valid in this encoding
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TableEncoding::Utf8Sig => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TableEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            TableEncoding::Windows1252 => {
                // Bytes the code page leaves undefined
                if bytes
                    .iter()
                    .any(|b| matches!(b, 0x81 | 0x8D | 0x8F | 0x90 | 0x9D))
                {
                    return None;
                }
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

impl fmt::Display for TableEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read and parse a range table from disk
pub fn read_ranges(path: &Path) -> Result<Vec<RangeRecord>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_table(path, &bytes)?;
    debug!("Decoded {} as {}", path.display(), encoding);

    parse_ranges(&text)
}

/// Decode a range table with the first encoding that accepts it
pub fn decode_table<'a>(path: &Path, bytes: &'a [u8]) -> Result<(Cow<'a, str>, TableEncoding)> {
    for encoding in TableEncoding::PREFERENCE {
        if let Some(text) = encoding.decode(bytes) {
            return Ok((text, encoding));
        }
        debug!("{} is not valid {}", path.display(), encoding);
    }

    let last = TableEncoding::PREFERENCE[TableEncoding::PREFERENCE.len() - 1];
    Err(Error::Encoding {
        path: path.to_path_buf(),
        encoding: last.name(),
    })
}

/// Parse decoded range table text into records, in file order
pub fn parse_ranges(text: &str) -> Result<Vec<RangeRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut seen_first_row = false;

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let row = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(index + 1);

        if is_blank(&record) {
            continue;
        }

        if !seen_first_row {
            seen_first_row = true;
            if looks_like_header(&record) {
                debug!("Skipping header row {}", row);
                continue;
            }
        }

        records.push(parse_row(row, &record)?);
    }

    Ok(records)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

/// Header check on the first three cells
///
/// Matches on partial keywords per column, so `Start Page,Stop Page,File`
/// counts as a header too.
fn looks_like_header(record: &StringRecord) -> bool {
    let cell = |i: usize| record.get(i).unwrap_or("").trim().to_lowercase();
    let (c0, c1, c2) = (cell(0), cell(1), cell(2));

    if c0.contains("start") || c1.contains("stop") || c2.contains("filename") {
        return true;
    }

    let mut tokens = [c0.as_str(), c1.as_str(), c2.as_str()];
    tokens.sort_unstable();
    tokens == ["filename", "start", "stop"]
}

fn parse_row(row: usize, record: &StringRecord) -> Result<RangeRecord> {
    if record.len() < 3 {
        return Err(Error::TooFewColumns {
            row,
            found: record.len(),
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    let start_page = parse_page(row, &record[0])?;
    let end_page = parse_page(row, &record[1])?;

    let output_name = record[2].trim();
    if output_name.is_empty() {
        return Err(Error::BlankFilename { row });
    }

    Ok(RangeRecord {
        row,
        start_page,
        end_page,
        output_name: output_name.to_string(),
    })
}

fn parse_page(row: usize, cell: &str) -> Result<i64> {
    let token = cell.trim();
    token.parse().map_err(|_| Error::NonIntegerPage {
        row,
        token: token.to_string(),
    })
}
