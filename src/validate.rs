//! Range validation against the source document's page count

use crate::error::{Error, Result};
use crate::ranges::RangeRecord;

/// Check every record against `total_pages`, stopping at the first failure
///
/// Records are reported by their 1-based position in `records`.
pub fn validate_ranges(records: &[RangeRecord], total_pages: u32) -> Result<()> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(i, record)| validate_record(i + 1, record, total_pages))
}

/// Check a single record; `position` is its 1-based index in the table
pub fn validate_record(position: usize, record: &RangeRecord, total_pages: u32) -> Result<()> {
    let (start, end) = (record.start_page, record.end_page);

    if start < 1 || end < 1 {
        return Err(Error::PageBelowOne {
            record: position,
            name: record.output_name.clone(),
            start,
            end,
        });
    }

    if end < start {
        return Err(Error::InvertedRange {
            record: position,
            name: record.output_name.clone(),
            start,
            end,
        });
    }

    if end > i64::from(total_pages) {
        return Err(Error::PageOutOfRange {
            record: position,
            name: record.output_name.clone(),
            end,
            total: total_pages,
        });
    }

    Ok(())
}
