//! Splitting a PDF into one file per range table row

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{PageSink, PageSource, PdfSource};
use crate::error::{Error, Result};
use crate::ranges::{read_ranges, RangeRecord};
use crate::validate::validate_ranges;

/// Extension given to every output file
pub const PDF_EXTENSION: &str = "pdf";

/// Options for splitting a PDF
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Source PDF to split
    pub source: PathBuf,
    /// CSV range table
    pub ranges: PathBuf,
    /// Base directory; output goes into a folder named after the source
    pub output_base: PathBuf,
}

/// One output file that was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSlice {
    /// Path the slice was written to, after collision handling
    pub path: PathBuf,
    /// First page copied (1-based)
    pub start_page: u32,
    /// Last page copied (1-based, inclusive)
    pub end_page: u32,
}

impl WrittenSlice {
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }
}

/// Result of a completed split
#[derive(Debug, Clone)]
pub struct SplitReport {
    /// Folder all slices were written into
    pub output_dir: PathBuf,
    /// Slices in table order
    pub slices: Vec<WrittenSlice>,
}

/// Split a PDF according to a range table
///
/// The table is parsed and every range validated before anything is
/// written, so a bad row produces no output at all. `on_written` is called
/// after each slice is saved.
///
/// # Example
///
/// ```no_run
/// use pdf_range_split::pdf::{split_pdf, SplitOptions};
/// use std::path::PathBuf;
///
/// let options = SplitOptions {
///     source: PathBuf::from("submittal.pdf"),
///     ranges: PathBuf::from("ranges.csv"),
///     output_base: PathBuf::from("out"),
/// };
///
/// split_pdf(&options, |slice| println!("{}", slice.path.display()))
///     .expect("Failed to split");
/// ```
pub fn split_pdf<F>(options: &SplitOptions, on_written: F) -> Result<SplitReport>
where
    F: FnMut(&WrittenSlice),
{
    for path in [&options.source, &options.ranges] {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    prepare_output_base(&options.output_base)?;

    let source = PdfSource::open(&options.source)?;
    let total_pages = source.page_count();
    debug!("{} has {} pages", options.source.display(), total_pages);

    let records = read_ranges(&options.ranges)?;
    validate_ranges(&records, total_pages)?;

    let output_dir = output_dir_for(&options.source, &options.output_base);
    std::fs::create_dir_all(&output_dir)?;

    let slices = write_slices(&source, &records, &output_dir, on_written)?;

    Ok(SplitReport { output_dir, slices })
}

/// Write one output document per record into `output_dir`
///
/// Records must already be validated against `source`.
pub fn write_slices<S, F>(
    source: &S,
    records: &[RangeRecord],
    output_dir: &Path,
    mut on_written: F,
) -> Result<Vec<WrittenSlice>>
where
    S: PageSource,
    F: FnMut(&WrittenSlice),
{
    let mut slices = Vec::with_capacity(records.len());

    for record in records {
        let start_page = page_number(record.start_page, source.page_count())?;
        let end_page = page_number(record.end_page, source.page_count())?;

        let mut output = source.new_output();
        for index in (start_page - 1)..end_page {
            output.append_page(source.page(index)?)?;
        }

        let name = normalize_output_name(&record.output_name);
        let path = resolve_output_path(output_dir, &name);
        output.write_to(&path)?;

        info!("Wrote {} (pages {}-{})", path.display(), start_page, end_page);

        let slice = WrittenSlice {
            path,
            start_page,
            end_page,
        };
        on_written(&slice);
        slices.push(slice);
    }

    Ok(slices)
}

fn page_number(page: i64, total: u32) -> Result<u32> {
    u32::try_from(page)
        .ok()
        .filter(|&p| p >= 1)
        .ok_or(Error::PageIndex {
            index: page.saturating_sub(1).clamp(0, i64::from(u32::MAX)) as u32,
            total,
        })
}

/// Create the base output directory if needed
///
/// Fails if the path exists but is not a directory.
pub fn prepare_output_base(base: &Path) -> Result<()> {
    if !base.exists() {
        std::fs::create_dir_all(base)?;
    }
    if !base.is_dir() {
        return Err(Error::NotADirectory(base.to_path_buf()));
    }
    Ok(())
}

/// Folder for a source's slices: `base/<source file stem>`
pub fn output_dir_for(source: &Path, base: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "split".to_string());
    base.join(stem)
}

/// Trim `name` and add `.pdf` unless it already has it (any case)
pub fn normalize_output_name(name: &str) -> String {
    let name = name.trim();
    let suffix = format!(".{}", PDF_EXTENSION);
    if name.to_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// First free path for `name` in `dir`
///
/// Tries `name`, then `stem_1.ext`, `stem_2.ext`, ... Nothing is reserved,
/// so the result is only free until something else writes there.
pub fn resolve_output_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, extension));
        if !candidate.exists() {
            debug!("{} exists, using {}", name, candidate.display());
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Source with a fixed page count; pages are their own 0-based indexes
    struct FakeSource {
        pages: u32,
    }

    /// Writes the appended page indexes to the target file, comma-separated
    struct FakeSink {
        pages: Vec<u32>,
    }

    impl PageSource for FakeSource {
        type Page = u32;
        type Output = FakeSink;

        fn page_count(&self) -> u32 {
            self.pages
        }

        fn page(&self, index: u32) -> Result<u32> {
            if index < self.pages {
                Ok(index)
            } else {
                Err(Error::PageIndex {
                    index,
                    total: self.pages,
                })
            }
        }

        fn new_output(&self) -> FakeSink {
            FakeSink { pages: Vec::new() }
        }
    }

    impl PageSink for FakeSink {
        type Page = u32;

        fn append_page(&mut self, page: u32) -> Result<()> {
            self.pages.push(page);
            Ok(())
        }

        fn write_to(&mut self, path: &Path) -> Result<()> {
            let text: Vec<String> = self.pages.iter().map(u32::to_string).collect();
            fs::write(path, text.join(","))?;
            Ok(())
        }
    }

    fn record(start: i64, end: i64, name: &str) -> RangeRecord {
        RangeRecord {
            row: 1,
            start_page: start,
            end_page: end,
            output_name: name.to_string(),
        }
    }

    fn written_pages(path: &Path) -> String {
        fs::read_to_string(path).expect("Failed to read slice")
    }

    #[test]
    fn test_normalize_output_name() {
        assert_eq!(normalize_output_name("Intro"), "Intro.pdf");
        assert_eq!(normalize_output_name("Chapter1.pdf"), "Chapter1.pdf");
        assert_eq!(normalize_output_name("  Upper.PDF  "), "Upper.PDF");
        assert_eq!(normalize_output_name("notes.txt"), "notes.txt.pdf");
        assert_eq!(normalize_output_name("v1.2"), "v1.2.pdf");
    }

    #[test]
    fn test_output_dir_for() {
        let dir = output_dir_for(Path::new("/in/Tech Submittal.pdf"), Path::new("/out"));
        assert_eq!(dir, Path::new("/out/Tech Submittal"));
    }

    #[test]
    fn test_resolve_output_path_collisions() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();

        assert_eq!(resolve_output_path(dir, "a.pdf"), dir.join("a.pdf"));

        fs::write(dir.join("a.pdf"), "").unwrap();
        assert_eq!(resolve_output_path(dir, "a.pdf"), dir.join("a_1.pdf"));

        fs::write(dir.join("a_1.pdf"), "").unwrap();
        fs::write(dir.join("a_2.pdf"), "").unwrap();
        assert_eq!(resolve_output_path(dir, "a.pdf"), dir.join("a_3.pdf"));
    }

    #[test]
    fn test_resolve_keeps_extension_case() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        fs::write(dir.join("Report.PDF"), "").unwrap();

        assert_eq!(resolve_output_path(dir, "Report.PDF"), dir.join("Report_1.PDF"));
    }

    #[test]
    fn test_write_slices_pages_and_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = FakeSource { pages: 20 };
        let records = vec![
            record(1, 5, "Intro"),
            record(6, 10, "Chapter1.pdf"),
            record(11, 20, "Appendix"),
        ];

        let mut seen = Vec::new();
        let slices = write_slices(&source, &records, temp_dir.path(), |slice| {
            seen.push(slice.path.clone())
        })
        .unwrap();

        assert_eq!(slices.len(), 3);
        assert_eq!(seen, slices.iter().map(|s| s.path.clone()).collect::<Vec<_>>());

        let counts: Vec<u32> = slices.iter().map(WrittenSlice::page_count).collect();
        assert_eq!(counts, vec![5, 5, 10]);

        assert_eq!(written_pages(&temp_dir.path().join("Intro.pdf")), "0,1,2,3,4");
        assert_eq!(written_pages(&temp_dir.path().join("Chapter1.pdf")), "5,6,7,8,9");

        // Concatenated slices reproduce the covered pages in order
        let all: Vec<String> = slices.iter().map(|s| written_pages(&s.path)).collect();
        let expected: Vec<String> = (0..20).map(|p| p.to_string()).collect();
        assert_eq!(all.join(","), expected.join(","));
    }

    #[test]
    fn test_write_slices_overlap_and_repeat_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = FakeSource { pages: 4 };
        let records = vec![record(1, 3, "part"), record(3, 4, "part.pdf")];

        let slices = write_slices(&source, &records, temp_dir.path(), |_| {}).unwrap();

        assert_eq!(slices[0].path, temp_dir.path().join("part.pdf"));
        assert_eq!(slices[1].path, temp_dir.path().join("part_1.pdf"));
        assert_eq!(written_pages(&slices[0].path), "0,1,2");
        assert_eq!(written_pages(&slices[1].path), "2,3");
    }

    #[test]
    fn test_single_last_page() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = FakeSource { pages: 7 };

        let slices =
            write_slices(&source, &[record(7, 7, "last")], temp_dir.path(), |_| {}).unwrap();
        assert_eq!(written_pages(&slices[0].path), "6");
    }

    #[test]
    fn test_unvalidated_record_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = FakeSource { pages: 3 };

        let result = write_slices(&source, &[record(0, 2, "bad")], temp_dir.path(), |_| {});
        assert!(matches!(result, Err(Error::PageIndex { .. })));

        let result = write_slices(&source, &[record(2, 4, "bad")], temp_dir.path(), |_| {});
        assert!(matches!(result, Err(Error::PageIndex { index: 3, total: 3 })));
    }

    #[test]
    fn test_prepare_output_base() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("a").join("b");
        prepare_output_base(&nested).unwrap();
        assert!(nested.is_dir());

        // Existing directory is fine
        prepare_output_base(&nested).unwrap();

        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let result = prepare_output_base(&file);
        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[test]
    fn test_split_pdf_missing_inputs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let options = SplitOptions {
            source: PathBuf::from("nonexistent.pdf"),
            ranges: PathBuf::from("nonexistent.csv"),
            output_base: temp_dir.path().to_path_buf(),
        };

        let result = split_pdf(&options, |_| {});
        assert!(matches!(result, Err(Error::FileNotFound(ref p)) if p == Path::new("nonexistent.pdf")));
    }
}
