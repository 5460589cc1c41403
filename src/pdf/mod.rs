//! PDF splitting module
//!
//! The splitter only needs two narrow capabilities from a document library,
//! expressed as [`PageSource`] and [`PageSink`]. [`PdfSource`] implements
//! them on top of lopdf.

use std::path::Path;

use crate::error::Result;

pub mod document;
pub mod split;

// Re-export commonly used items
pub use document::{PdfSlice, PdfSource};
pub use split::{
    normalize_output_name, output_dir_for, prepare_output_base, resolve_output_path, split_pdf,
    write_slices, SplitOptions, SplitReport, WrittenSlice,
};

/// A read-only document whose pages can be copied into new documents
pub trait PageSource {
    /// Handle to one page, as accepted by [`PageSink::append_page`]
    type Page;
    /// Output document type built from this source
    type Output: PageSink<Page = Self::Page>;

    /// Total number of pages
    fn page_count(&self) -> u32;

    /// Page at the 0-based `index`
    fn page(&self, index: u32) -> Result<Self::Page>;

    /// A new, empty output document
    fn new_output(&self) -> Self::Output;
}

/// An output document being assembled page by page
pub trait PageSink {
    type Page;

    /// Append a page after those already added
    fn append_page(&mut self, page: Self::Page) -> Result<()>;

    /// Write the document to `path`
    fn write_to(&mut self, path: &Path) -> Result<()>;
}
