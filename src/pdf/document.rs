//! lopdf-backed page source and output documents

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use lopdf::{Dictionary, Document, Object, ObjectId};

use super::{PageSink, PageSource};
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A PDF opened for splitting
///
/// The loaded document is shared read-only with every [`PdfSlice`] built
/// from it.
#[derive(Debug, Clone)]
pub struct PdfSource {
    doc: Rc<Document>,
    /// Page object ids in page order
    page_ids: Vec<ObjectId>,
}

impl PdfSource {
    /// Load a PDF from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let doc = Document::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded document
    pub fn from_document(doc: Document) -> Self {
        // get_pages() is keyed by page number, so values come out in order
        let page_ids = doc.get_pages().into_values().collect();
        PdfSource {
            doc: Rc::new(doc),
            page_ids,
        }
    }
}

impl PageSource for PdfSource {
    type Page = ObjectId;
    type Output = PdfSlice;

    fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    fn page(&self, index: u32) -> Result<ObjectId> {
        self.page_ids
            .get(index as usize)
            .copied()
            .ok_or(Error::PageIndex {
                index,
                total: self.page_count(),
            })
    }

    fn new_output(&self) -> PdfSlice {
        PdfSlice {
            source: Rc::clone(&self.doc),
            pages: Vec::new(),
        }
    }
}

/// A new PDF made of pages selected from a [`PdfSource`]
#[derive(Debug)]
pub struct PdfSlice {
    source: Rc<Document>,
    pages: Vec<ObjectId>,
}

impl PdfSlice {
    /// Number of pages appended so far
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Build the output document
    ///
    /// Starts from a copy of the source, gives it a fresh catalog and a flat
    /// page tree holding only the selected pages, then drops every object no
    /// longer reachable from the trailer.
    pub fn build(&self) -> Result<Document> {
        let mut doc = (*self.source).clone();

        // Resolve inherited attributes before the old page tree goes away
        let mut inherited = Vec::with_capacity(self.pages.len());
        for &page_id in &self.pages {
            inherited.push((page_id, inherited_attributes(&doc, page_id)?));
        }

        let pages_id = doc.new_object_id();

        for (page_id, attributes) in inherited {
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            for (key, value) in attributes {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(pages_id));
        }

        let kids: Vec<Object> = self
            .pages
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(self.pages.len() as i64));
        pages_object.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_object));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));

        doc.trailer.set("Root", Object::Reference(catalog_id));

        doc.prune_objects();
        doc.compress();

        Ok(doc)
    }
}

impl PageSink for PdfSlice {
    type Page = ObjectId;

    fn append_page(&mut self, page: ObjectId) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        let mut doc = self.build()?;
        doc.save(path)?;
        Ok(())
    }
}

/// Collect attributes the page inherits but does not set itself
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Result<Vec<(Vec<u8>, Object)>> {
    let page = doc.get_dictionary(page_id)?;
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut visited = HashSet::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    while let Some(node_id) = parent {
        if !visited.insert(node_id) {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        for key in INHERITABLE_ATTRIBUTES {
            if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(found)
}
