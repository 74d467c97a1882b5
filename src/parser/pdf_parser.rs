//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use rayon::prelude::*;

use crate::detect::{sniff_bytes, sniff_path, PdfHeader};
use crate::error::Result;
use crate::model::{RawLine, SourceDocument};

use super::layout::{group_spans_into_lines, SpanExtractor};
use super::options::{ErrorMode, ParseOptions};

/// US Letter height, used when no usable MediaBox is found.
const DEFAULT_PAGE_TOP: f32 = 792.0;

/// Bound on `/Parent` hops, guarding against cyclic page trees.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// PDF document parser.
pub struct PdfParser {
    doc: LopdfDocument,
    header: PdfHeader,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        let doc = LopdfDocument::load(path)?;

        Ok(Self {
            doc,
            header,
            options,
        })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let header = sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;

        Ok(Self {
            doc,
            header,
            options,
        })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Header read from the start of the file.
    pub fn header(&self) -> &PdfHeader {
        &self.header
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Extract every page's lines into a [`SourceDocument`].
    ///
    /// Pages are extracted in parallel when enabled and always reassembled
    /// in page order. In lenient mode a page that fails to parse contributes
    /// no lines but still counts toward the page total.
    pub fn parse(&self) -> Result<SourceDocument> {
        let page_ids: Vec<(u32, ObjectId)> = self.doc.get_pages().into_iter().collect();

        let pages: Vec<Vec<RawLine>> = if self.options.parallel && page_ids.len() > 1 {
            page_ids
                .par_iter()
                .map(|&(page_num, page_id)| self.parse_page(page_num, page_id))
                .collect::<Result<_>>()?
        } else {
            page_ids
                .iter()
                .map(|&(page_num, page_id)| self.parse_page(page_num, page_id))
                .collect::<Result<_>>()?
        };

        let mut source = SourceDocument::new();
        for lines in pages {
            source.add_page(lines);
        }

        log::debug!(
            "Parsed {} ({} pages, {} lines)",
            self.header,
            source.page_count,
            source.line_count()
        );
        Ok(source)
    }

    /// Parse a single page into lines.
    fn parse_page(&self, page_num: u32, page_id: ObjectId) -> Result<Vec<RawLine>> {
        let page_top = self.page_top(page_id);

        match SpanExtractor::new(&self.doc).extract_page_spans(page_id) {
            Ok(spans) => Ok(group_spans_into_lines(spans, page_top)),
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                Ok(Vec::new())
            }
        }
    }

    /// Upper edge of the page's MediaBox in user space, the origin for
    /// top-down `y0`. The box may be inherited from an ancestor `/Pages`
    /// node or stored as an indirect object.
    fn page_top(&self, page_id: ObjectId) -> f32 {
        let mut node = self.doc.get_dictionary(page_id).ok();

        for _ in 0..MAX_PAGE_TREE_DEPTH {
            let Some(dict) = node else { break };

            if let Some(top) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|mb| self.doc.dereference(mb).ok())
                .and_then(|(_, mb)| media_box_top(mb))
            {
                return top;
            }

            node = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|id| self.doc.get_dictionary(id))
                .ok();
        }

        DEFAULT_PAGE_TOP
    }
}

/// Larger y of a `[llx lly urx ury]` rectangle.
fn media_box_top(media_box: &Object) -> Option<f32> {
    match media_box.as_array() {
        Ok(array) if array.len() >= 4 => {
            let lly = array[1].as_float().ok()?;
            let ury = array[3].as_float().ok()?;
            Some(lly.max(ury))
        }
        _ => None,
    }
}

impl std::fmt::Debug for PdfParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfParser")
            .field("header", &self.header)
            .field("pages", &self.page_count())
            .field("options", &self.options)
            .finish()
    }
}
