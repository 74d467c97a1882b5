//! Input-side types: raw lines from the parsing layer and normalized fragments.

use serde::{Deserialize, Serialize};

/// A run of text in a single font, as reported by the parsing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Span text, possibly padded with whitespace
    pub text: String,

    /// Font size in points
    pub font_size: f32,
}

impl RawSpan {
    /// Create a new span.
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// One visual line on a page, made of one or more spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Spans in reading order
    pub spans: Vec<RawSpan>,

    /// Top of the line's bounding box, page-local, growing downwards
    pub y0: f32,
}

impl RawLine {
    /// Create an empty line at the given vertical position.
    pub fn new(y0: f32) -> Self {
        Self {
            spans: Vec::new(),
            y0,
        }
    }

    /// Create a line holding a single span.
    pub fn single(text: impl Into<String>, font_size: f32, y0: f32) -> Self {
        Self::new(y0).with_span(text, font_size)
    }

    /// Append a span.
    pub fn with_span(mut self, text: impl Into<String>, font_size: f32) -> Self {
        self.spans.push(RawSpan::new(text, font_size));
        self
    }
}

/// Everything the outline engine needs from a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Total number of pages in the document
    pub page_count: u32,

    /// Lines per page, indexed by 0-based page number
    pub pages: Vec<Vec<RawLine>>,
}

impl SourceDocument {
    /// Create a new empty source document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page of lines. The page count follows the number of pages added.
    pub fn add_page(&mut self, lines: Vec<RawLine>) {
        self.pages.push(lines);
        self.page_count = self.pages.len() as u32;
    }

    /// Builder form of [`add_page`](Self::add_page).
    pub fn with_page(mut self, lines: Vec<RawLine>) -> Self {
        self.add_page(lines);
        self
    }

    /// Total number of lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

/// One normalized line of text on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Trimmed, whitespace-collapsed text
    pub text: String,

    /// Largest span size on the line
    pub font_size: f32,

    /// Page index (0-based)
    pub page: u32,

    /// Top vertical coordinate; smaller is higher on the page
    pub y0: f32,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32, y0: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page,
            y0,
        }
    }

    /// Whether the fragment sits on the first page.
    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    /// Lowercased text, used by the phrase detectors.
    pub fn lowercase(&self) -> String {
        self.text.to_lowercase()
    }
}
