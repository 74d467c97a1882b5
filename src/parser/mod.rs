//! PDF input: turns a PDF file into a [`SourceDocument`](crate::SourceDocument).

#[cfg(test)]
pub(crate) mod fixtures;
mod layout;
mod options;
mod pdf_parser;

pub use layout::{group_spans_into_lines, SpanExtractor, TextSpan};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
