//! Data model for outline extraction.
//!
//! Raw lines come in from the parsing layer, are normalized into
//! [`TextFragment`]s, profiled into a [`DocumentProfile`], and leave as an
//! [`OutlineResult`].

mod fragment;
mod outline;
mod profile;

pub use fragment::{RawLine, RawSpan, SourceDocument, TextFragment};
pub use outline::{Heading, HeadingLevel, OutlineResult};
pub use profile::{DocumentProfile, DocumentType};
