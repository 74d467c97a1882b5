//! # unoutline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! This library reads the text lines of a document, works out the body font
//! size and the document's layout family, and produces a title plus a
//! leveled, deduplicated list of headings in reading order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoutline::{outline_file, render};
//!
//! fn main() -> unoutline::Result<()> {
//!     // Outline a PDF file
//!     let result = outline_file("document.pdf")?;
//!
//!     // Render as JSON
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! The engine itself takes in-memory [`SourceDocument`]s, so lines from any
//! other parser can be outlined directly with an [`Outliner`].
//!
//! ## Features
//!
//! - **Font-rank headings**: H1..H4 by distinct font size above the body text
//! - **Layout families**: flyers, posters, case studies, application forms
//!   and multi-section guides get dedicated title and heading strategies
//! - **Configurable rules**: every phrase list, pattern and threshold lives
//!   in [`Rules`] and can be loaded from JSON
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;
pub mod rules;

// Re-export commonly used types
pub use detect::{has_pdf_extension, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    DocumentProfile, DocumentType, Heading, HeadingLevel, OutlineResult, RawLine, RawSpan,
    SourceDocument, TextFragment,
};
pub use outline::{DetectorRegistry, DocumentDetector, Outliner};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::JsonFormat;
pub use rules::Rules;

use std::io::Read;
use std::path::Path;

/// Parse a PDF file into the lines the outline engine consumes.
///
/// # Example
///
/// ```no_run
/// use unoutline::parse_file;
///
/// let source = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", source.page_count);
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    PdfParser::open(path)?.parse()
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use unoutline::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().sequential();
/// let source = parse_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<SourceDocument> {
    PdfParser::open_with_options(path, options)?.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<SourceDocument> {
    PdfParser::from_bytes(data)?.parse()
}

/// Parse a PDF from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<SourceDocument> {
    PdfParser::from_reader(reader)?.parse()
}

/// Outline a PDF file with the built-in rules.
///
/// # Example
///
/// ```no_run
/// use unoutline::outline_file;
///
/// let result = outline_file("document.pdf").unwrap();
/// for heading in &result.outline {
///     println!("{} {} (page {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    Outliner::new().outline(&parse_file(path)?)
}

/// Outline a PDF from bytes with the built-in rules.
pub fn outline_bytes(data: &[u8]) -> Result<OutlineResult> {
    Outliner::new().outline(&parse_bytes(data)?)
}

/// Outline a PDF from a reader with the built-in rules.
pub fn outline_reader<R: Read>(reader: R) -> Result<OutlineResult> {
    Outliner::new().outline(&parse_reader(reader)?)
}

/// Outline a PDF file and render the result as JSON.
///
/// # Example
///
/// ```no_run
/// use unoutline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = outline_file(path)?;
    render::to_json(&result, format)
}

/// Builder for parsing and outlining PDF documents.
///
/// # Example
///
/// ```no_run
/// use unoutline::{Rules, Unoutline};
///
/// let rules = Rules::from_path("rules.json")?;
/// let json = Unoutline::new()
///     .with_rules(rules)?
///     .lenient()
///     .outline("document.pdf")?
///     .to_json(unoutline::JsonFormat::Compact)?;
/// # Ok::<(), unoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unoutline {
    parse_options: ParseOptions,
    outliner: Outliner,
}

impl Unoutline {
    /// Create a new builder with default options and built-in rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Use custom rules.
    pub fn with_rules(mut self, rules: Rules) -> Result<Self> {
        self.outliner = Outliner::with_rules(rules)?;
        Ok(self)
    }

    /// Use a preconfigured outliner.
    pub fn with_outliner(mut self, outliner: Outliner) -> Self {
        self.outliner = outliner;
        self
    }

    /// The outliner documents are run through.
    pub fn outliner(&self) -> &Outliner {
        &self.outliner
    }

    /// Parse and outline a PDF file.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<UnoutlineResult> {
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        self.run(&parser.parse()?)
    }

    /// Parse and outline a PDF from bytes.
    pub fn outline_bytes(&self, data: &[u8]) -> Result<UnoutlineResult> {
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        self.run(&parser.parse()?)
    }

    /// Outline lines that were produced elsewhere.
    pub fn outline_source(&self, source: &SourceDocument) -> Result<UnoutlineResult> {
        self.run(source)
    }

    fn run(&self, source: &SourceDocument) -> Result<UnoutlineResult> {
        let fragments = outline::normalize(source)?;
        let profile = self
            .outliner
            .profile_fragments(&fragments, source.page_count)?;
        let result = self.outliner.assemble(&profile, &fragments);
        Ok(UnoutlineResult { profile, result })
    }
}

/// Outline of one document together with the profile that produced it.
#[derive(Debug, Clone)]
pub struct UnoutlineResult {
    /// Body size, detected type and counts
    pub profile: DocumentProfile,
    /// The title and headings
    pub result: OutlineResult,
}

impl UnoutlineResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Get the outline.
    pub fn outline(&self) -> &OutlineResult {
        &self.result
    }

    /// Get the document profile.
    pub fn profile(&self) -> &DocumentProfile {
        &self.profile
    }

    /// Consume the wrapper, keeping only the outline.
    pub fn into_outline(self) -> OutlineResult {
        self.result
    }
}
