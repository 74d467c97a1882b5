//! Document-level classification results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout family a document was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// No specialised family matched
    #[default]
    Generic,
    /// Single-page promotional flyer
    Flyer,
    /// Poster with repeated running title
    Poster,
    /// Proposal-style case study
    CaseStudy,
    /// Program application form
    ApplicationForm,
    /// Multi-section travel guide
    MultiSectionGuide,
}

impl DocumentType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Flyer => "flyer",
            Self::Poster => "poster",
            Self::CaseStudy => "case_study",
            Self::ApplicationForm => "application_form",
            Self::MultiSectionGuide => "multi_section_guide",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Corpus statistics and type of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    /// Median font size over every fragment
    pub body_font_size: f32,

    /// Detected layout family
    pub detected_type: DocumentType,

    /// Total page count reported by the parser
    pub page_count: u32,

    /// Number of fragments the statistics were computed from
    pub fragment_count: usize,
}
