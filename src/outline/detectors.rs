//! Document-type detectors and the ordered registry that runs them.
//!
//! Each detector is a pure predicate over the fragment list (and page
//! count). The registry evaluates detectors in registration order and
//! returns the type of the first one that matches, so priority is explicit
//! and classification stays deterministic when marker phrases from two
//! families happen to co-occur.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use unoutline::outline::{DetectionInput, DetectorRegistry, PhraseDetector};
//! use unoutline::{DocumentType, Rules, TextFragment};
//!
//! let mut registry = DetectorRegistry::from_rules(&Rules::default()).unwrap();
//! registry.register(Arc::new(PhraseDetector::new(
//!     DocumentType::ApplicationForm,
//!     ["grant request", "applicant details"],
//!     true,
//! )));
//!
//! let fragments = vec![
//!     TextFragment::new("Grant Request", 18.0, 0, 40.0),
//!     TextFragment::new("Applicant details", 12.0, 0, 90.0),
//! ];
//! let input = DetectionInput::new(&fragments, 1);
//! assert_eq!(registry.detect(&input), DocumentType::ApplicationForm);
//! ```

use regex::Regex;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{DocumentType, TextFragment};
use crate::rules::{FlyerRules, GuideRules, Rules};

/// What every detector gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    /// All fragments of the document, in extraction order
    pub fragments: &'a [TextFragment],

    /// Total number of pages
    pub page_count: u32,
}

impl<'a> DetectionInput<'a> {
    pub fn new(fragments: &'a [TextFragment], page_count: u32) -> Self {
        Self {
            fragments,
            page_count,
        }
    }

    fn first_page(&self) -> impl Iterator<Item = &'a TextFragment> {
        self.fragments.iter().filter(|f| f.on_first_page())
    }
}

/// A signature predicate for one document family.
pub trait DocumentDetector: Send + Sync {
    /// The type reported when this detector matches.
    fn document_type(&self) -> DocumentType;

    /// Name used in logs.
    fn name(&self) -> &str {
        self.document_type().name()
    }

    /// Check the document against this family's signature.
    fn matches(&self, input: &DetectionInput<'_>) -> bool;
}

/// Ordered, first-match-wins set of detectors.
#[derive(Clone, Default)]
pub struct DetectorRegistry {
    detectors: Vec<Arc<dyn DocumentDetector>>,
}

impl DetectorRegistry {
    /// Create a new empty registry. Every document classifies as generic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the built-in registry, in priority order: flyer, poster,
    /// case study, application form, multi-section guide.
    pub fn from_rules(rules: &Rules) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(FlyerDetector::from_rules(&rules.flyer)?));
        registry.register(Arc::new(PhraseDetector::new(
            DocumentType::Poster,
            &rules.poster.markers,
            false,
        )));
        registry.register(Arc::new(PhraseDetector::new(
            DocumentType::CaseStudy,
            &rules.case_study.markers,
            true,
        )));
        registry.register(Arc::new(PhraseDetector::new(
            DocumentType::ApplicationForm,
            &rules.application_form.markers,
            true,
        )));
        registry.register(Arc::new(GuideDetector::from_rules(&rules.guide)));
        Ok(registry)
    }

    /// Append a detector at the lowest priority.
    pub fn register(&mut self, detector: Arc<dyn DocumentDetector>) {
        self.detectors.push(detector);
    }

    /// Insert a detector at `index`; index 0 is the highest priority.
    pub fn insert(&mut self, index: usize, detector: Arc<dyn DocumentDetector>) {
        let index = index.min(self.detectors.len());
        self.detectors.insert(index, detector);
    }

    /// Number of registered detectors.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Check if no detector is registered.
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Detector names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Classify a document. Falls back to [`DocumentType::Generic`].
    pub fn detect(&self, input: &DetectionInput<'_>) -> DocumentType {
        for detector in &self.detectors {
            if detector.matches(input) {
                log::debug!("Detector '{}' matched", detector.name());
                return detector.document_type();
            }
        }
        DocumentType::Generic
    }

    /// Types of every detector that matches, in priority order.
    ///
    /// Useful for diagnosing which families a document resembles; only the
    /// first entry is used for classification.
    pub fn matching(&self, input: &DetectionInput<'_>) -> Vec<DocumentType> {
        self.detectors
            .iter()
            .filter(|d| d.matches(input))
            .map(|d| d.document_type())
            .collect()
    }
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.names())
            .finish()
    }
}

/// Matches when every phrase occurs in some fragment (case-insensitive).
#[derive(Debug, Clone)]
pub struct PhraseDetector {
    doc_type: DocumentType,
    phrases: Vec<String>,
    first_page_only: bool,
}

impl PhraseDetector {
    /// Create a detector. With `first_page_only`, only page 0 is searched.
    pub fn new<I, S>(doc_type: DocumentType, phrases: I, first_page_only: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            doc_type,
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
            first_page_only,
        }
    }
}

impl DocumentDetector for PhraseDetector {
    fn document_type(&self) -> DocumentType {
        self.doc_type
    }

    fn matches(&self, input: &DetectionInput<'_>) -> bool {
        if self.phrases.is_empty() {
            return false;
        }

        let texts: Vec<String> = if self.first_page_only {
            input.first_page().map(TextFragment::lowercase).collect()
        } else {
            input.fragments.iter().map(TextFragment::lowercase).collect()
        };

        self.phrases
            .iter()
            .all(|phrase| texts.iter().any(|t| t.contains(phrase.as_str())))
    }
}

/// Single-page document with few oversized lines and promotional wording.
#[derive(Debug, Clone)]
pub struct FlyerDetector {
    max_pages: u32,
    big_font_size: f32,
    max_big_fonts: usize,
    marker: Regex,
}

impl FlyerDetector {
    pub fn from_rules(rules: &FlyerRules) -> Result<Self> {
        Ok(Self {
            max_pages: rules.max_pages,
            big_font_size: rules.big_font_size,
            max_big_fonts: rules.max_big_fonts,
            marker: Regex::new(&rules.marker_pattern)?,
        })
    }
}

impl DocumentDetector for FlyerDetector {
    fn document_type(&self) -> DocumentType {
        DocumentType::Flyer
    }

    fn matches(&self, input: &DetectionInput<'_>) -> bool {
        if input.page_count > self.max_pages {
            return false;
        }

        let big_fonts = input
            .fragments
            .iter()
            .filter(|f| f.font_size > self.big_font_size)
            .count();

        big_fonts <= self.max_big_fonts
            && input
                .fragments
                .iter()
                .any(|f| self.marker.is_match(&f.lowercase()))
    }
}

/// Guide title on page 0, plus a section opener and a subsection label anywhere.
#[derive(Debug, Clone)]
pub struct GuideDetector {
    title: String,
    section_prefixes: Vec<String>,
    subsection_labels: Vec<String>,
}

impl GuideDetector {
    pub fn from_rules(rules: &GuideRules) -> Self {
        Self {
            title: rules.title.clone(),
            section_prefixes: rules.section_prefixes.clone(),
            subsection_labels: rules.subsection_labels.clone(),
        }
    }
}

impl DocumentDetector for GuideDetector {
    fn document_type(&self) -> DocumentType {
        DocumentType::MultiSectionGuide
    }

    fn matches(&self, input: &DetectionInput<'_>) -> bool {
        if self.title.is_empty() {
            return false;
        }

        let title_found = input.first_page().any(|f| f.text.contains(&self.title));

        let section_found = input.fragments.iter().any(|f| {
            let text = f.text.trim();
            self.section_prefixes
                .iter()
                .any(|p| text.starts_with(p.as_str()))
        });

        let subsection_found = input.fragments.iter().any(|f| {
            let text = f.text.trim();
            self.subsection_labels.iter().any(|l| l == text)
        });

        title_found && section_found && subsection_found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, size: f32, page: u32) -> TextFragment {
        TextFragment::new(text, size, page, 0.0)
    }

    fn registry() -> DetectorRegistry {
        DetectorRegistry::from_rules(&Rules::default()).unwrap()
    }

    fn guide_fragments() -> Vec<TextFragment> {
        vec![
            frag(
                "Comprehensive Guide to Major Cities in the South of France",
                20.0,
                0,
            ),
            frag("Marseille: The Oldest City in France", 16.0, 1),
            frag("History", 12.0, 1),
        ]
    }

    #[test]
    fn test_default_priority_order() {
        assert_eq!(
            registry().names(),
            [
                "flyer",
                "poster",
                "case_study",
                "application_form",
                "multi_section_guide"
            ]
        );
    }

    #[test]
    fn test_flyer() {
        let fragments = vec![
            frag("HOPE TO SEE YOU THERE!", 30.0, 0),
            frag("Party", 40.0, 0),
            frag("Details inside", 10.0, 0),
        ];
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 1)),
            DocumentType::Flyer
        );
        // Two pages is never a flyer.
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 2)),
            DocumentType::Generic
        );
    }

    #[test]
    fn test_flyer_too_many_big_fonts() {
        let mut fragments: Vec<_> = (0..5).map(|i| frag(&format!("Big {i}"), 24.0, 0)).collect();
        fragments.push(frag("rsvp", 10.0, 0));
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 1)),
            DocumentType::Generic
        );
    }

    #[test]
    fn test_poster_searches_all_pages() {
        let fragments = vec![
            frag("Parsippany STEM Pathways", 18.0, 0),
            frag("Pathway Options", 14.0, 2),
        ];
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 3)),
            DocumentType::Poster
        );
    }

    #[test]
    fn test_case_study_first_page_only() {
        let mut fragments = vec![
            frag("To Present a Proposal for Developing", 16.0, 0),
            frag("the Business Plan for the Ontario Digital Library", 16.0, 1),
        ];
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 2)),
            DocumentType::Generic
        );

        fragments[1].page = 0;
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 2)),
            DocumentType::CaseStudy
        );
    }

    #[test]
    fn test_application_form() {
        let fragments = vec![
            frag("Application form for grant of LTC advance", 14.0, 0),
            frag("Name of the Government Servant", 10.0, 0),
        ];
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 1)),
            DocumentType::ApplicationForm
        );
    }

    #[test]
    fn test_guide_requires_all_three_signals() {
        let fragments = guide_fragments();
        assert_eq!(
            registry().detect(&DetectionInput::new(&fragments, 5)),
            DocumentType::MultiSectionGuide
        );

        for skip in 0..fragments.len() {
            let partial: Vec<_> = fragments
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, f)| f.clone())
                .collect();
            assert_eq!(
                registry().detect(&DetectionInput::new(&partial, 5)),
                DocumentType::Generic
            );
        }
    }

    #[test]
    fn test_priority_resolves_overlap() {
        // Poster and case-study markers together: poster wins.
        let fragments = vec![
            frag("STEM Pathways", 18.0, 0),
            frag("Pathway Options", 14.0, 0),
            frag("to present a proposal for developing", 14.0, 0),
            frag("digital library", 14.0, 0),
        ];
        let input = DetectionInput::new(&fragments, 2);
        let registry = registry();
        assert_eq!(
            registry.matching(&input),
            [DocumentType::Poster, DocumentType::CaseStudy]
        );
        assert_eq!(registry.detect(&input), DocumentType::Poster);
    }

    #[test]
    fn test_empty_registry_is_generic() {
        let fragments = guide_fragments();
        let registry = DetectorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.detect(&DetectionInput::new(&fragments, 5)),
            DocumentType::Generic
        );
    }

    #[test]
    fn test_insert_takes_priority() {
        let fragments = guide_fragments();
        let mut registry = registry();
        registry.insert(
            0,
            Arc::new(PhraseDetector::new(DocumentType::Poster, ["history"], false)),
        );
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.detect(&DetectionInput::new(&fragments, 5)),
            DocumentType::Poster
        );
    }

    #[test]
    fn test_phrase_detector_without_phrases_never_matches() {
        let fragments = guide_fragments();
        let detector = PhraseDetector::new(DocumentType::Poster, Vec::<String>::new(), false);
        assert!(!detector.matches(&DetectionInput::new(&fragments, 1)));
    }
}
