//! Title and heading classification engine.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`normalize`] raw lines into fragments
//! 2. [`profile_document`]: body font size and detected [`DocumentType`]
//! 3. [`TitleExtractor`] picks the title strategy for that type
//! 4. [`HeadingClassifier`] runs the font-rank or structural classifier,
//!    consulting the [`NoiseFilter`] and deduplicating in reading order
//! 5. the [`Outliner`] assembles the [`OutlineResult`]
//!
//! Everything here works on in-memory values. Each call is independent, so
//! one `Outliner` can be shared across threads to process many documents.

mod dedup;
mod detectors;
mod headings;
mod noise;
mod normalize;
mod profile;
mod title;

pub use dedup::{dedup_by_level, dedup_by_position, sort_reading_order, y_bucket};
pub use detectors::{
    DetectionInput, DetectorRegistry, DocumentDetector, FlyerDetector, GuideDetector,
    PhraseDetector,
};
pub use headings::{HeadingClassifier, StructuralClassifier};
pub use noise::NoiseFilter;
pub use normalize::{normalize, normalize_line};
pub use profile::{body_font_size, profile_document};
pub use title::TitleExtractor;

use std::sync::Arc;

use crate::error::Result;
use crate::model::{DocumentProfile, DocumentType, OutlineResult, SourceDocument, TextFragment};
use crate::rules::Rules;

/// Builds outlines from documents.
///
/// # Example
///
/// ```
/// use unoutline::{Outliner, RawLine, SourceDocument};
///
/// let source = SourceDocument::new().with_page(vec![
///     RawLine::single("Annual Report", 24.0, 40.0),
///     RawLine::single("Results", 16.0, 120.0),
///     RawLine::single("Revenue grew in every region.", 10.0, 140.0),
///     RawLine::single("Costs were flat.", 10.0, 160.0),
///     RawLine::single("Headcount rose slightly.", 10.0, 180.0),
/// ]);
///
/// let result = Outliner::new().outline(&source)?;
/// assert_eq!(result.title, "Annual Report Results");
/// # Ok::<(), unoutline::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Outliner {
    rules: Rules,
    registry: DetectorRegistry,
    noise: NoiseFilter,
    titles: TitleExtractor,
    headings: HeadingClassifier,
}

impl Outliner {
    /// Create an outliner with the built-in rules.
    pub fn new() -> Self {
        Self::with_rules(Rules::default()).expect("built-in rules compile")
    }

    /// Create an outliner from custom rules, compiling all patterns once.
    pub fn with_rules(rules: Rules) -> Result<Self> {
        Ok(Self {
            registry: DetectorRegistry::from_rules(&rules)?,
            noise: NoiseFilter::from_rules(&rules.noise)?,
            titles: TitleExtractor::from_rules(&rules)?,
            headings: HeadingClassifier::from_rules(&rules)?,
            rules,
        })
    }

    /// Replace the detector registry.
    pub fn with_registry(mut self, registry: DetectorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Append a detector at the lowest priority.
    pub fn register_detector(&mut self, detector: Arc<dyn DocumentDetector>) {
        self.registry.register(detector);
    }

    /// Rules this outliner was built from.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Normalize and outline a source document.
    pub fn outline(&self, source: &SourceDocument) -> Result<OutlineResult> {
        let fragments = normalize(source)?;
        self.outline_fragments(&fragments, source.page_count)
    }

    /// Outline an already-normalized fragment list.
    pub fn outline_fragments(
        &self,
        fragments: &[TextFragment],
        page_count: u32,
    ) -> Result<OutlineResult> {
        let profile = self.profile_fragments(fragments, page_count)?;
        Ok(self.assemble(&profile, fragments))
    }

    /// Normalize and profile a source document without outlining it.
    pub fn profile(&self, source: &SourceDocument) -> Result<DocumentProfile> {
        let fragments = normalize(source)?;
        self.profile_fragments(&fragments, source.page_count)
    }

    /// Profile an already-normalized fragment list.
    pub fn profile_fragments(
        &self,
        fragments: &[TextFragment],
        page_count: u32,
    ) -> Result<DocumentProfile> {
        profile_document(fragments, page_count, &self.registry)
    }

    /// Run the title and heading strategies for a computed profile.
    pub fn assemble(&self, profile: &DocumentProfile, fragments: &[TextFragment]) -> OutlineResult {
        let title = self.titles.extract(profile, fragments, &self.noise);
        let outline = self
            .headings
            .classify(profile, fragments, &title, &self.noise);

        if profile.detected_type != DocumentType::Generic {
            log::debug!(
                "Outlined {} document: title {:?}, {} headings",
                profile.detected_type,
                title,
                outline.len()
            );
        }

        OutlineResult::new(title, outline)
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}
