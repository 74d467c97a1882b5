//! Heading classification.
//!
//! Two algorithms, chosen by document type:
//!
//! - **Font rank**: fragments clearly larger than body text become
//!   candidates, and the distinct candidate sizes ranked largest first map
//!   to H1..H4. Sizes past the fourth tier are dropped, so a document with
//!   five or more meaningful heading sizes loses its smallest tiers.
//! - **Structural**: used for multi-section guides, whose heading sizes are
//!   too close to separate. Levels come from literal text patterns instead.

use regex::Regex;

use crate::error::Result;
use crate::model::{DocumentProfile, DocumentType, Heading, HeadingLevel, TextFragment};
use crate::rules::{GuideRules, Rules};

use super::dedup::{dedup_by_level, dedup_by_position, sort_reading_order};
use super::noise::NoiseFilter;

/// Compiled heading classifiers.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    size_delta: f32,
    excluded_phrases: Vec<String>,
    dedup_bucket: f32,
    case_study_denylist: Vec<String>,
    poster_marker: String,
    guide: StructuralClassifier,
}

impl HeadingClassifier {
    pub fn from_rules(rules: &Rules) -> Result<Self> {
        Ok(Self {
            size_delta: rules.headings.size_delta,
            excluded_phrases: rules
                .headings
                .excluded_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            dedup_bucket: rules.headings.dedup_bucket,
            case_study_denylist: rules.case_study.denylist.clone(),
            poster_marker: rules.poster.heading_marker.to_lowercase(),
            guide: StructuralClassifier::from_rules(&rules.guide)?,
        })
    }

    /// Classify headings for a profiled document, in reading order.
    pub fn classify(
        &self,
        profile: &DocumentProfile,
        fragments: &[TextFragment],
        title: &str,
        noise: &NoiseFilter,
    ) -> Vec<Heading> {
        match profile.detected_type {
            DocumentType::MultiSectionGuide => self.guide.classify(fragments, noise),
            doc_type => self.classify_by_font_rank(doc_type, profile, fragments, title, noise),
        }
    }

    fn classify_by_font_rank(
        &self,
        doc_type: DocumentType,
        profile: &DocumentProfile,
        fragments: &[TextFragment],
        title: &str,
        noise: &NoiseFilter,
    ) -> Vec<Heading> {
        let min_size = profile.body_font_size + self.size_delta;

        let candidates: Vec<&TextFragment> = fragments
            .iter()
            .filter(|f| title.is_empty() || !title.contains(f.text.as_str()))
            .filter(|f| noise.is_valid_heading(&f.text))
            .filter(|f| {
                let lower = f.lowercase();
                !self
                    .excluded_phrases
                    .iter()
                    .any(|p| lower.contains(p.as_str()))
            })
            .filter(|f| f.font_size >= min_size)
            .filter(|f| {
                doc_type != DocumentType::CaseStudy
                    || !self.case_study_denylist.iter().any(|d| *d == f.text)
            })
            .collect();

        let tiers = size_tiers(&candidates);
        if tiers.len() > HeadingLevel::COUNT {
            log::debug!(
                "Dropping {} heading size tiers beyond {}",
                tiers.len() - HeadingLevel::COUNT,
                HeadingLevel::H4
            );
        }

        let mut headings: Vec<Heading> = candidates
            .into_iter()
            .filter_map(|f| {
                let rank = tiers.iter().position(|&size| size == f.font_size)?;
                let level = HeadingLevel::from_rank(rank)?;
                Some(Heading::new(level, f.text.clone(), f.page, f.y0))
            })
            .collect();

        if doc_type == DocumentType::Poster {
            headings = headings
                .into_iter()
                .filter(|h| h.text.to_lowercase().contains(&self.poster_marker))
                .map(|h| Heading {
                    level: HeadingLevel::H1,
                    ..h
                })
                .collect();
        }

        sort_reading_order(&mut headings);
        let headings = dedup_by_position(headings, self.dedup_bucket);
        log::debug!(
            "Font-rank classifier kept {} headings over {} size tiers",
            headings.len(),
            tiers.len().min(HeadingLevel::COUNT)
        );
        headings
    }
}

/// Distinct candidate font sizes, largest first.
fn size_tiers(candidates: &[&TextFragment]) -> Vec<f32> {
    let mut sizes: Vec<f32> = candidates.iter().map(|f| f.font_size).collect();
    sizes.sort_by(|a, b| b.total_cmp(a));
    sizes.dedup();
    sizes
}

/// Pattern-driven classifier for multi-section guides.
#[derive(Debug, Clone)]
pub struct StructuralClassifier {
    section_patterns: Vec<Regex>,
    terminal_markers: Vec<String>,
    subsection_labels: Vec<String>,
    bullet_glyphs: Vec<String>,
    hyphen_prefix: String,
    max_bullet_words: usize,
    max_bullet_chars: usize,
}

impl StructuralClassifier {
    pub fn from_rules(rules: &GuideRules) -> Result<Self> {
        let section_patterns = rules
            .section_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            section_patterns,
            terminal_markers: rules.terminal_markers.clone(),
            subsection_labels: rules.subsection_labels.clone(),
            bullet_glyphs: rules.bullet_glyphs.clone(),
            hyphen_prefix: rules.hyphen_prefix.clone(),
            max_bullet_words: rules.max_bullet_words,
            max_bullet_chars: rules.max_bullet_chars,
        })
    }

    /// Classify every fragment by pattern, then order and deduplicate.
    pub fn classify(&self, fragments: &[TextFragment], noise: &NoiseFilter) -> Vec<Heading> {
        let mut headings: Vec<Heading> = fragments
            .iter()
            .filter_map(|f| {
                let (level, text) = self.level_of(&f.text, noise)?;
                Some(Heading::new(level, text, f.page, f.y0))
            })
            .collect();

        sort_reading_order(&mut headings);
        let headings = dedup_by_level(headings);
        log::debug!("Structural classifier kept {} headings", headings.len());
        headings
    }

    /// Level and stored text for one line, if it is a heading.
    pub fn level_of(&self, text: &str, noise: &NoiseFilter) -> Option<(HeadingLevel, String)> {
        let text = text.trim();

        let is_section = self.section_patterns.iter().any(|re| re.is_match(text))
            || self.terminal_markers.iter().any(|m| m == text);
        if is_section && noise.is_valid_heading(text) {
            return Some((HeadingLevel::H1, text.to_string()));
        }

        if self.subsection_labels.iter().any(|l| l == text) && noise.is_valid_heading(text) {
            return Some((HeadingLevel::H2, text.to_string()));
        }

        if self.is_bullet_heading(text) && noise.is_valid_heading(text) {
            return Some((HeadingLevel::H3, self.strip_bullet(text)));
        }

        None
    }

    fn starts_with_glyph(&self, text: &str) -> bool {
        self.bullet_glyphs
            .iter()
            .any(|g| !g.is_empty() && text.starts_with(g.as_str()))
    }

    fn starts_with_hyphen(&self, text: &str) -> bool {
        !self.hyphen_prefix.is_empty() && text.starts_with(self.hyphen_prefix.as_str())
    }

    /// A short bulleted line that reads like a sub-heading rather than prose.
    ///
    /// Glyph bullets qualify outright. Hyphen bullets also need a fully
    /// upper-case first word, another word after it, and a short line.
    fn is_bullet_heading(&self, text: &str) -> bool {
        if !self.starts_with_glyph(text) && !self.starts_with_hyphen(text) {
            return false;
        }
        if text.split_whitespace().count() >= self.max_bullet_words {
            return false;
        }
        if self.starts_with_glyph(text) {
            return true;
        }

        let body = text[self.hyphen_prefix.len()..].trim_start();
        let mut words = body.split_whitespace();
        let capitalised = words.next().is_some_and(is_upper_word);
        capitalised && words.next().is_some() && text.chars().count() < self.max_bullet_chars
    }

    fn strip_bullet(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for glyph in self.bullet_glyphs.iter().filter(|g| !g.is_empty()) {
            stripped = stripped.replace(glyph.as_str(), "");
        }
        let stripped = stripped.trim();
        let stripped = if self.hyphen_prefix.is_empty() {
            stripped
        } else {
            stripped
                .strip_prefix(self.hyphen_prefix.trim_end())
                .unwrap_or(stripped)
        };
        stripped.trim().to_string()
    }
}

/// Has at least one cased letter and no lower-case letters.
fn is_upper_word(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, size: f32, page: u32, y0: f32) -> TextFragment {
        TextFragment::new(text, size, page, y0)
    }

    fn profile(detected_type: DocumentType, body_font_size: f32) -> DocumentProfile {
        DocumentProfile {
            body_font_size,
            detected_type,
            page_count: 3,
            fragment_count: 0,
        }
    }

    fn classify(
        doc_type: DocumentType,
        body: f32,
        fragments: &[TextFragment],
        title: &str,
    ) -> Vec<Heading> {
        let classifier = HeadingClassifier::from_rules(&Rules::default()).unwrap();
        classifier.classify(
            &profile(doc_type, body),
            fragments,
            title,
            &NoiseFilter::default(),
        )
    }

    fn summary(headings: &[Heading]) -> Vec<(HeadingLevel, &str, u32)> {
        headings
            .iter()
            .map(|h| (h.level, h.text.as_str(), h.page))
            .collect()
    }

    #[test]
    fn test_font_rank_levels() {
        let fragments = vec![
            frag("Chapter One", 24.0, 0, 10.0),
            frag("Section A", 14.0, 0, 40.0),
            frag("Body text here", 10.0, 0, 60.0),
            frag("Section B", 14.0, 0, 80.0),
            frag("Barely Bigger", 11.5, 0, 90.0),
            frag("Chapter Two", 24.0, 1, 10.0),
        ];
        assert_eq!(
            summary(&classify(DocumentType::Generic, 10.0, &fragments, "")),
            [
                (HeadingLevel::H1, "Chapter One", 0),
                (HeadingLevel::H2, "Section A", 0),
                (HeadingLevel::H2, "Section B", 0),
                (HeadingLevel::H1, "Chapter Two", 1),
            ]
        );
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let fragments = vec![frag("Exactly Two Up", 12.0, 0, 10.0)];
        let headings = classify(DocumentType::Generic, 10.0, &fragments, "");
        assert_eq!(headings.len(), 1);
    }

    #[test]
    fn test_five_tiers_drop_smallest() {
        let fragments: Vec<_> = [30.0, 26.0, 22.0, 18.0, 14.0]
            .iter()
            .enumerate()
            .map(|(i, &size)| frag(&format!("Tier {}", i + 1), size, 0, i as f32 * 50.0))
            .collect();
        let headings = classify(DocumentType::Generic, 10.0, &fragments, "");
        assert_eq!(
            summary(&headings),
            [
                (HeadingLevel::H1, "Tier 1", 0),
                (HeadingLevel::H2, "Tier 2", 0),
                (HeadingLevel::H3, "Tier 3", 0),
                (HeadingLevel::H4, "Tier 4", 0),
            ]
        );
    }

    #[test]
    fn test_title_and_noise_excluded() {
        let fragments = vec![
            frag("Overview of the Plan", 24.0, 0, 10.0),
            frag("Plan", 20.0, 0, 30.0),
            frag("Our Mission Statement", 18.0, 0, 50.0),
            frag("Copyright 2024", 18.0, 0, 70.0),
            frag("Goals", 18.0, 0, 90.0),
        ];
        let headings = classify(DocumentType::Generic, 10.0, &fragments, "Overview of the Plan");
        assert_eq!(summary(&headings), [(HeadingLevel::H1, "Goals", 0)]);
    }

    #[test]
    fn test_case_study_denylist() {
        let fragments = vec![
            frag("Working Together", 18.0, 0, 10.0),
            frag("Summary", 18.0, 1, 10.0),
            frag("March 21, 2003", 18.0, 1, 700.0),
        ];
        let headings = classify(DocumentType::CaseStudy, 10.0, &fragments, "");
        assert_eq!(summary(&headings), [(HeadingLevel::H1, "Summary", 1)]);

        // Only the case-study family applies the denylist.
        let headings = classify(DocumentType::Generic, 10.0, &fragments, "");
        assert_eq!(headings.len(), 3);
    }

    #[test]
    fn test_poster_keeps_marker_headings_as_h1() {
        let fragments = vec![
            frag("Elective Course Offerings", 20.0, 0, 10.0),
            frag("PATHWAY OPTIONS", 16.0, 0, 200.0),
            frag("Regular Pathway Options", 14.0, 0, 100.0),
        ];
        let headings = classify(DocumentType::Poster, 10.0, &fragments, "");
        assert_eq!(
            summary(&headings),
            [
                (HeadingLevel::H1, "Regular Pathway Options", 0),
                (HeadingLevel::H1, "PATHWAY OPTIONS", 0),
            ]
        );
    }

    #[test]
    fn test_font_rank_dedup() {
        let fragments = vec![
            frag("Appendix", 16.0, 2, 100.2),
            frag("APPENDIX", 16.0, 2, 101.9),
            frag("Appendix", 16.0, 2, 300.0),
        ];
        let headings = classify(DocumentType::Generic, 10.0, &fragments, "");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Appendix");
        assert_eq!(headings[0].y0, 100.2);
    }

    #[test]
    fn test_structural_levels() {
        let fragments = vec![
            frag("Nice: The Jewel of the French Riviera", 12.0, 2, 40.0),
            frag("Key Attractions", 11.0, 2, 120.0),
            frag("\u{2022} Promenade des Anglais", 10.0, 2, 140.0),
            frag("Conclusion", 12.0, 3, 10.0),
            frag("Marseille: The Oldest City in France", 12.0, 1, 40.0),
            frag("History", 11.0, 1, 80.0),
            frag("History", 11.0, 1, 400.0),
            frag("Ordinary prose that mentions history in passing.", 10.0, 1, 90.0),
        ];
        let headings = classify(DocumentType::MultiSectionGuide, 10.0, &fragments, "ignored");
        assert_eq!(
            summary(&headings),
            [
                (HeadingLevel::H1, "Marseille: The Oldest City in France", 1),
                (HeadingLevel::H2, "History", 1),
                (HeadingLevel::H1, "Nice: The Jewel of the French Riviera", 2),
                (HeadingLevel::H2, "Key Attractions", 2),
                (HeadingLevel::H3, "Promenade des Anglais", 2),
                (HeadingLevel::H1, "Conclusion", 3),
            ]
        );
    }

    #[test]
    fn test_bullet_rules() {
        let classifier = StructuralClassifier::from_rules(&GuideRules::default()).unwrap();
        let noise = NoiseFilter::default();

        assert_eq!(
            classifier.level_of("\u{2022} Old Port (Vieux-Port)", &noise),
            Some((HeadingLevel::H3, "Old Port (Vieux-Port)".to_string()))
        );
        assert_eq!(
            classifier.level_of("- MUSEUM Pass details", &noise),
            Some((HeadingLevel::H3, "MUSEUM Pass details".to_string()))
        );
        // Hyphen bullet with an ordinary first word reads as prose.
        assert_eq!(classifier.level_of("- Museum pass details", &noise), None);
        // Too many words.
        assert_eq!(
            classifier.level_of(
                "\u{2022} one two three four five six seven eight nine ten",
                &noise
            ),
            None
        );
        // Bullet that is noise.
        assert_eq!(classifier.level_of("\u{2022} www.example.org", &noise), None);
        // Lower-case section opener is not H1.
        assert_eq!(classifier.level_of("marseille: the city", &noise), None);
    }
}
