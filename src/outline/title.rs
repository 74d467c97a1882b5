//! Title extraction, one strategy per document type.

use regex::Regex;
use std::collections::HashMap;

use crate::error::Result;
use crate::model::{DocumentProfile, DocumentType, TextFragment};
use crate::rules::Rules;

use super::noise::NoiseFilter;

/// Compiled title strategies.
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    guide_title: String,
    case_study_pattern: Regex,
    case_study_slack: f32,
    max_lines: usize,
}

impl TitleExtractor {
    pub fn from_rules(rules: &Rules) -> Result<Self> {
        Ok(Self {
            guide_title: rules.guide.title.clone(),
            case_study_pattern: Regex::new(&rules.case_study.title_pattern)?,
            case_study_slack: rules.case_study.title_size_slack,
            max_lines: rules.max_title_lines,
        })
    }

    /// Extract the title for a profiled document. Never fails; an empty
    /// string means no title was found.
    pub fn extract(
        &self,
        profile: &DocumentProfile,
        fragments: &[TextFragment],
        noise: &NoiseFilter,
    ) -> String {
        let title = match profile.detected_type {
            DocumentType::MultiSectionGuide => self.guide_title.clone(),
            DocumentType::Flyer => String::new(),
            DocumentType::Poster => repeated_title(fragments, profile.body_font_size),
            DocumentType::CaseStudy => self.case_study_title(fragments, profile.body_font_size),
            DocumentType::ApplicationForm => topmost_title(fragments),
            DocumentType::Generic => self.largest_lines_title(fragments, noise),
        };
        title.trim().to_string()
    }

    /// Marker-bearing first-page lines, top to bottom, joined.
    fn case_study_title(&self, fragments: &[TextFragment], body_size: f32) -> String {
        let mut lines: Vec<(f32, &str)> = fragments
            .iter()
            .filter(|f| f.on_first_page() && f.font_size >= body_size - self.case_study_slack)
            .filter(|f| self.case_study_pattern.is_match(&f.lowercase()))
            .map(|f| (f.y0, f.text.as_str()))
            .collect();

        lines.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        lines
            .iter()
            .flat_map(|(_, text)| text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Largest first-page lines that pass the noise filter and have no colon.
    fn largest_lines_title(&self, fragments: &[TextFragment], noise: &NoiseFilter) -> String {
        let mut first_page: Vec<&TextFragment> =
            fragments.iter().filter(|f| f.on_first_page()).collect();
        first_page.sort_by(|a, b| b.font_size.total_cmp(&a.font_size));

        first_page
            .into_iter()
            .filter(|f| noise.is_valid_heading(&f.text) && !f.text.contains(':'))
            .take(self.max_lines)
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Most frequent text among fragments larger than body size; ties go to
/// the text seen first.
fn repeated_title(fragments: &[TextFragment], body_size: f32) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, fragment) in fragments
        .iter()
        .filter(|f| f.font_size > body_size)
        .enumerate()
    {
        counts.entry(fragment.text.as_str()).or_insert((0, order)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(text, _)| text.to_string())
        .unwrap_or_default()
}

/// Text of the highest line on the first page.
fn topmost_title(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .filter(|f| f.on_first_page())
        .reduce(|best, f| if f.y0 < best.y0 { f } else { best })
        .map(|f| f.text.clone())
        .unwrap_or_default()
}
