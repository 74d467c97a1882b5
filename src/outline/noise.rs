//! Noise filter deciding whether a text may become a title line or heading.

use regex::Regex;

use crate::error::Result;
use crate::rules::NoiseRules;

/// Compiled exclusion rules.
///
/// This is a fixed rule set, not a classifier: dates, version strings,
/// list numbers, copyright lines, URLs and known boilerplate are rejected.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
    marker: Regex,
    prefixes: Vec<String>,
    substrings: Vec<String>,
    exact: Vec<String>,
    min_chars: usize,
}

impl NoiseFilter {
    /// Compile a filter from rules.
    pub fn from_rules(rules: &NoiseRules) -> Result<Self> {
        let patterns = rules
            .patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            marker: Regex::new(&rules.marker_pattern)?,
            prefixes: rules.prefixes.iter().map(|s| s.to_lowercase()).collect(),
            substrings: rules.substrings.iter().map(|s| s.to_lowercase()).collect(),
            exact: rules.exact.clone(),
            min_chars: rules.min_chars,
        })
    }

    /// Check whether `text` is acceptable as a heading or title candidate.
    pub fn is_valid_heading(&self, text: &str) -> bool {
        if self.patterns.iter().any(|re| re.is_match(text)) {
            return false;
        }

        let lower = text.to_lowercase();
        if self.prefixes.iter().any(|p| lower.starts_with(p.as_str())) {
            return false;
        }
        if self.substrings.iter().any(|s| lower.contains(s.as_str())) {
            return false;
        }
        if self.marker.is_match(&lower) {
            return false;
        }

        if text.chars().filter(|c| !c.is_whitespace()).count() < self.min_chars {
            return false;
        }

        let trimmed = text.trim();
        !self.exact.iter().any(|e| e == trimmed)
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::from_rules(&NoiseRules::default()).expect("built-in noise rules compile")
    }
}
