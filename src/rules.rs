//! Classification rules: every phrase, pattern and threshold the engine uses.
//!
//! The engine itself carries no literal phrases. Document families are
//! recognised and handled through the values held here, so a new family or
//! a tweaked denylist is a data change rather than a code change. Rules
//! deserialize from JSON with every field optional; missing fields fall back
//! to the built-in defaults.
//!
//! ```
//! use unoutline::Rules;
//!
//! let rules = Rules::from_json_str(r#"{ "headings": { "size_delta": 3.0 } }"#).unwrap();
//! assert_eq!(rules.headings.size_delta, 3.0);
//! assert_eq!(rules.max_title_lines, 2);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete rule set for one [`Outliner`](crate::Outliner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Noise filter applied to every title and heading candidate
    pub noise: NoiseRules,

    /// Single-page flyer detection
    pub flyer: FlyerRules,

    /// Poster detection and heading selection
    pub poster: PosterRules,

    /// Case-study detection, title markers and boilerplate denylist
    pub case_study: CaseStudyRules,

    /// Application-form detection
    pub application_form: ApplicationFormRules,

    /// Multi-section guide detection and structural classification
    pub guide: GuideRules,

    /// Generic font-rank heading classifier
    pub headings: HeadingRules,

    /// Maximum number of lines joined into a generic title
    pub max_title_lines: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            noise: NoiseRules::default(),
            flyer: FlyerRules::default(),
            poster: PosterRules::default(),
            case_study: CaseStudyRules::default(),
            application_form: ApplicationFormRules::default(),
            guide: GuideRules::default(),
            headings: HeadingRules::default(),
            max_title_lines: 2,
        }
    }
}

impl Rules {
    /// Parse rules from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidRules(e.to_string()))
    }

    /// Load rules from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Serialize rules as pretty JSON, e.g. to seed a custom rules file.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Render(e.to_string()))
    }
}

/// Exclusion rules for the noise filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseRules {
    /// Regexes matched against the text as-is (dates, version numbers, list markers)
    pub patterns: Vec<String>,

    /// Regex matched against the lowercased text (URLs, promotional markers)
    pub marker_pattern: String,

    /// Lowercase prefixes that reject a text
    pub prefixes: Vec<String>,

    /// Lowercase substrings that reject a text
    pub substrings: Vec<String>,

    /// Exact strings (after trimming) that reject a text
    pub exact: Vec<String>,

    /// Minimum number of non-whitespace characters
    pub min_chars: usize,
}

impl Default for NoiseRules {
    fn default() -> Self {
        Self {
            patterns: strings(&[
                r"^\d{1,2} [A-Z]{3,9} \d{4}$",
                r"^\d+(\.\d+)*$",
                r"^\d+\.$",
            ]),
            marker_pattern: r"(www|http|\.com|rsvp|topjump)".to_string(),
            prefixes: strings(&["copyright"]),
            substrings: strings(&["version"]),
            exact: strings(&["International Software Testing Qualifications Board"]),
            min_chars: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyerRules {
    /// Documents with more pages are never flyers
    pub max_pages: u32,

    /// Font size above which a fragment counts as oversized
    pub big_font_size: f32,

    /// Maximum number of oversized fragments
    pub max_big_fonts: usize,

    /// Regex over lowercased text; at least one fragment must match
    pub marker_pattern: String,
}

impl Default for FlyerRules {
    fn default() -> Self {
        Self {
            max_pages: 1,
            big_font_size: 20.0,
            max_big_fonts: 4,
            marker_pattern: r"(rsvp|topjump|see you|\.com|hope)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterRules {
    /// Lowercase phrases that must each appear somewhere in the document
    pub markers: Vec<String>,

    /// Lowercase phrase a heading must contain to be kept
    pub heading_marker: String,
}

impl Default for PosterRules {
    fn default() -> Self {
        Self {
            markers: strings(&["stem pathways", "pathway options"]),
            heading_marker: "pathway options".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseStudyRules {
    /// Lowercase phrases that must each appear on the first page
    pub markers: Vec<String>,

    /// Regex over lowercased text selecting title lines
    pub title_pattern: String,

    /// Title lines may be this much smaller than the body size
    pub title_size_slack: f32,

    /// Exact heading texts to drop (running headers, footers, date line)
    pub denylist: Vec<String>,
}

impl Default for CaseStudyRules {
    fn default() -> Self {
        Self {
            markers: strings(&["to present a proposal for developing", "digital library"]),
            title_pattern: r"(request|proposal|to present|digital library)".to_string(),
            title_size_slack: 1.0,
            denylist: strings(&[
                "Ontario\u{2019}s Libraries",
                "Working Together",
                "quest for Pr",
                "the Business Plan for the Ontario",
                "March 21, 2003",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationFormRules {
    /// Lowercase phrases that must each appear on the first page
    pub markers: Vec<String>,
}

impl Default for ApplicationFormRules {
    fn default() -> Self {
        Self {
            markers: strings(&["ltc advance", "application form"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideRules {
    /// Title phrase that must appear on the first page; also the extracted title
    pub title: String,

    /// A fragment must start with one of these for the family to match
    pub section_prefixes: Vec<String>,

    /// Recurring subsection labels; detection and H2 classification
    pub subsection_labels: Vec<String>,

    /// Regexes for section openers classified as H1
    pub section_patterns: Vec<String>,

    /// Exact texts classified as H1 (e.g. a closing section)
    pub terminal_markers: Vec<String>,

    /// Glyphs that open a bulleted sub-heading
    pub bullet_glyphs: Vec<String>,

    /// Plain-text bullet prefix; only qualifies when the first word is capitalised
    pub hyphen_prefix: String,

    /// Bulleted sub-headings have fewer words than this
    pub max_bullet_words: usize,

    /// Upper bound on characters for the capitalised-bullet check
    pub max_bullet_chars: usize,
}

impl Default for GuideRules {
    fn default() -> Self {
        Self {
            title: "Comprehensive Guide to Major Cities in the South of France".to_string(),
            section_prefixes: strings(&[
                "Marseille:",
                "Nice:",
                "Avignon:",
                "Aix-en-Provence:",
                "Toulouse:",
                "Montpellier:",
                "Perpignan:",
                "Arles:",
                "Carcassonne:",
            ]),
            subsection_labels: strings(&[
                "History",
                "Key Attractions",
                "Cultural Highlights",
                "Local Experiences",
                "Travel Tips",
                "Overview of the Region",
                "Hidden Gems",
                "Cultural Activities",
                "Artistic Heritage",
                "Artistic Influence",
                "Aerospace Industry",
                "Student Life",
                "Cultural Fusion",
                "Medieval Life",
            ]),
            section_patterns: strings(&[r"^[A-Z][a-z]+: The .*", r"^[A-Z][a-z]+: A .*"]),
            terminal_markers: strings(&["Conclusion"]),
            bullet_glyphs: strings(&["\u{2022}"]),
            hyphen_prefix: "- ".to_string(),
            max_bullet_words: 10,
            max_bullet_chars: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingRules {
    /// Candidates must be at least this much larger than the body size
    pub size_delta: f32,

    /// Lowercase phrases that exclude a candidate
    pub excluded_phrases: Vec<String>,

    /// Vertical grid used when deduplicating headings
    pub dedup_bucket: f32,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            size_delta: 2.0,
            excluded_phrases: strings(&["mission statement"]),
            dedup_bucket: 10.0,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
