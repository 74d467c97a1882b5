//! Output-side types: headings and the assembled outline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level, bounded to four tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Number of levels the outline can express.
    pub const COUNT: usize = 4;

    /// All levels, outermost first.
    pub const ALL: [Self; Self::COUNT] = [Self::H1, Self::H2, Self::H3, Self::H4];

    /// Map a 0-based font-size rank to a level. Ranks past the last tier have none.
    pub fn from_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(Self::H1),
            1 => Some(Self::H2),
            2 => Some(Self::H3),
            3 => Some(Self::H4),
            _ => None,
        }
    }

    /// Nesting depth (1 = top level).
    pub fn depth(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level
    pub level: HeadingLevel,

    /// Heading text
    pub text: String,

    /// Page index (0-based)
    pub page: u32,

    /// Vertical position, kept for ordering only
    #[serde(skip)]
    pub y0: f32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32, y0: f32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            y0,
        }
    }
}

/// Title and ordered headings of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title; empty when none could be extracted
    pub title: String,

    /// Headings in reading order
    pub outline: Vec<Heading>,
}

impl OutlineResult {
    /// Create a new outline result.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Check if neither a title nor any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Count headings at a given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|h| h.level == level).count()
    }
}
