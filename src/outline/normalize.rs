//! Raw lines → [`TextFragment`]s.

use crate::error::{Error, Result};
use crate::model::{RawLine, SourceDocument, TextFragment};

/// Normalize every page of a source document, preserving page and line order.
///
/// Lines without visible text are dropped. Lines that would become a
/// fragment but carry an unusable font size or position fail the whole
/// document with [`Error::MalformedFragment`].
pub fn normalize(source: &SourceDocument) -> Result<Vec<TextFragment>> {
    let mut fragments = Vec::with_capacity(source.line_count());

    for (page, lines) in source.pages.iter().enumerate() {
        for (index, line) in lines.iter().enumerate() {
            if let Some(fragment) = normalize_line(line, page as u32, index)? {
                fragments.push(fragment);
            }
        }
    }

    log::debug!(
        "Normalized {} lines into {} fragments",
        source.line_count(),
        fragments.len()
    );
    Ok(fragments)
}

/// Merge one line's spans into a fragment.
///
/// Span texts are joined with single spaces and internal whitespace is
/// collapsed. The line's size is the largest span size.
pub fn normalize_line(line: &RawLine, page: u32, index: usize) -> Result<Option<TextFragment>> {
    let text = line
        .spans
        .iter()
        .flat_map(|span| span.text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| Error::MalformedFragment {
        page,
        line: index,
        reason,
    };

    if !line.y0.is_finite() {
        return Err(malformed(format!("vertical position is {}", line.y0)));
    }

    let mut font_size: f32 = 0.0;
    for span in &line.spans {
        if !span.font_size.is_finite() || span.font_size < 0.0 {
            return Err(malformed(format!("font size is {}", span.font_size)));
        }
        font_size = font_size.max(span.font_size);
    }

    Ok(Some(TextFragment::new(text, font_size, page, line.y0)))
}
