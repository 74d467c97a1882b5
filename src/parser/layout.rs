//! Span extraction and line grouping for PDF pages.
//!
//! Walks a page's content stream tracking the text matrix, collects text
//! spans with their font size and baseline position, and groups them into
//! [`RawLine`]s in top-down page coordinates.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{RawLine, RawSpan};

/// Ascender height as a fraction of the font size.
const ASCENT: f32 = 0.8;

/// A text span with position and style information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF user space, growing upwards)
    pub y: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font resource name (e.g., "F1")
    pub font: Vec<u8>,
}

impl TextSpan {
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font: Vec<u8>) -> Self {
        Self {
            text,
            x,
            y,
            font_size,
            font,
        }
    }

    /// Approximate width, assuming an average glyph of half the font size.
    pub fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.font_size * 0.5
    }

    /// Top of the glyph box in PDF user space.
    pub fn top(&self) -> f32 {
        self.y + self.font_size * ASCENT
    }
}

/// Extracts positioned text spans from pages of a loaded document.
pub struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanExtractor<'a> {
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract text spans from a page with position and font information.
    pub fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.get_page_content(page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    /// Get page content stream, concatenating arrays of streams.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content is legal and simply has no text.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        let encoding = fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    /// Walk the content stream operators and collect spans.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut leading: f32 = 0.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            let text = match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                    None
                }
                "ET" => {
                    in_text = false;
                    None
                }
                "Tf" => {
                    if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                        font = name.clone();
                        font_size = get_number(size).unwrap_or(12.0);
                    }
                    None
                }
                "TL" => {
                    leading = op.operands.first().and_then(get_number).unwrap_or(0.0);
                    None
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        let ty = get_number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            leading = -ty;
                        }
                        matrix.translate(get_number(tx).unwrap_or(0.0), ty);
                    }
                    None
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n: Vec<f32> = op
                            .operands
                            .iter()
                            .take(6)
                            .map(|o| get_number(o).unwrap_or(0.0))
                            .collect();
                        matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                    None
                }
                "T*" => {
                    matrix.next_line(leading);
                    None
                }
                "Tj" if in_text => match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(self.decode(fonts, &font, bytes)),
                    _ => None,
                },
                "TJ" if in_text => match op.operands.first() {
                    Some(Object::Array(items)) => Some(self.decode_tj(fonts, &font, items)),
                    _ => None,
                },
                "'" | "\"" => {
                    matrix.next_line(leading);
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    match op.operands.get(index) {
                        Some(Object::String(bytes, _)) if in_text => {
                            Some(self.decode(fonts, &font, bytes))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };

            if let Some(text) = text {
                if !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    spans.push(TextSpan::new(
                        text,
                        x,
                        y,
                        font_size * matrix.scale(),
                        font.clone(),
                    ));
                }
            }
        }

        Ok(spans)
    }

    /// Decode a TJ array, turning large negative kerning into word spaces.
    fn decode_tj(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font: &[u8],
        items: &[Object],
    ) -> String {
        // In thousandths of text space; roughly a word gap for most fonts.
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(fonts, font, bytes)),
                other => {
                    let adjustment = get_number(other).map(|n| -n).unwrap_or(0.0);
                    let needs_space = combined
                        .chars()
                        .last()
                        .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c));
                    if adjustment > SPACE_THRESHOLD && needs_space {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }
}

/// Group spans into lines by baseline and convert to top-down coordinates,
/// measured down from `page_top` (the MediaBox upper edge).
///
/// Spans whose baselines differ by at most 30% of the font size share a
/// line. Within a line, spans are ordered left to right and adjacent spans
/// of the same font and size are merged into one run, inserting a space
/// only where the horizontal gap suggests one.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>, page_top: f32) -> Vec<RawLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut groups: Vec<Vec<TextSpan>> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match (current_y, groups.last_mut()) {
            (Some(y), Some(group)) if (span.y - y).abs() <= tolerance => group.push(span),
            _ => {
                current_y = Some(span.y);
                groups.push(vec![span]);
            }
        }
    }

    groups
        .into_iter()
        .map(|group| build_line(group, page_top))
        .collect()
}

fn build_line(mut group: Vec<TextSpan>, page_top: f32) -> RawLine {
    group.sort_by(|a, b| a.x.total_cmp(&b.x));

    let top = group
        .iter()
        .map(TextSpan::top)
        .fold(f32::NEG_INFINITY, f32::max);
    let mut line = RawLine::new(page_top - top);

    let mut prev: Option<&TextSpan> = None;
    for span in &group {
        let same_run = prev.is_some_and(|p| p.font == span.font && p.font_size == span.font_size);
        match (same_run, line.spans.last_mut(), prev) {
            (true, Some(run), Some(p)) => {
                if needs_space(p, span) {
                    run.text.push(' ');
                }
                run.text.push_str(&span.text);
            }
            _ => line.spans.push(RawSpan::new(span.text.clone(), span.font_size)),
        }
        prev = Some(span);
    }

    line
}

/// Whether a space belongs between two adjacent spans of one run.
fn needs_space(prev: &TextSpan, span: &TextSpan) -> bool {
    let gap = span.x - (prev.x + prev.width());
    let threshold = span.font_size * 0.5 * 0.2;

    let prev_last = prev.text.chars().last();
    let curr_first = span.text.chars().next();
    if prev_last.is_some_and(char::is_whitespace) || curr_first.is_some_and(char::is_whitespace) {
        return false;
    }

    let both_spaceless = prev_last.is_some_and(is_spaceless_script_char)
        && curr_first.is_some_and(is_spaceless_script_char);
    gap > threshold && !both_spaceless
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        // Without a TL operator, assume 12pt leading.
        let leading = if leading > 0.0 { leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, b"F1".to_vec())
    }

    #[test]
    fn test_group_lines_top_down() {
        let spans = vec![
            span("Body", 72.0, 600.0, 10.0),
            span("Title", 72.0, 700.0, 20.0),
            span("more", 200.0, 601.0, 10.0),
        ];
        let lines = group_spans_into_lines(spans, 792.0);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].text, "Title");
        assert_eq!(lines[0].y0, 792.0 - 716.0);
        assert_eq!(lines[1].spans.len(), 1);
        assert_eq!(lines[1].spans[0].text, "Body more");
        assert!(lines[0].y0 < lines[1].y0);
    }

    #[test]
    fn test_font_change_starts_new_span() {
        let mut bold = span("Note:", 72.0, 500.0, 12.0);
        bold.font = b"F2".to_vec();
        let spans = vec![bold, span("read this", 110.0, 500.0, 10.0)];
        let lines = group_spans_into_lines(spans, 792.0);

        assert_eq!(lines.len(), 1);
        let sizes: Vec<_> = lines[0].spans.iter().map(|s| s.font_size).collect();
        assert_eq!(sizes, [12.0, 10.0]);
    }

    #[test]
    fn test_adjacent_glyph_runs_not_split() {
        // "Wor" ends at 72 + 3 * 5 = 87, so "ld" continues the word.
        let spans = vec![span("Wor", 72.0, 400.0, 10.0), span("ld", 87.0, 400.0, 10.0)];
        let lines = group_spans_into_lines(spans, 792.0);
        assert_eq!(lines[0].spans[0].text, "World");
    }

    #[test]
    fn test_cjk_no_space() {
        let prev = span("\u{4E2D}", 0.0, 0.0, 10.0);
        let next = span("\u{6587}", 40.0, 0.0, 10.0);
        assert!(!needs_space(&prev, &next));
        assert!(needs_space(&span("a", 0.0, 0.0, 10.0), &span("b", 40.0, 0.0, 10.0)));
    }

    #[test]
    fn test_text_matrix_leading() {
        let mut m = TextMatrix::default();
        m.set(1.0, 0.0, 0.0, 1.0, 72.0, 700.0);
        m.next_line(14.0);
        assert_eq!(m.position(), (72.0, 686.0));
        m.next_line(0.0);
        assert_eq!(m.position(), (72.0, 674.0));
        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]), "AB");
        assert_eq!(decode_text_simple(&[0x43, 0x61, 0x66, 0xE9]), "Caf\u{e9}");
    }
}
