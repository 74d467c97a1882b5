//! JSON rendering for outline results.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::OutlineResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline result to JSON.
///
/// The record has exactly two keys, `title` and `outline`; each outline
/// entry carries `level`, `text` and `page`.
pub fn to_json(result: &OutlineResult, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            result
                .serialize(&mut ser)
                .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
            buf
        }
        JsonFormat::Compact => serde_json::to_vec(result)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?,
    };

    String::from_utf8(bytes).map_err(|e| Error::Render(format!("Invalid UTF-8 in JSON: {}", e)))
}
