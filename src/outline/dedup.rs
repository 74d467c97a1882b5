//! Reading order and duplicate removal for heading lists.

use std::collections::HashSet;

use crate::model::{Heading, HeadingLevel};

/// Stable sort into reading order: page ascending, then top to bottom.
pub fn sort_reading_order(headings: &mut [Heading]) {
    headings.sort_by(|a, b| a.page.cmp(&b.page).then(a.y0.total_cmp(&b.y0)));
}

/// Index of the grid cell a vertical position falls in.
///
/// Positions are rounded to the nearest multiple of `bucket`, with exact
/// halves going to the even multiple.
pub fn y_bucket(y0: f32, bucket: f32) -> i64 {
    if bucket <= 0.0 {
        return y0.round_ties_even() as i64;
    }
    (y0 / bucket).round_ties_even() as i64
}

/// Keep the first heading per `(lowercased text, page, y bucket)`.
pub fn dedup_by_position(headings: Vec<Heading>, bucket: f32) -> Vec<Heading> {
    let mut seen: HashSet<(String, u32, i64)> = HashSet::new();
    headings
        .into_iter()
        .filter(|h| {
            seen.insert((
                h.text.trim().to_lowercase(),
                h.page,
                y_bucket(h.y0, bucket),
            ))
        })
        .collect()
}

/// Keep the first heading per exact `(text, page, level)`.
pub fn dedup_by_level(headings: Vec<Heading>) -> Vec<Heading> {
    let mut seen: HashSet<(String, u32, HeadingLevel)> = HashSet::new();
    headings
        .into_iter()
        .filter(|h| seen.insert((h.text.clone(), h.page, h.level)))
        .collect()
}
