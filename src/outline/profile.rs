//! Corpus-wide statistics for one document.

use crate::error::{Error, Result};
use crate::model::{DocumentProfile, TextFragment};

use super::detectors::{DetectionInput, DetectorRegistry};

/// Median font size over all fragments.
///
/// For an even number of fragments this is the mean of the two middle
/// sizes. Fails with [`Error::EmptyDocument`] when there is nothing to
/// measure.
pub fn body_font_size(fragments: &[TextFragment]) -> Result<f32> {
    if fragments.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let mut sizes: Vec<f32> = fragments.iter().map(|f| f.font_size).collect();
    sizes.sort_by(f32::total_cmp);

    let mid = sizes.len() / 2;
    let median = if sizes.len() % 2 == 0 {
        (sizes[mid - 1] + sizes[mid]) / 2.0
    } else {
        sizes[mid]
    };
    Ok(median)
}

/// Compute statistics and run the detectors over a complete fragment list.
pub fn profile_document(
    fragments: &[TextFragment],
    page_count: u32,
    registry: &DetectorRegistry,
) -> Result<DocumentProfile> {
    let body_font_size = body_font_size(fragments)?;
    let detected_type = registry.detect(&DetectionInput::new(fragments, page_count));

    log::debug!(
        "Profiled {} fragments over {} pages: body size {:.2}, type {}",
        fragments.len(),
        page_count,
        body_font_size,
        detected_type
    );

    Ok(DocumentProfile {
        body_font_size,
        detected_type,
        page_count,
        fragment_count: fragments.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentType;

    fn sized(sizes: &[f32]) -> Vec<TextFragment> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| TextFragment::new(format!("line {i}"), s, 0, i as f32 * 10.0))
            .collect()
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(body_font_size(&sized(&[14.0, 10.0, 24.0])).unwrap(), 14.0);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(body_font_size(&sized(&[10.0, 12.0, 24.0, 9.0])).unwrap(), 11.0);
        assert_eq!(
            body_font_size(&sized(&[24.0, 24.0, 14.0, 14.0, 14.0, 10.0])).unwrap(),
            14.0
        );
    }

    #[test]
    fn test_median_empty() {
        assert!(matches!(body_font_size(&[]), Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_profile_document() {
        let fragments = sized(&[10.0, 10.0, 10.0, 18.0]);
        let profile = profile_document(&fragments, 3, &DetectorRegistry::new()).unwrap();
        assert_eq!(profile.body_font_size, 10.0);
        assert_eq!(profile.detected_type, DocumentType::Generic);
        assert_eq!(profile.page_count, 3);
        assert_eq!(profile.fragment_count, 4);
    }
}
