//! Pie-donut encoding of multi-valued localization scores.
//!
//! The donut is drawn as a stroked circle with one dash per locality. The
//! circumference is normalized to [`CIRCUMFERENCE`] units; a dash is described
//! by its length and the dash offset that rotates it into place.

use serde::Serialize;

use aiv_core::models::{GraphNode, LocalityScore, UNKNOWN_LOCALITY};

use crate::palette::LocalityPalette;

pub const CIRCUMFERENCE: f64 = 100.0;

/// A stroke dash starts at 3 o'clock; this moves segment zero to 12 o'clock.
pub const ROTATION_OFFSET: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutSegment {
    pub locality: String,
    pub length: f64,
    pub start: f64,
    pub dash_offset: f64,
    pub start_angle_degrees: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl DonutSegment {
    fn new(locality: &str, start: f64, length: f64) -> Self {
        DonutSegment {
            locality: locality.to_string(),
            length,
            start,
            dash_offset: (CIRCUMFERENCE - start + ROTATION_OFFSET).rem_euclid(CIRCUMFERENCE),
            start_angle_degrees: start / CIRCUMFERENCE * 360.0,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutEncoding {
    pub segments: Vec<DonutSegment>,
    pub neutral: bool,
    visible: bool,
}

impl DonutEncoding {
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the donut; geometry is left alone.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn paint(&mut self, palette: &mut LocalityPalette) {
        for segment in &mut self.segments {
            segment.color = Some(palette.color_for(&segment.locality));
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DonutEncoder;

impl DonutEncoder {
    ///
    /// Lay the scores out clockwise from 12 o'clock, one segment per score in
    /// input order. No scores gives a single neutral segment covering the
    /// whole ring.
    ///
    pub fn encode(&self, scores: &[LocalityScore]) -> DonutEncoding {
        if scores.is_empty() {
            return DonutEncoding {
                segments: vec![DonutSegment::new(UNKNOWN_LOCALITY, 0.0, CIRCUMFERENCE)],
                neutral: true,
                visible: true,
            };
        }

        let mut start = 0.0;
        let segments = scores
            .iter()
            .map(|score| {
                let length = score.fraction * CIRCUMFERENCE;
                let segment = DonutSegment::new(&score.locality, start, length);
                start += length;
                segment
            })
            .collect();
        DonutEncoding {
            segments,
            neutral: false,
            visible: true,
        }
    }

    pub fn encode_node(&self, node: &GraphNode) -> DonutEncoding {
        self.encode(&node.localization_scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn scores(raw: &[(&str, f64)]) -> Vec<LocalityScore> {
        raw.iter()
            .map(|(locality, fraction)| LocalityScore {
                locality: locality.to_string(),
                fraction: *fraction,
            })
            .collect()
    }

    #[rstest]
    fn test_encode_segments() {
        let encoding = DonutEncoder.encode(&scores(&[("nucleus", 0.5), ("cytosol", 0.25), ("plastid", 0.25)]));
        assert!(!encoding.neutral);

        let starts: Vec<f64> = encoding.segments.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0.0, 50.0, 75.0]);
        let offsets: Vec<f64> = encoding.segments.iter().map(|s| s.dash_offset).collect();
        assert_eq!(offsets, vec![25.0, 75.0, 50.0]);
        assert_eq!(encoding.segments[1].start_angle_degrees, 180.0);
    }

    #[rstest]
    #[case(&[("nucleus", 1.0)])]
    #[case(&[("nucleus", 0.6), ("cytosol", 0.3), ("golgi", 0.1)])]
    #[case(&[("nucleus", 0.2), ("cytosol", 0.3)])]
    fn test_total_length_matches_occupied_fraction(#[case] raw: &[(&str, f64)]) {
        let scores = scores(raw);
        let occupied: f64 = scores.iter().map(|s| s.fraction).sum();
        let encoding = DonutEncoder.encode(&scores);
        assert!((encoding.total_length() - occupied * CIRCUMFERENCE).abs() < 1e-9);
    }

    #[rstest]
    fn test_empty_scores_give_neutral_ring() {
        let encoding = DonutEncoder.encode(&[]);
        assert!(encoding.neutral);
        assert_eq!(encoding.segments.len(), 1);
        assert_eq!(encoding.total_length(), CIRCUMFERENCE);
        assert_eq!(encoding.segments[0].locality, UNKNOWN_LOCALITY);
    }

    #[rstest]
    fn test_visibility_keeps_geometry() {
        let mut encoding = DonutEncoder.encode(&scores(&[("nucleus", 0.7), ("cytosol", 0.3)]));
        let before = encoding.segments.clone();
        encoding.set_visible(false);
        assert!(!encoding.is_visible());
        encoding.set_visible(true);
        assert_eq!(encoding.segments, before);
    }

    #[rstest]
    fn test_paint() {
        let mut encoding = DonutEncoder.encode(&scores(&[("nucleus", 1.0)]));
        encoding.paint(&mut LocalityPalette::new(Some(3)));
        assert_eq!(encoding.segments[0].color.as_deref(), Some("#0032FF"));
    }
}
