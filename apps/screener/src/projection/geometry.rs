//! Stroke parameters for a circular progress arc.

use serde::{Deserialize, Serialize};

/// Stroke parameters for drawing a score as a partially filled circle.
///
/// The ring is drawn with a dash of length `circumference` offset by
/// `dash_offset`: an offset of 0 draws the full ring, an offset equal to
/// the circumference draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

/// Computes ring geometry for `score` in a box of `diameter` with a stroke of `stroke_width`.
///
/// Out-of-range scores are clamped into 0..=100 and NaN is treated as 0.
/// A stroke wider than the diameter yields a zero-radius ring.
pub fn arc(score: f64, diameter: f64, stroke_width: f64) -> ArcGeometry {
    let score = clamp_score(score);
    let radius = ((diameter - stroke_width) / 2.0).max(0.0);
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let dash_offset = circumference * (1.0 - score / 100.0);

    ArcGeometry {
        radius,
        circumference,
        dash_offset,
    }
}

/// Clamps a 0 – 100 score, mapping NaN to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}
