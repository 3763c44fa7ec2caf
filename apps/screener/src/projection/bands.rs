use serde::{Deserialize, Serialize};

/// Semantic colour slot; the view maps it to an actual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandColor {
    Success,
    Warning,
    Error,
}

/// Contiguous score range with one label and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsWork,
    Poor,
}

impl ScoreBand {
    /// Bands are checked top-down and each lower bound is inclusive.
    /// Anything that fails every comparison (including NaN) is `Poor`.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::NeedsWork
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent Match",
            ScoreBand::Good => "Good Match",
            ScoreBand::NeedsWork => "Needs Work",
            ScoreBand::Poor => "Poor Match",
        }
    }

    pub fn color(self) -> BandColor {
        match self {
            ScoreBand::Excellent => BandColor::Success,
            ScoreBand::Good | ScoreBand::NeedsWork => BandColor::Warning,
            ScoreBand::Poor => BandColor::Error,
        }
    }
}
