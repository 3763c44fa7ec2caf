use serde::{Deserialize, Serialize};

/// A job-description keyword the resume does not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    /// Relative weight (JD frequency on the reference Analyzer). Not bounded above.
    pub importance: f64,
}

/// Per-dimension scores, each on a 0 – 100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: f64,
    pub semantic_similarity: f64,
    pub skills_coverage: f64,
    pub experience_relevance: f64,
    /// 100 when the Analyzer omits it.
    pub grammar: f64,
}

/// An actionable suggestion. Priority 1 is the most urgent, 3 the least.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementTip {
    pub category: String,
    pub tip: String,
    pub priority: u8,
}

impl ImprovementTip {
    pub fn is_urgent(&self) -> bool {
        self.priority == 1
    }
}

/// Canonical analysis result, independent of the wire shape it was decoded from.
///
/// List order is display order and is never re-sorted downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub missing_keywords: Vec<Keyword>,
    pub detected_keywords: Vec<String>,
    pub tips: Vec<ImprovementTip>,
}
