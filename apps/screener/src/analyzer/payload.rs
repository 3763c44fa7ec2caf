//! Wire shapes of the Analyzer response and their decoding into `AnalysisResult`.
//!
//! Two shapes exist in the wild. The breakdown shape is canonical; the older
//! two-score shape is only decoded when explicitly selected. Nothing here sniffs
//! the body to guess which one it got.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AnalysisResult, ImprovementTip, Keyword, ScoreBreakdown};

const DEFAULT_GRAMMAR_SCORE: f64 = 100.0;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Score field '{field}' is not a finite number")]
    NonFinite { field: &'static str },

    #[error("Tip priority {priority} is outside 1..=3")]
    InvalidPriority { priority: i64 },

    #[error("Missing keyword with empty text")]
    EmptyKeyword,

    #[error("Missing keyword '{keyword}' has non-positive importance {importance}")]
    NonPositiveImportance { keyword: String, importance: f64 },
}

/// Which response contract the Analyzer speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    /// `overall_ats_score` + `score_breakdown` + tips.
    #[default]
    Breakdown,
    /// `semantic_score` (0 – 1) + `keyword_match_score` (0 – 100), no tips.
    Legacy,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadShape::Breakdown => write!(f, "breakdown"),
            PayloadShape::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for PayloadShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakdown" => Ok(PayloadShape::Breakdown),
            "legacy" => Ok(PayloadShape::Legacy),
            other => Err(format!(
                "unknown payload shape '{other}' (expected 'breakdown' or 'legacy')"
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MissingKeywordPayload {
    keyword: String,
    importance: f64,
}

#[derive(Debug, Deserialize)]
struct TipPayload {
    category: String,
    tip: String,
    priority: i64,
}

#[derive(Debug, Deserialize)]
struct ScoreBreakdownPayload {
    keyword_match: f64,
    semantic_similarity: f64,
    skills_coverage: f64,
    experience_relevance: f64,
    grammar_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BreakdownPayload {
    overall_ats_score: f64,
    score_breakdown: ScoreBreakdownPayload,
    #[serde(default)]
    missing_keywords: Vec<MissingKeywordPayload>,
    #[serde(default)]
    detected_keywords: Vec<String>,
    #[serde(default)]
    improvement_tips: Vec<TipPayload>,
}

#[derive(Debug, Deserialize)]
struct LegacyPayload {
    semantic_score: f64,
    keyword_match_score: f64,
    #[serde(default)]
    missing_keywords: Vec<MissingKeywordPayload>,
    #[serde(default)]
    detected_keywords: Vec<String>,
}

/// Decodes a success body according to `shape`.
pub fn decode(shape: PayloadShape, body: &str) -> Result<AnalysisResult, PayloadError> {
    match shape {
        PayloadShape::Breakdown => from_breakdown(serde_json::from_str(body)?),
        PayloadShape::Legacy => from_legacy(serde_json::from_str(body)?),
    }
}

fn from_breakdown(payload: BreakdownPayload) -> Result<AnalysisResult, PayloadError> {
    let b = payload.score_breakdown;
    let breakdown = ScoreBreakdown {
        keyword_match: finite("keyword_match", b.keyword_match)?,
        semantic_similarity: finite("semantic_similarity", b.semantic_similarity)?,
        skills_coverage: finite("skills_coverage", b.skills_coverage)?,
        experience_relevance: finite("experience_relevance", b.experience_relevance)?,
        grammar: finite("grammar_score", b.grammar_score.unwrap_or(DEFAULT_GRAMMAR_SCORE))?,
    };

    let tips = payload
        .improvement_tips
        .into_iter()
        .map(|t| {
            let priority = match t.priority {
                1..=3 => t.priority as u8,
                other => return Err(PayloadError::InvalidPriority { priority: other }),
            };
            Ok(ImprovementTip {
                category: t.category,
                tip: t.tip,
                priority,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisResult {
        overall_score: finite("overall_ats_score", payload.overall_ats_score)?,
        breakdown,
        missing_keywords: keywords(payload.missing_keywords)?,
        detected_keywords: payload.detected_keywords,
        tips,
    })
}

/// Maps the two-score shape onto the canonical result.
///
/// The older service computed its keyword score as JD-skill coverage, so it
/// stands in for skills coverage; the semantic percentage stands in for
/// experience relevance. The overall score is the mean of the two.
fn from_legacy(payload: LegacyPayload) -> Result<AnalysisResult, PayloadError> {
    let semantic = finite("semantic_score", payload.semantic_score)? * 100.0;
    let keyword = finite("keyword_match_score", payload.keyword_match_score)?;

    Ok(AnalysisResult {
        overall_score: (semantic + keyword) / 2.0,
        breakdown: ScoreBreakdown {
            keyword_match: keyword,
            semantic_similarity: semantic,
            skills_coverage: keyword,
            experience_relevance: semantic,
            grammar: DEFAULT_GRAMMAR_SCORE,
        },
        missing_keywords: keywords(payload.missing_keywords)?,
        detected_keywords: payload.detected_keywords,
        tips: Vec::new(),
    })
}

fn keywords(raw: Vec<MissingKeywordPayload>) -> Result<Vec<Keyword>, PayloadError> {
    raw.into_iter()
        .map(|k| {
            if k.keyword.trim().is_empty() {
                return Err(PayloadError::EmptyKeyword);
            }
            let importance = finite("importance", k.importance)?;
            if importance <= 0.0 {
                return Err(PayloadError::NonPositiveImportance {
                    keyword: k.keyword,
                    importance,
                });
            }
            Ok(Keyword {
                text: k.keyword,
                importance,
            })
        })
        .collect()
}

fn finite(field: &'static str, value: f64) -> Result<f64, PayloadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PayloadError::NonFinite { field })
    }
}
