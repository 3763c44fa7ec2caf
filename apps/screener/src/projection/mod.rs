//! Turns a raw `AnalysisResult` into display-ready values.
//!
//! Everything here is pure: the projector reads its input by reference, keeps no
//! state between calls and returns identical output for identical input. The
//! `ViewModel` it produces is fully recomputable and is never persisted.

pub mod bands;
pub mod geometry;
pub mod guidance;

use serde::{Deserialize, Serialize};

use crate::models::{AnalysisResult, Keyword};

pub use bands::{BandColor, ScoreBand};
pub use geometry::{arc, ArcGeometry};

pub const MISSING_KEYWORD_CAP: usize = 15;
pub const DETECTED_KEYWORD_CAP: usize = 20;

/// A missing keyword is high priority when its importance is strictly above this.
/// Earlier Analyzer builds flagged anything above 1; the current one reports raw JD
/// frequencies, where 2 separates repeated requirements from passing mentions.
pub const DEFAULT_HIGH_PRIORITY_IMPORTANCE: f64 = 2.0;

/// Semantic similarity below this (0 – 100 scale) triggers the alignment block.
pub const SEMANTIC_ALIGNMENT_THRESHOLD: f64 = 80.0;

pub const RING_DIAMETER: f64 = 160.0;
pub const RING_STROKE_WIDTH: f64 = 12.0;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub missing_keyword_cap: usize,
    pub detected_keyword_cap: usize,
    pub high_priority_importance: f64,
    pub semantic_alignment_threshold: f64,
    pub ring_diameter: f64,
    pub ring_stroke_width: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            missing_keyword_cap: MISSING_KEYWORD_CAP,
            detected_keyword_cap: DETECTED_KEYWORD_CAP,
            high_priority_importance: DEFAULT_HIGH_PRIORITY_IMPORTANCE,
            semantic_alignment_threshold: SEMANTIC_ALIGNMENT_THRESHOLD,
            ring_diameter: RING_DIAMETER,
            ring_stroke_width: RING_STROKE_WIDTH,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// View model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallScore {
    pub value: f64,
    /// One decimal place, e.g. "85.0%".
    pub display: String,
    pub band: ScoreBand,
    pub label: &'static str,
    pub color: BandColor,
    pub arc: ArcGeometry,
}

/// One breakdown dimension, ready for a labelled progress bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
    /// Bar fill in 0.0 – 1.0, clamped.
    pub bar_fraction: f64,
    pub color: BandColor,
}

/// Count of entries left out of a capped list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overflow {
    pub remaining: usize,
    /// "+N more"
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruncatedList<T> {
    pub items: Vec<T>,
    pub overflow: Option<Overflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingKeywordView {
    pub text: String,
    pub importance: f64,
    pub high_priority: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGapBlock {
    pub title: &'static str,
    pub intro: &'static str,
    /// Every missing keyword, in received order, joined with ", ". Not capped.
    pub keywords: String,
    /// Set when at least one missing keyword is high priority.
    pub focus_high_priority: Option<&'static str>,
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticAlignmentBlock {
    pub title: &'static str,
    pub summary: &'static str,
    pub actions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralTipsBlock {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipView {
    pub category: String,
    pub tip: String,
    pub priority: u8,
    pub priority_label: &'static str,
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub overall: OverallScore,
    pub breakdown: Vec<ScoreRow>,
    pub missing_keywords: TruncatedList<MissingKeywordView>,
    /// Set only when the Analyzer reported no missing keywords at all.
    pub no_missing_keywords: Option<&'static str>,
    pub detected_keywords: TruncatedList<String>,
    pub skill_gap: Option<SkillGapBlock>,
    pub semantic_alignment: Option<SemanticAlignmentBlock>,
    pub general_tips: GeneralTipsBlock,
    pub tips: Vec<TipView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Projector
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ResultsProjector {
    config: ProjectionConfig,
}

impl ResultsProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn project(&self, result: &AnalysisResult) -> ViewModel {
        let missing: Vec<MissingKeywordView> = result
            .missing_keywords
            .iter()
            .map(|k| MissingKeywordView {
                text: k.text.clone(),
                importance: k.importance,
                high_priority: self.is_high_priority(k),
            })
            .collect();

        let skill_gap = self.skill_gap_block(&result.missing_keywords);

        let semantic_alignment = (result.breakdown.semantic_similarity
            < self.config.semantic_alignment_threshold)
            .then(|| SemanticAlignmentBlock {
                title: guidance::SEMANTIC_ALIGNMENT_TITLE,
                summary: guidance::SEMANTIC_ALIGNMENT_SUMMARY,
                actions: guidance::SEMANTIC_ALIGNMENT_ACTIONS.to_vec(),
            });

        ViewModel {
            overall: self.overall(result.overall_score),
            breakdown: breakdown_rows(result),
            missing_keywords: truncate(missing, self.config.missing_keyword_cap),
            no_missing_keywords: result
                .missing_keywords
                .is_empty()
                .then_some(guidance::NO_MISSING_KEYWORDS),
            detected_keywords: truncate(
                result.detected_keywords.clone(),
                self.config.detected_keyword_cap,
            ),
            skill_gap,
            semantic_alignment,
            general_tips: GeneralTipsBlock {
                title: guidance::GENERAL_TIPS_TITLE,
                body: guidance::GENERAL_TIPS_BODY,
            },
            tips: result
                .tips
                .iter()
                .map(|t| TipView {
                    category: t.category.clone(),
                    tip: t.tip.clone(),
                    priority: t.priority,
                    priority_label: priority_label(t.priority),
                    urgent: t.is_urgent(),
                })
                .collect(),
        }
    }

    fn is_high_priority(&self, keyword: &Keyword) -> bool {
        keyword.importance > self.config.high_priority_importance
    }

    fn overall(&self, score: f64) -> OverallScore {
        let band = ScoreBand::from_score(score);
        OverallScore {
            value: score,
            display: percent(score),
            band,
            label: band.label(),
            color: band.color(),
            arc: arc(score, self.config.ring_diameter, self.config.ring_stroke_width),
        }
    }

    fn skill_gap_block(&self, missing: &[Keyword]) -> Option<SkillGapBlock> {
        if missing.is_empty() {
            return None;
        }

        let keywords = missing
            .iter()
            .map(|k| k.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let focus_high_priority = missing
            .iter()
            .any(|k| self.is_high_priority(k))
            .then_some(guidance::SKILL_GAP_FOCUS);

        Some(SkillGapBlock {
            title: guidance::SKILL_GAP_TITLE,
            intro: guidance::SKILL_GAP_INTRO,
            keywords,
            focus_high_priority,
            action: guidance::SKILL_GAP_ACTION,
        })
    }
}

/// Projects with the default caps and thresholds.
pub fn project(result: &AnalysisResult) -> ViewModel {
    ResultsProjector::default().project(result)
}

fn breakdown_rows(result: &AnalysisResult) -> Vec<ScoreRow> {
    let b = &result.breakdown;
    [
        ("Keyword Match", b.keyword_match),
        ("Semantic Similarity", b.semantic_similarity),
        ("Skills Coverage", b.skills_coverage),
        ("Experience Relevance", b.experience_relevance),
        ("Grammar", b.grammar),
    ]
    .into_iter()
    .map(|(label, value)| ScoreRow {
        label,
        value,
        display: percent(value),
        bar_fraction: geometry::clamp_score(value) / 100.0,
        color: ScoreBand::from_score(value).color(),
    })
    .collect()
}

fn truncate<T>(mut items: Vec<T>, cap: usize) -> TruncatedList<T> {
    let overflow = if items.len() > cap {
        let remaining = items.len() - cap;
        items.truncate(cap);
        Some(Overflow {
            remaining,
            label: format!("+{remaining} more"),
        })
    } else {
        None
    };

    TruncatedList { items, overflow }
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn priority_label(priority: u8) -> &'static str {
    match priority {
        1 => "High",
        2 => "Medium",
        _ => "Low",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImprovementTip, ScoreBreakdown};

    fn make_result(overall: f64, missing: Vec<(&str, f64)>) -> AnalysisResult {
        AnalysisResult {
            overall_score: overall,
            breakdown: ScoreBreakdown {
                keyword_match: 70.0,
                semantic_similarity: 85.0,
                skills_coverage: 65.0,
                experience_relevance: 55.0,
                grammar: 100.0,
            },
            missing_keywords: missing
                .into_iter()
                .map(|(text, importance)| Keyword {
                    text: text.to_string(),
                    importance,
                })
                .collect(),
            detected_keywords: vec!["python".to_string(), "docker".to_string()],
            tips: vec![],
        }
    }

    fn n_missing(n: usize) -> Vec<(String, f64)> {
        (0..n).map(|i| (format!("skill-{i}"), 1.0)).collect()
    }

    fn with_missing(n: usize) -> AnalysisResult {
        let owned = n_missing(n);
        make_result(50.0, owned.iter().map(|(s, i)| (s.as_str(), *i)).collect())
    }

    #[test]
    fn test_excellent_with_no_missing_keywords_has_no_skill_gap() {
        let view = project(&make_result(85.0, vec![]));
        assert_eq!(view.overall.label, "Excellent Match");
        assert_eq!(view.overall.color, BandColor::Success);
        assert_eq!(view.overall.display, "85.0%");
        assert!(view.skill_gap.is_none());
        assert_eq!(view.no_missing_keywords, Some(guidance::NO_MISSING_KEYWORDS));
        assert!(view.missing_keywords.items.is_empty());
        assert!(view.missing_keywords.overflow.is_none());
    }

    #[test]
    fn test_missing_keywords_truncated_with_overflow() {
        let view = project(&with_missing(18));
        assert_eq!(view.missing_keywords.items.len(), 15);
        let overflow = view.missing_keywords.overflow.unwrap();
        assert_eq!(overflow.remaining, 3);
        assert_eq!(overflow.label, "+3 more");
        assert_eq!(view.missing_keywords.items[14].text, "skill-14");
    }

    #[test]
    fn test_missing_keywords_at_cap_have_no_overflow() {
        let view = project(&with_missing(15));
        assert_eq!(view.missing_keywords.items.len(), 15);
        assert!(view.missing_keywords.overflow.is_none());
    }

    #[test]
    fn test_detected_keywords_truncated_at_20() {
        let mut result = make_result(50.0, vec![]);
        result.detected_keywords = (0..25).map(|i| format!("kw-{i}")).collect();
        let view = project(&result);
        assert_eq!(view.detected_keywords.items.len(), 20);
        assert_eq!(view.detected_keywords.overflow.unwrap().label, "+5 more");
    }

    #[test]
    fn test_no_missing_keywords_message_absent_when_keywords_missing() {
        let view = project(&make_result(85.0, vec![("kafka", 1.0)]));
        assert!(view.no_missing_keywords.is_none());
    }

    #[test]
    fn test_skill_gap_lists_every_missing_keyword() {
        let view = project(&with_missing(18));
        let block = view.skill_gap.unwrap();
        assert!(block.keywords.starts_with("skill-0, skill-1"));
        assert!(block.keywords.ends_with("skill-17"));
    }

    #[test]
    fn test_high_priority_is_strictly_above_threshold() {
        let view = project(&make_result(
            50.0,
            vec![("kafka", 2.0), ("kubernetes", 3.0), ("rust", 1.0)],
        ));
        let flags: Vec<bool> = view
            .missing_keywords
            .items
            .iter()
            .map(|k| k.high_priority)
            .collect();
        assert_eq!(flags, vec![false, true, false]);
        assert!(view.skill_gap.unwrap().focus_high_priority.is_some());
    }

    #[test]
    fn test_no_focus_message_without_high_priority() {
        let view = project(&make_result(50.0, vec![("kafka", 2.0), ("rust", 1.0)]));
        let block = view.skill_gap.unwrap();
        assert!(block.focus_high_priority.is_none());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let projector = ResultsProjector::new(ProjectionConfig {
            high_priority_importance: 1.0,
            ..ProjectionConfig::default()
        });
        let view = projector.project(&make_result(50.0, vec![("kafka", 2.0)]));
        assert!(view.missing_keywords.items[0].high_priority);
    }

    #[test]
    fn test_semantic_block_below_threshold_only() {
        let mut result = make_result(50.0, vec![]);
        result.breakdown.semantic_similarity = 79.9;
        assert!(project(&result).semantic_alignment.is_some());

        result.breakdown.semantic_similarity = 80.0;
        assert!(project(&result).semantic_alignment.is_none());
    }

    #[test]
    fn test_semantic_block_has_three_actions() {
        let mut result = make_result(50.0, vec![]);
        result.breakdown.semantic_similarity = 40.0;
        let block = project(&result).semantic_alignment.unwrap();
        assert_eq!(block.actions.len(), 3);
    }

    #[test]
    fn test_tips_keep_received_order_and_mark_urgent() {
        let mut result = make_result(50.0, vec![]);
        result.tips = vec![
            ImprovementTip {
                category: "General".to_string(),
                tip: "Use standard headers".to_string(),
                priority: 3,
            },
            ImprovementTip {
                category: "Missing Skills".to_string(),
                tip: "Add kubernetes".to_string(),
                priority: 1,
            },
        ];
        let view = project(&result);
        assert_eq!(view.tips[0].category, "General");
        assert!(!view.tips[0].urgent);
        assert_eq!(view.tips[0].priority_label, "Low");
        assert!(view.tips[1].urgent);
        assert_eq!(view.tips[1].priority_label, "High");
    }

    #[test]
    fn test_breakdown_rows_in_fixed_order() {
        let view = project(&make_result(50.0, vec![]));
        let labels: Vec<&str> = view.breakdown.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "Keyword Match",
                "Semantic Similarity",
                "Skills Coverage",
                "Experience Relevance",
                "Grammar"
            ]
        );
        assert_eq!(view.breakdown[3].color, BandColor::Warning);
        assert_eq!(view.breakdown[4].display, "100.0%");
    }

    #[test]
    fn test_bar_fraction_clamped() {
        let mut result = make_result(50.0, vec![]);
        result.breakdown.keyword_match = 130.0;
        result.breakdown.grammar = -5.0;
        let view = project(&result);
        assert_eq!(view.breakdown[0].bar_fraction, 1.0);
        assert_eq!(view.breakdown[4].bar_fraction, 0.0);
    }

    #[test]
    fn test_out_of_range_overall_clamps_arc() {
        let view = project(&make_result(140.0, vec![]));
        assert_eq!(view.overall.label, "Excellent Match");
        assert_eq!(view.overall.arc.dash_offset, 0.0);
    }

    #[test]
    fn test_projection_is_deterministic_and_leaves_input_alone() {
        let result = make_result(63.0, vec![("kafka", 4.0)]);
        let before = result.clone();
        let a = project(&result);
        let b = project(&result);
        assert_eq!(a, b);
        assert_eq!(result, before);
    }
}
