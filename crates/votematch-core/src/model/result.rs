use crate::model::party::Party;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyScore {
    pub party: Party,
    /// Normalized alignment in [-1, 1].
    pub alignment_score: f64,
    /// Per-axis normalized scores, only for axes the respondent touched.
    pub axis_scores: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisContribution {
    pub axis_id: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisCoverage {
    pub axis_id: String,
    pub questions_answered: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub primary: PartyScore,
    pub alternatives: Vec<PartyScore>,
    pub all_scores: Vec<PartyScore>,
    pub confidence: Confidence,
    pub timestamp_ms: u64,
    /// Display summaries; never feed back into the ranking.
    pub top_axes: Vec<AxisContribution>,
    pub answered_axes: Vec<AxisCoverage>,
}

impl QuizResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
