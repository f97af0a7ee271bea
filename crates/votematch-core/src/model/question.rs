use crate::model::answer::AnswerValue;
use serde::{Deserialize, Serialize};

/// Orientation of a statement relative to its axis. Agreeing with a
/// `Negative` statement pulls the respondent toward the axis' -1 pole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Positive,
    Negative,
}

impl Direction {
    pub const fn sign(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: f64,
    pub label: String,
}

impl AnswerOption {
    /// The five-point agree/disagree scale every shipped question uses.
    pub fn standard() -> Vec<AnswerOption> {
        AnswerValue::ORDERED
            .iter()
            .map(|answer| AnswerOption {
                value: answer.value(),
                label: answer.label().to_string(),
            })
            .collect()
    }
}

/// Catalog entry for a question, before localization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMetadata {
    pub id: String,
    pub text_key: String,
    pub axis: String,
    pub weight: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default = "AnswerOption::standard")]
    pub options: Vec<AnswerOption>,
}

/// A fully resolved question with localized text attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub text_key: String,
    pub axis: String,
    pub weight: f64,
    pub direction: Direction,
    pub options: Vec<AnswerOption>,
}
