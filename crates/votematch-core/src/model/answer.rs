use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse mapping from question id to the selected answer. Keys exist only
/// for answered questions; question order comes from the survey, never from
/// this map.
pub type AnswerMap = HashMap<String, AnswerValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerValue {
    StronglyAgree,
    Agree,
    Neutral,
    Disagree,
    StronglyDisagree,
}

impl AnswerValue {
    pub const ORDERED: [AnswerValue; 5] = [
        AnswerValue::StronglyAgree,
        AnswerValue::Agree,
        AnswerValue::Neutral,
        AnswerValue::Disagree,
        AnswerValue::StronglyDisagree,
    ];

    /// Respondent stance on the [-1, 1] scale.
    pub const fn value(self) -> f64 {
        match self {
            AnswerValue::StronglyAgree => 1.0,
            AnswerValue::Agree => 0.5,
            AnswerValue::Neutral => 0.0,
            AnswerValue::Disagree => -0.5,
            AnswerValue::StronglyDisagree => -1.0,
        }
    }

    /// Stable wire code: the option index as presented to the respondent.
    pub const fn code(self) -> u8 {
        match self {
            AnswerValue::StronglyAgree => 0,
            AnswerValue::Agree => 1,
            AnswerValue::Neutral => 2,
            AnswerValue::Disagree => 3,
            AnswerValue::StronglyDisagree => 4,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AnswerValue::StronglyAgree),
            1 => Some(AnswerValue::Agree),
            2 => Some(AnswerValue::Neutral),
            3 => Some(AnswerValue::Disagree),
            4 => Some(AnswerValue::StronglyDisagree),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AnswerValue::StronglyAgree => "Strongly agree",
            AnswerValue::Agree => "Agree",
            AnswerValue::Neutral => "Neutral",
            AnswerValue::Disagree => "Disagree",
            AnswerValue::StronglyDisagree => "Strongly disagree",
        }
    }
}
