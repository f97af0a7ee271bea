use crate::model::question::{Question, QuestionMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named presets selecting how many questions a survey asks. `quick` and
/// `balanced` draw fixed id lists from the survey plan; `full` covers the
/// whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyMode {
    Quick,
    Balanced,
    #[default]
    Full,
}

impl SurveyMode {
    pub const ALL: [SurveyMode; 3] = [
        SurveyMode::Quick,
        SurveyMode::Balanced,
        SurveyMode::Full,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SurveyMode::Quick => "quick",
            SurveyMode::Balanced => "balanced",
            SurveyMode::Full => "full",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "quick" => Some(SurveyMode::Quick),
            "balanced" => Some(SurveyMode::Balanced),
            "full" => Some(SurveyMode::Full),
            _ => None,
        }
    }
}

/// Mode-to-question-id lists from the surveys catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyPlan {
    surveys: HashMap<String, Vec<String>>,
}

impl SurveyPlan {
    pub fn new(surveys: HashMap<String, Vec<String>>) -> Self {
        Self { surveys }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn ids_for(&self, mode: SurveyMode) -> &[String] {
        self.surveys
            .get(mode.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Localized text lookup supplied by the host; called once per question per
/// survey load, and the resolved text is never cached here.
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

/// Resolve ids against the catalog in caller order, attaching localized
/// text. Ids missing from the catalog are skipped, not an error; the order
/// of the remaining questions is exactly the caller's. That ordering is
/// what keeps positional share tokens stable across sessions.
pub fn resolve_questions(
    ids: &[String],
    metadata: &[QuestionMetadata],
    translator: &dyn Translate,
) -> Vec<Question> {
    ids.iter()
        .filter_map(|id| metadata.iter().find(|entry| &entry.id == id))
        .map(|entry| resolve_one(entry, translator))
        .collect()
}

/// Select the survey's question list: an explicit id list always wins over
/// the mode default; an empty plan entry falls back to the whole catalog.
pub fn select_questions(
    mode: SurveyMode,
    override_ids: Option<&[String]>,
    plan: &SurveyPlan,
    metadata: &[QuestionMetadata],
    translator: &dyn Translate,
) -> Vec<Question> {
    let ids: &[String] = match override_ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => plan.ids_for(mode),
    };
    if ids.is_empty() {
        return metadata
            .iter()
            .map(|entry| resolve_one(entry, translator))
            .collect();
    }
    resolve_questions(ids, metadata, translator)
}

fn resolve_one(entry: &QuestionMetadata, translator: &dyn Translate) -> Question {
    Question {
        id: entry.id.clone(),
        text: translator.translate(&entry.text_key),
        text_key: entry.text_key.clone(),
        axis: entry.axis.clone(),
        weight: entry.weight,
        direction: entry.direction,
        options: entry.options.clone(),
    }
}
