use parking_lot::RwLock;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use votematch_core::model::axis::Axis;
use votematch_core::model::party::{Party, PartyPositions};
use votematch_core::model::question::QuestionMetadata;
use votematch_core::survey::{SurveyMode, SurveyPlan};

const AXES_FILE: &str = "axes.json";
const PARTIES_FILE: &str = "parties.json";
const POSITIONS_FILE: &str = "party_positions.json";
const QUESTIONS_FILE: &str = "questions.json";
const SURVEYS_FILE: &str = "surveys.json";

/// Errors surfaced when loading the static catalogs. Any of these is fatal
/// at startup: the engine cannot run without its data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse catalog {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("invalid catalog data in {path:?}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[derive(Debug, Deserialize)]
struct AxesFile {
    axes: Vec<Axis>,
}

#[derive(Debug, Deserialize)]
struct QuestionsFile {
    questions: Vec<QuestionMetadata>,
}

#[derive(Debug, Deserialize)]
struct PositionsFile {
    parties: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Default)]
struct CatalogCache {
    axes: Option<Arc<Vec<Axis>>>,
    parties: Option<Arc<Vec<Party>>>,
    questions: Option<Arc<Vec<QuestionMetadata>>>,
    positions: Option<Arc<PartyPositions>>,
    plan: Option<Arc<SurveyPlan>>,
}

/// Loader for the read-only data catalogs, constructed once at startup and
/// passed by reference to consumers. Each catalog is parsed lazily and
/// memoized; `clear_caches` is the only invalidation.
#[derive(Debug)]
pub struct CatalogStore {
    root: PathBuf,
    cache: RwLock<CatalogCache>,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(CatalogCache::default()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn axes(&self) -> Result<Arc<Vec<Axis>>, CatalogError> {
        if let Some(axes) = self.cache.read().axes.clone() {
            return Ok(axes);
        }
        let path = self.root.join(AXES_FILE);
        let file: AxesFile = read_json(&path)?;
        if file.axes.is_empty() {
            return Err(CatalogError::Invalid {
                path,
                message: "axes list is empty".to_string(),
            });
        }
        debug!(count = file.axes.len(), "loaded axes catalog");
        let axes = Arc::new(file.axes);
        self.cache.write().axes = Some(axes.clone());
        Ok(axes)
    }

    /// Parties sorted by name: the deterministic tie-break order the
    /// scoring engine relies on.
    pub fn parties(&self) -> Result<Arc<Vec<Party>>, CatalogError> {
        if let Some(parties) = self.cache.read().parties.clone() {
            return Ok(parties);
        }
        let path = self.root.join(PARTIES_FILE);
        let mut parties: Vec<Party> = read_json(&path)?;
        if parties.is_empty() {
            return Err(CatalogError::Invalid {
                path,
                message: "parties list is empty".to_string(),
            });
        }
        parties.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = parties.len(), "loaded parties catalog");
        let parties = Arc::new(parties);
        self.cache.write().parties = Some(parties.clone());
        Ok(parties)
    }

    pub fn questions(&self) -> Result<Arc<Vec<QuestionMetadata>>, CatalogError> {
        if let Some(questions) = self.cache.read().questions.clone() {
            return Ok(questions);
        }
        let path = self.root.join(QUESTIONS_FILE);
        let file: QuestionsFile = read_json(&path)?;
        if file.questions.is_empty() {
            return Err(CatalogError::Invalid {
                path,
                message: "questions list is empty".to_string(),
            });
        }
        debug!(count = file.questions.len(), "loaded questions catalog");
        let questions = Arc::new(file.questions);
        self.cache.write().questions = Some(questions.clone());
        Ok(questions)
    }

    pub fn party_positions(&self) -> Result<Arc<PartyPositions>, CatalogError> {
        if let Some(positions) = self.cache.read().positions.clone() {
            return Ok(positions);
        }
        let path = self.root.join(POSITIONS_FILE);
        let file: PositionsFile = read_json(&path)?;
        let positions = Arc::new(PartyPositions::new(file.parties));
        self.cache.write().positions = Some(positions.clone());
        Ok(positions)
    }

    pub fn survey_plan(&self) -> Result<Arc<SurveyPlan>, CatalogError> {
        if let Some(plan) = self.cache.read().plan.clone() {
            return Ok(plan);
        }
        let path = self.root.join(SURVEYS_FILE);
        let plan: SurveyPlan = read_json(&path)?;
        let plan = Arc::new(plan);
        self.cache.write().plan = Some(plan.clone());
        Ok(plan)
    }

    pub fn clear_caches(&self) {
        *self.cache.write() = CatalogCache::default();
    }

    /// Load every catalog and cross-check them. Called once at startup;
    /// failure means the data directory is unusable.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let axes = self.axes()?;
        let parties = self.parties()?;
        let questions = self.questions()?;
        let positions = self.party_positions()?;
        let plan = self.survey_plan()?;

        let axis_ids: HashSet<&str> = axes.iter().map(|axis| axis.id.as_str()).collect();
        let mut question_ids: HashSet<&str> = HashSet::new();

        let questions_path = self.root.join(QUESTIONS_FILE);
        for question in questions.iter() {
            if !question_ids.insert(question.id.as_str()) {
                return Err(CatalogError::Invalid {
                    path: questions_path,
                    message: format!("question '{}' is defined more than once", question.id),
                });
            }
            if question.weight <= 0.0 {
                return Err(CatalogError::Invalid {
                    path: questions_path,
                    message: format!(
                        "question '{}' has non-positive weight {}",
                        question.id, question.weight
                    ),
                });
            }
            if !axis_ids.contains(question.axis.as_str()) {
                return Err(CatalogError::Invalid {
                    path: questions_path,
                    message: format!(
                        "question '{}' references unknown axis '{}'",
                        question.id, question.axis
                    ),
                });
            }
            if question.options.is_empty() {
                return Err(CatalogError::Invalid {
                    path: questions_path,
                    message: format!("question '{}' has no options", question.id),
                });
            }
            for option in &question.options {
                if !(-1.0..=1.0).contains(&option.value) {
                    return Err(CatalogError::Invalid {
                        path: questions_path,
                        message: format!(
                            "question '{}' option value {} is outside [-1, 1]",
                            question.id, option.value
                        ),
                    });
                }
            }
        }

        let positions_path = self.root.join(POSITIONS_FILE);
        let party_ids: HashSet<&str> = parties.iter().map(|party| party.id.as_str()).collect();
        for party in parties.iter() {
            let Some(stances) = positions.axes_for(&party.id) else {
                return Err(CatalogError::Invalid {
                    path: positions_path,
                    message: format!("party '{}' has no positions entry", party.id),
                });
            };
            for (axis_id, stance) in stances {
                if !axis_ids.contains(axis_id.as_str()) {
                    return Err(CatalogError::Invalid {
                        path: positions_path,
                        message: format!(
                            "party '{}' positioned on unknown axis '{axis_id}'",
                            party.id
                        ),
                    });
                }
                if !(-1.0..=1.0).contains(stance) {
                    return Err(CatalogError::Invalid {
                        path: positions_path,
                        message: format!(
                            "party '{}' stance {stance} on axis '{axis_id}' is outside [-1, 1]",
                            party.id
                        ),
                    });
                }
            }
        }
        for party_id in positions.party_ids() {
            if !party_ids.contains(party_id) {
                return Err(CatalogError::Invalid {
                    path: positions_path,
                    message: format!("positions entry for unknown party '{party_id}'"),
                });
            }
        }

        // Unknown ids in survey lists are skipped downstream, not fatal.
        for mode in SurveyMode::ALL {
            for id in plan.ids_for(mode) {
                if !question_ids.contains(id.as_str()) {
                    warn!(
                        mode = mode.as_str(),
                        question = id.as_str(),
                        "survey list references unknown question"
                    );
                }
            }
        }

        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CatalogError::Parse {
        source,
        path: path.to_path_buf(),
    })
}
