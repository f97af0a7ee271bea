use serde::{Deserialize, Serialize};

/// An ideological dimension on which both questions and parties sit.
/// Used for labeling and coverage reporting only; the engine treats axis
/// ids as opaque keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub id: String,
    pub name: String,
    pub short_name_key: String,
    pub description: String,
}
