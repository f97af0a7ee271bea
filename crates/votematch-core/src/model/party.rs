use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display record for a party. Stances live in [`PartyPositions`], keyed by
/// party id, so the display catalog and the position catalog can evolve
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    pub name: String,
    pub short: String,
    pub description_key: String,
    pub ideology_key: String,
    pub colour: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub website: String,
}

/// Party stances per axis, typically in [-1, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyPositions {
    positions: HashMap<String, HashMap<String, f64>>,
}

impl PartyPositions {
    pub fn new(positions: HashMap<String, HashMap<String, f64>>) -> Self {
        Self { positions }
    }

    pub fn stance(&self, party_id: &str, axis_id: &str) -> Option<f64> {
        self.positions.get(party_id)?.get(axis_id).copied()
    }

    pub fn axes_for(&self, party_id: &str) -> Option<&HashMap<String, f64>> {
        self.positions.get(party_id)
    }

    pub fn party_ids(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
