//! Per-game species state saved with the game
//!
//! Only ordered containers are used so that serialized output and checksums
//! don't depend on hash seeds or insertion order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{EmpireId, ObjectId};

pub type HomeworldMap = BTreeMap<String, BTreeSet<ObjectId>>;
pub type EmpireOpinionMap = BTreeMap<String, BTreeMap<EmpireId, f32>>;
pub type SpeciesOpinionMap = BTreeMap<String, BTreeMap<String, f32>>;
pub type ObjectPopulationMap = BTreeMap<String, BTreeMap<ObjectId, f32>>;
pub type ShipsDestroyedMap = BTreeMap<String, BTreeMap<String, u32>>;

/// Everything the registry tracks that changes during a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGameState {
    /// Species name -> planets that are its homeworlds
    #[serde(default)]
    pub homeworlds: HomeworldMap,
    /// Species name -> empire -> opinion of that empire
    #[serde(default)]
    pub empire_opinions: EmpireOpinionMap,
    /// Species name -> other species -> opinion of that species
    #[serde(default)]
    pub species_opinions: SpeciesOpinionMap,
    /// Species name -> object -> population of the species there
    #[serde(default)]
    pub object_populations: ObjectPopulationMap,
    /// Species name -> destroyed species -> ships destroyed
    #[serde(default)]
    pub ships_destroyed: ShipsDestroyedMap,
}

impl SpeciesGameState {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.homeworlds.is_empty()
            && self.empire_opinions.is_empty()
            && self.species_opinions.is_empty()
            && self.object_populations.is_empty()
            && self.ships_destroyed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_uses_sorted_keys() {
        let mut state = SpeciesGameState::default();
        state
            .homeworlds
            .entry("SP_ZEBRA".to_string())
            .or_default()
            .insert(ObjectId(9));
        state
            .homeworlds
            .entry("SP_AARDVARK".to_string())
            .or_default()
            .insert(ObjectId(3));
        state
            .empire_opinions
            .entry("SP_AARDVARK".to_string())
            .or_default()
            .insert(EmpireId(2), 1.5);

        let json = state.to_json().unwrap();
        let a = json.find("SP_AARDVARK").unwrap();
        let z = json.find("SP_ZEBRA").unwrap();
        assert!(a < z);

        let restored = SpeciesGameState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_missing_sections_default() {
        let state = SpeciesGameState::from_json(r#"{"homeworlds": {"SP_A": [1, 2]}}"#).unwrap();
        assert_eq!(state.homeworlds["SP_A"].len(), 2);
        assert!(state.empire_opinions.is_empty());
        assert!(!state.is_empty());
    }
}
