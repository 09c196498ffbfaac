//! Species content schema for TOML deserialization.
//!
//! A species file holds one or more `[[species]]` tables. The census order
//! lives in its own file at the content root.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::universe::condition::Condition;
use crate::universe::effects::EffectsGroupDef;
use crate::universe::planet::{PlanetEnvironment, PlanetType};

/// Top-level layout of a species file
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesFile {
    #[serde(default)]
    pub species: Vec<SpeciesDef>,
}

/// One species definition as written in content
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesDef {
    /// Unique identifier, e.g. `SP_HUMAN`
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gameplay_description: String,
    /// Allowed foci, in display order
    #[serde(default)]
    pub foci: Vec<FocusDef>,
    #[serde(default)]
    pub default_focus: String,
    /// Planet type -> environment; unlisted types are uninhabitable
    #[serde(default)]
    pub environments: BTreeMap<PlanetType, PlanetEnvironment>,
    #[serde(default)]
    pub effects: Vec<EffectsGroupDef>,
    #[serde(default)]
    pub location: Option<Condition>,
    #[serde(default)]
    pub combat_targets: Option<Condition>,
    #[serde(default = "default_true")]
    pub playable: bool,
    #[serde(default = "default_true")]
    pub native: bool,
    #[serde(default = "default_true")]
    pub can_colonize: bool,
    #[serde(default = "default_true")]
    pub can_produce_ships: bool,
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub spawn_rate: Option<f32>,
    #[serde(default)]
    pub spawn_limit: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub graphic: String,
}

fn default_true() -> bool {
    true
}

/// Focus definition inside a species
#[derive(Debug, Clone, Deserialize)]
pub struct FocusDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Condition,
    #[serde(default)]
    pub graphic: String,
}

/// Census order file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CensusOrderFile {
    #[serde(default)]
    pub order: Vec<String>,
}
