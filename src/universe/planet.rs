//! Planet types and species environment ratings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surface/composition category of a planet
///
/// Declaration order is significant: the first nine variants form the
/// terraforming ring in cyclic order, the last two are never terraformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetType {
    Swamp,
    Toxic,
    Inferno,
    Radiated,
    Barren,
    Tundra,
    Desert,
    Terran,
    Ocean,
    Asteroids,
    GasGiant,
}

impl PlanetType {
    pub const ALL: [PlanetType; 11] = [
        PlanetType::Swamp,
        PlanetType::Toxic,
        PlanetType::Inferno,
        PlanetType::Radiated,
        PlanetType::Barren,
        PlanetType::Tundra,
        PlanetType::Desert,
        PlanetType::Terran,
        PlanetType::Ocean,
        PlanetType::Asteroids,
        PlanetType::GasGiant,
    ];

    /// The terraforming cycle; Ocean wraps around to Swamp
    pub const TERRAFORM_RING: [PlanetType; 9] = [
        PlanetType::Swamp,
        PlanetType::Toxic,
        PlanetType::Inferno,
        PlanetType::Radiated,
        PlanetType::Barren,
        PlanetType::Tundra,
        PlanetType::Desert,
        PlanetType::Terran,
        PlanetType::Ocean,
    ];

    /// Gas giants and asteroid fields can't change type
    pub fn is_terraformable(self) -> bool {
        !matches!(self, PlanetType::Asteroids | PlanetType::GasGiant)
    }

    /// Content identifier, e.g. `PT_GASGIANT`
    pub fn content_name(self) -> &'static str {
        match self {
            PlanetType::Swamp => "PT_SWAMP",
            PlanetType::Toxic => "PT_TOXIC",
            PlanetType::Inferno => "PT_INFERNO",
            PlanetType::Radiated => "PT_RADIATED",
            PlanetType::Barren => "PT_BARREN",
            PlanetType::Tundra => "PT_TUNDRA",
            PlanetType::Desert => "PT_DESERT",
            PlanetType::Terran => "PT_TERRAN",
            PlanetType::Ocean => "PT_OCEAN",
            PlanetType::Asteroids => "PT_ASTEROIDS",
            PlanetType::GasGiant => "PT_GASGIANT",
        }
    }

    fn snake_name(self) -> &'static str {
        match self {
            PlanetType::Swamp => "swamp",
            PlanetType::Toxic => "toxic",
            PlanetType::Inferno => "inferno",
            PlanetType::Radiated => "radiated",
            PlanetType::Barren => "barren",
            PlanetType::Tundra => "tundra",
            PlanetType::Desert => "desert",
            PlanetType::Terran => "terran",
            PlanetType::Ocean => "ocean",
            PlanetType::Asteroids => "asteroids",
            PlanetType::GasGiant => "gas_giant",
        }
    }
}

impl fmt::Display for PlanetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snake_name())
    }
}

/// Error returned when a planet type or environment name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl FromStr for PlanetType {
    type Err = ParseNameError;

    /// Accepts `gas_giant`, `GasGiant`, `gasgiant` and `PT_GASGIANT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .trim_start_matches("PT_")
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        PlanetType::ALL
            .into_iter()
            .find(|pt| pt.snake_name().replace('_', "") == wanted)
            .ok_or_else(|| ParseNameError {
                kind: "planet type",
                value: s.to_string(),
            })
    }
}

/// How well a species fares on a planet type; higher is better
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanetEnvironment {
    #[default]
    Uninhabitable,
    Hostile,
    Poor,
    Adequate,
    Good,
}

impl PlanetEnvironment {
    /// Number of valid environment ratings
    pub const COUNT: usize = 5;

    pub const ALL: [PlanetEnvironment; Self::COUNT] = [
        PlanetEnvironment::Uninhabitable,
        PlanetEnvironment::Hostile,
        PlanetEnvironment::Poor,
        PlanetEnvironment::Adequate,
        PlanetEnvironment::Good,
    ];

    pub fn content_name(self) -> &'static str {
        match self {
            PlanetEnvironment::Uninhabitable => "PE_UNINHABITABLE",
            PlanetEnvironment::Hostile => "PE_HOSTILE",
            PlanetEnvironment::Poor => "PE_POOR",
            PlanetEnvironment::Adequate => "PE_ADEQUATE",
            PlanetEnvironment::Good => "PE_GOOD",
        }
    }
}

impl fmt::Display for PlanetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanetEnvironment::Uninhabitable => "uninhabitable",
            PlanetEnvironment::Hostile => "hostile",
            PlanetEnvironment::Poor => "poor",
            PlanetEnvironment::Adequate => "adequate",
            PlanetEnvironment::Good => "good",
        };
        f.write_str(name)
    }
}

impl FromStr for PlanetEnvironment {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches("PE_").to_ascii_lowercase();
        PlanetEnvironment::ALL
            .into_iter()
            .find(|pe| pe.to_string() == wanted)
            .ok_or_else(|| ParseNameError {
                kind: "planet environment",
                value: s.to_string(),
            })
    }
}
