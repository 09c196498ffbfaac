//! Species content model and terraforming resolution

pub mod checksum;
pub mod condition;
pub mod effects;
pub mod focus;
pub mod planet;
pub mod species;
pub mod terraform;

pub use checksum::CheckSum;
pub use condition::{Candidate, Condition, LocationPredicate};
pub use effects::{EffectGroup, EffectsGroupDef, MeterEffect};
pub use focus::FocusType;
pub use planet::{PlanetEnvironment, PlanetType};
pub use species::{Species, SpeciesBuilder};
pub use terraform::{Direction, TerraformRing, TerraformRoute};
