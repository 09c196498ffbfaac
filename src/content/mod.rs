//! Species content files

pub mod loader;
pub mod schema;

pub use loader::{load_species_dir, spawn_species_load, ContentError, SpeciesLoader};
pub use schema::{CensusOrderFile, FocusDef, SpeciesDef, SpeciesFile};
