pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, SpeciesConfig};
pub use error::{Result, SpeciesError};
pub use types::{EmpireId, ObjectId, ALL_EMPIRES, INVALID_OBJECT_ID};
