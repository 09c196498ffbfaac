//! Species registry, pending content handoff and per-game state

pub mod manager;
pub mod pending;
pub mod state;

pub use manager::{CensusOrder, PopulatedObject, SpeciesManager, SpeciesTypeMap, SpeciesTypes};
pub use pending::{Pending, PendingSender, PendingState};
pub use state::SpeciesGameState;
