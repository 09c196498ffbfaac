use thiserror::Error;

/// Reasons a species definition is rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeciesError {
    #[error("Species name must not be empty")]
    EmptyName,

    #[error("Species {species}: default focus {focus:?} is not one of its foci")]
    UnknownDefaultFocus { species: String, focus: String },

    #[error("Species {species}: focus {focus:?} is declared more than once")]
    DuplicateFocus { species: String, focus: String },

    #[error("Species {species}: spawn rate {rate} must be finite and non-negative")]
    InvalidSpawnRate { species: String, rate: f32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SpeciesError>;
