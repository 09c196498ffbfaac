//! Stellar Species - species catalogue, terraforming preferences and
//! per-game species state for a space strategy game

pub mod content;
pub mod core;
pub mod registry;
pub mod universe;
