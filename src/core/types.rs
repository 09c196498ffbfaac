//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an empire (player or AI faction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmpireId(pub i32);

/// Owner value for objects no empire controls
pub const ALL_EMPIRES: EmpireId = EmpireId(-1);

impl EmpireId {
    /// True for the "no owner" sentinel
    pub fn is_unowned(self) -> bool {
        self == ALL_EMPIRES
    }
}

impl fmt::Display for EmpireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a universe object (planet, ship, building)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub i32);

pub const INVALID_OBJECT_ID: ObjectId = ObjectId(-1);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
