//! Location predicates attached to species and foci
//!
//! The gameplay layer supplies its own predicate implementations; the
//! `Condition` enum is the data-file form used by the content loader.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{EmpireId, ObjectId, ALL_EMPIRES};

use super::checksum::{combine, CheckSum};
use super::planet::PlanetType;

/// The object a predicate or effect is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub object_id: ObjectId,
    pub owner: EmpireId,
    pub planet_type: Option<PlanetType>,
    pub species: Option<&'a str>,
    pub focus: Option<&'a str>,
    pub tags: &'a [String],
}

impl<'a> Candidate<'a> {
    /// An unowned object with nothing else known about it
    pub fn new(object_id: ObjectId) -> Self {
        Self {
            object_id,
            owner: ALL_EMPIRES,
            planet_type: None,
            species: None,
            focus: None,
            tags: &[],
        }
    }

    pub fn with_owner(mut self, owner: EmpireId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_planet_type(mut self, planet_type: PlanetType) -> Self {
        self.planet_type = Some(planet_type);
        self
    }

    pub fn with_species(mut self, species: &'a str) -> Self {
        self.species = Some(species);
        self
    }

    pub fn with_focus(mut self, focus: &'a str) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn with_tags(mut self, tags: &'a [String]) -> Self {
        self.tags = tags;
        self
    }
}

/// A yes/no test over a candidate object
pub trait LocationPredicate: fmt::Debug + Send + Sync {
    fn matches(&self, candidate: &Candidate<'_>) -> bool;

    /// Content-file representation, indented by `ntabs`
    fn dump(&self, ntabs: u8) -> String;

    fn check_sum(&self) -> u32;
}

/// Data-file condition language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Always,
    Never,
    PlanetType { types: Vec<PlanetType> },
    OwnedBy { empire: EmpireId },
    Unowned,
    HasTag { tag: String },
    Species { names: Vec<String> },
    Focus { names: Vec<String> },
    And { operands: Vec<Condition> },
    Or { operands: Vec<Condition> },
    Not { operand: Box<Condition> },
}

fn indent(ntabs: u8) -> String {
    "    ".repeat(ntabs as usize)
}

fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("\"{}\"", n)).collect();
    format!("[{}]", quoted.join(", "))
}

impl LocationPredicate for Condition {
    fn matches(&self, candidate: &Candidate<'_>) -> bool {
        match self {
            Condition::Always => true,
            Condition::Never => false,
            Condition::PlanetType { types } => candidate
                .planet_type
                .map_or(false, |pt| types.contains(&pt)),
            Condition::OwnedBy { empire } => candidate.owner == *empire,
            Condition::Unowned => candidate.owner.is_unowned(),
            Condition::HasTag { tag } => candidate.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
            Condition::Species { names } => candidate
                .species
                .map_or(false, |s| names.iter().any(|n| n == s)),
            Condition::Focus { names } => candidate
                .focus
                .map_or(false, |f| names.iter().any(|n| n == f)),
            Condition::And { operands } => operands.iter().all(|c| c.matches(candidate)),
            Condition::Or { operands } => operands.iter().any(|c| c.matches(candidate)),
            Condition::Not { operand } => !operand.matches(candidate),
        }
    }

    fn dump(&self, ntabs: u8) -> String {
        let pad = indent(ntabs);
        match self {
            Condition::Always => format!("{}All", pad),
            Condition::Never => format!("{}None", pad),
            Condition::PlanetType { types } => {
                let names: Vec<&str> = types.iter().map(|t| t.content_name()).collect();
                format!("{}Planet type = [{}]", pad, names.join(" "))
            }
            Condition::OwnedBy { empire } => format!("{}OwnedBy empire = {}", pad, empire),
            Condition::Unowned => format!("{}Unowned", pad),
            Condition::HasTag { tag } => format!("{}HasTag name = \"{}\"", pad, tag),
            Condition::Species { names } => format!("{}Species name = {}", pad, quoted_list(names)),
            Condition::Focus { names } => format!("{}Focus type = {}", pad, quoted_list(names)),
            Condition::And { operands } | Condition::Or { operands } => {
                let keyword = if matches!(self, Condition::And { .. }) { "And" } else { "Or" };
                let mut out = format!("{}{} [\n", pad, keyword);
                for operand in operands {
                    out.push_str(&operand.dump(ntabs + 1));
                    out.push('\n');
                }
                out.push_str(&format!("{}]", pad));
                out
            }
            Condition::Not { operand } => {
                format!("{}Not\n{}", pad, operand.dump(ntabs + 1))
            }
        }
    }

    fn check_sum(&self) -> u32 {
        let mut sum = "Condition".check_sum();
        match self {
            Condition::Always => combine(&mut sum, 1),
            Condition::Never => combine(&mut sum, 2),
            Condition::PlanetType { types } => {
                combine(&mut sum, 3);
                combine(&mut sum, types.check_sum());
            }
            Condition::OwnedBy { empire } => {
                combine(&mut sum, 4);
                combine(&mut sum, empire.check_sum());
            }
            Condition::Unowned => combine(&mut sum, 5),
            Condition::HasTag { tag } => {
                combine(&mut sum, 6);
                combine(&mut sum, tag.check_sum());
            }
            Condition::Species { names } => {
                combine(&mut sum, 7);
                combine(&mut sum, names.check_sum());
            }
            Condition::Focus { names } => {
                combine(&mut sum, 8);
                combine(&mut sum, names.check_sum());
            }
            Condition::And { operands } | Condition::Or { operands } => {
                combine(&mut sum, if matches!(self, Condition::And { .. }) { 9 } else { 10 });
                for operand in operands {
                    combine(&mut sum, LocationPredicate::check_sum(operand));
                }
            }
            Condition::Not { operand } => {
                combine(&mut sum, 11);
                combine(&mut sum, LocationPredicate::check_sum(operand.as_ref()));
            }
        }
        sum
    }
}
