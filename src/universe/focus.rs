//! Focus settings a populated planet can be assigned

use std::sync::Arc;

use super::checksum::{combine, CheckSum};
use super::condition::{Candidate, LocationPredicate};

/// A production-mode setting for a population center.
///
/// Focus types don't act on their own; effect groups elsewhere test for a
/// focus in their conditions.
#[derive(Debug, Clone)]
pub struct FocusType {
    name: String,
    description: String,
    location: Arc<dyn LocationPredicate>,
    graphic: String,
}

impl FocusType {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: Arc<dyn LocationPredicate>,
        graphic: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            location,
            graphic: graphic.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Condition an object must meet to use this focus
    pub fn location(&self) -> &dyn LocationPredicate {
        self.location.as_ref()
    }

    pub fn graphic(&self) -> &str {
        &self.graphic
    }

    /// Whether `candidate` may select this focus
    pub fn available_on(&self, candidate: &Candidate<'_>) -> bool {
        self.location.matches(candidate)
    }

    pub fn dump(&self, ntabs: u8) -> String {
        let pad = "    ".repeat(ntabs as usize);
        let inner = "    ".repeat(ntabs as usize + 1);
        format!(
            "{pad}FocusType\n{inner}name = \"{}\"\n{inner}description = \"{}\"\n{inner}location =\n{}\n{inner}graphic = \"{}\"\n",
            self.name,
            self.description,
            self.location.dump(ntabs + 2),
            self.graphic,
        )
    }

    pub fn check_sum(&self) -> u32 {
        let mut sum = self.name.check_sum();
        combine(&mut sum, self.description.check_sum());
        combine(&mut sum, self.location.check_sum());
        combine(&mut sum, self.graphic.check_sum());
        sum
    }
}

impl CheckSum for FocusType {
    fn check_sum(&self) -> u32 {
        FocusType::check_sum(self)
    }
}

impl PartialEq for FocusType {
    fn eq(&self, rhs: &Self) -> bool {
        self.name == rhs.name
            && self.description == rhs.description
            && self.graphic == rhs.graphic
            && (Arc::ptr_eq(&self.location, &rhs.location)
                || self.location.dump(0) == rhs.location.dump(0))
    }
}
