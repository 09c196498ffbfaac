//! Effect groups carried by species
//!
//! Species hold effect groups behind `Arc` because the content loader pools
//! identical definitions across species.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::checksum::{combine, CheckSum};
use super::condition::{Candidate, Condition, LocationPredicate};

/// A single meter adjustment produced by an effect group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterEffect {
    pub meter: String,
    pub amount: f64,
    pub accounting_label: String,
}

/// A bundle of effects with its own targeting
pub trait EffectGroup: fmt::Debug + Send + Sync {
    /// Effect produced on `target`, or `None` when the target is out of scope
    fn evaluate(&self, target: &Candidate<'_>) -> Option<MeterEffect>;

    /// Effects sharing a stacking group don't accumulate on one target
    fn stacking_group(&self) -> Option<&str>;

    fn dump(&self, ntabs: u8) -> String;

    fn check_sum(&self) -> u32;
}

/// Data-file effect group: adjust one meter on every target in scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsGroupDef {
    #[serde(default)]
    pub scope: Condition,
    pub meter: String,
    pub amount: f64,
    #[serde(default)]
    pub accounting_label: String,
    #[serde(default)]
    pub stacking_group: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    100
}

impl EffectGroup for EffectsGroupDef {
    fn evaluate(&self, target: &Candidate<'_>) -> Option<MeterEffect> {
        if !self.scope.matches(target) {
            return None;
        }
        Some(MeterEffect {
            meter: self.meter.clone(),
            amount: self.amount,
            accounting_label: self.accounting_label.clone(),
        })
    }

    fn stacking_group(&self) -> Option<&str> {
        self.stacking_group.as_deref()
    }

    fn dump(&self, ntabs: u8) -> String {
        let pad = "    ".repeat(ntabs as usize);
        let inner = "    ".repeat(ntabs as usize + 1);
        let mut out = format!("{}EffectsGroup\n", pad);
        out.push_str(&format!("{}scope =\n{}\n", inner, self.scope.dump(ntabs + 2)));
        if let Some(group) = &self.stacking_group {
            out.push_str(&format!("{}stackinggroup = \"{}\"\n", inner, group));
        }
        if !self.accounting_label.is_empty() {
            out.push_str(&format!("{}accountinglabel = \"{}\"\n", inner, self.accounting_label));
        }
        out.push_str(&format!("{}priority = {}\n", inner, self.priority));
        out.push_str(&format!(
            "{}effects = Set{} value = Value + {}",
            inner, self.meter, self.amount
        ));
        out
    }

    fn check_sum(&self) -> u32 {
        let mut sum = "EffectsGroup".check_sum();
        combine(&mut sum, LocationPredicate::check_sum(&self.scope));
        combine(&mut sum, self.meter.check_sum());
        combine(&mut sum, self.amount.check_sum());
        combine(&mut sum, self.accounting_label.check_sum());
        combine(&mut sum, self.stacking_group.check_sum());
        combine(&mut sum, self.priority.check_sum());
        sum
    }
}
