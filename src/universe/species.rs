//! Species definitions
//!
//! A species is a population template: which planet types suit it, which
//! foci it can use, the effects it carries and a handful of behaviour flags.
//! Species are built once by the content loader and not mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::core::config::config;
use crate::core::error::{Result, SpeciesError};

use super::checksum::{combine, CheckSum};
use super::condition::LocationPredicate;
use super::effects::EffectGroup;
use super::focus::FocusType;
use super::planet::{PlanetEnvironment, PlanetType};
use super::terraform::TerraformRing;

/// A predefined type of population, looked up by its unique name
#[derive(Debug)]
pub struct Species {
    name: String,
    description: String,
    gameplay_description: String,

    foci: Vec<FocusType>,
    default_focus: String,
    planet_environments: BTreeMap<PlanetType, PlanetEnvironment>,

    effects: Vec<Arc<dyn EffectGroup>>,
    location: Option<Box<dyn LocationPredicate>>,
    combat_targets: Option<Box<dyn LocationPredicate>>,

    playable: bool,
    native: bool,
    can_colonize: bool,
    can_produce_ships: bool,
    spawn_rate: f32,
    spawn_limit: u32,

    tags: BTreeSet<String>,
    pedia_tags: BTreeSet<String>,
    likes: BTreeSet<String>,
    dislikes: BTreeSet<String>,
    graphic: String,
}

impl Species {
    /// Start building a species called `name`
    pub fn builder(name: impl Into<String>) -> SpeciesBuilder {
        SpeciesBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Gameplay summary text; template references are left for the UI to resolve
    pub fn gameplay_description(&self) -> &str {
        &self.gameplay_description
    }

    /// Where this species may spawn, if restricted
    pub fn location(&self) -> Option<&dyn LocationPredicate> {
        self.location.as_deref()
    }

    /// Which objects this species' ships may target in combat, if restricted
    pub fn combat_targets(&self) -> Option<&dyn LocationPredicate> {
        self.combat_targets.as_deref()
    }

    pub fn foci(&self) -> &[FocusType] {
        &self.foci
    }

    /// Focus given to new colonies and uninvaded natives; may be empty
    pub fn default_focus(&self) -> &str {
        &self.default_focus
    }

    pub fn planet_environments(&self) -> &BTreeMap<PlanetType, PlanetEnvironment> {
        &self.planet_environments
    }

    /// Rating of `planet_type` for this species; unlisted types are uninhabitable
    pub fn planet_environment(&self, planet_type: PlanetType) -> PlanetEnvironment {
        self.planet_environments
            .get(&planet_type)
            .copied()
            .unwrap_or(PlanetEnvironment::Uninhabitable)
    }

    /// The closest planet type with the best reachable rating, or
    /// `initial_planet_type` if terraforming can't improve on it
    pub fn next_best_planet_type(&self, initial_planet_type: PlanetType) -> PlanetType {
        TerraformRing::STANDARD.next_best(initial_planet_type, |pt| self.planet_environment(pt))
    }

    /// One terraforming step towards `next_best_planet_type`
    pub fn next_better_planet_type(&self, initial_planet_type: PlanetType) -> PlanetType {
        TerraformRing::STANDARD.next_better(initial_planet_type, |pt| self.planet_environment(pt))
    }

    pub fn effects(&self) -> &[Arc<dyn EffectGroup>] {
        &self.effects
    }

    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    pub fn spawn_limit(&self) -> u32 {
        self.spawn_limit
    }

    /// Suitable as a starting species for players
    pub fn playable(&self) -> bool {
        self.playable
    }

    /// Suitable for unowned native planets
    pub fn native(&self) -> bool {
        self.native
    }

    pub fn can_colonize(&self) -> bool {
        self.can_colonize
    }

    pub fn can_produce_ships(&self) -> bool {
        self.can_produce_ships
    }

    /// Upper-cased tags
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Subset of `tags` shown in the encyclopedia
    pub fn pedia_tags(&self) -> &BTreeSet<String> {
        &self.pedia_tags
    }

    /// Case-insensitive tag test
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_uppercase())
    }

    pub fn likes(&self) -> &BTreeSet<String> {
        &self.likes
    }

    pub fn dislikes(&self) -> &BTreeSet<String> {
        &self.dislikes
    }

    pub fn graphic(&self) -> &str {
        &self.graphic
    }

    /// Content-file representation of this species
    pub fn dump(&self, ntabs: u8) -> String {
        let pad = "    ".repeat(ntabs as usize);
        let inner = "    ".repeat(ntabs as usize + 1);
        let quoted = |items: &BTreeSet<String>| -> String {
            let items: Vec<String> = items.iter().map(|t| format!("\"{}\"", t)).collect();
            items.join(" ")
        };

        let mut out = format!("{}Species\n", pad);
        out.push_str(&format!("{}name = \"{}\"\n", inner, self.name));
        out.push_str(&format!("{}description = \"{}\"\n", inner, self.description));
        out.push_str(&format!(
            "{}gameplay_description = \"{}\"\n",
            inner, self.gameplay_description
        ));
        for (flag, set) in [
            ("Playable", self.playable),
            ("Native", self.native),
            ("CanColonize", self.can_colonize),
            ("CanProduceShips", self.can_produce_ships),
        ] {
            if set {
                out.push_str(&format!("{}{}\n", inner, flag));
            }
        }
        out.push_str(&format!("{}spawnrate = {}\n", inner, self.spawn_rate));
        out.push_str(&format!("{}spawnlimit = {}\n", inner, self.spawn_limit));

        for (label, set) in [("tags", &self.tags), ("likes", &self.likes), ("dislikes", &self.dislikes)] {
            if !set.is_empty() {
                out.push_str(&format!("{}{} = [ {} ]\n", inner, label, quoted(set)));
            }
        }

        if !self.foci.is_empty() {
            out.push_str(&format!("{}foci = [\n", inner));
            for focus in &self.foci {
                out.push_str(&focus.dump(ntabs + 2));
            }
            out.push_str(&format!("{}]\n", inner));
        }
        if !self.default_focus.is_empty() {
            out.push_str(&format!("{}defaultfocus = \"{}\"\n", inner, self.default_focus));
        }

        if !self.effects.is_empty() {
            out.push_str(&format!("{}effectsgroups = [\n", inner));
            for effect in &self.effects {
                out.push_str(&effect.dump(ntabs + 2));
                out.push('\n');
            }
            out.push_str(&format!("{}]\n", inner));
        }

        if let Some(location) = &self.location {
            out.push_str(&format!("{}location =\n{}\n", inner, location.dump(ntabs + 2)));
        }
        if let Some(targets) = &self.combat_targets {
            out.push_str(&format!("{}combatTargets =\n{}\n", inner, targets.dump(ntabs + 2)));
        }

        if !self.planet_environments.is_empty() {
            out.push_str(&format!("{}environments = [\n", inner));
            for (pt, pe) in &self.planet_environments {
                out.push_str(&format!(
                    "{}    tuple(type = {}, environment = {})\n",
                    inner,
                    pt.content_name(),
                    pe.content_name()
                ));
            }
            out.push_str(&format!("{}]\n", inner));
        }
        out.push_str(&format!("{}graphic = \"{}\"\n", inner, self.graphic));
        out
    }

    /// Deterministic content checksum covering every field
    pub fn check_sum(&self) -> u32 {
        let mut sum = self.name.check_sum();
        combine(&mut sum, self.description.check_sum());
        combine(&mut sum, self.gameplay_description.check_sum());
        combine(&mut sum, self.foci.check_sum());
        combine(&mut sum, self.default_focus.check_sum());
        combine(&mut sum, self.planet_environments.check_sum());

        for effect in &self.effects {
            combine(&mut sum, effect.check_sum());
        }
        combine(&mut sum, self.effects.len() as u32);
        combine(&mut sum, self.location.as_ref().map_or(0, |c| c.check_sum()));
        combine(&mut sum, self.combat_targets.as_ref().map_or(0, |c| c.check_sum()));

        combine(&mut sum, self.playable.check_sum());
        combine(&mut sum, self.native.check_sum());
        combine(&mut sum, self.can_colonize.check_sum());
        combine(&mut sum, self.can_produce_ships.check_sum());
        combine(&mut sum, self.spawn_rate.check_sum());
        combine(&mut sum, self.spawn_limit.check_sum());

        combine(&mut sum, self.tags.check_sum());
        combine(&mut sum, self.likes.check_sum());
        combine(&mut sum, self.dislikes.check_sum());
        combine(&mut sum, self.graphic.check_sum());
        sum
    }
}

impl CheckSum for Species {
    fn check_sum(&self) -> u32 {
        Species::check_sum(self)
    }
}

fn same_predicate(a: &Option<Box<dyn LocationPredicate>>, b: &Option<Box<dyn LocationPredicate>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.dump(0) == b.dump(0),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Species {
    fn eq(&self, rhs: &Self) -> bool {
        self.name == rhs.name
            && self.description == rhs.description
            && self.gameplay_description == rhs.gameplay_description
            && self.foci == rhs.foci
            && self.default_focus == rhs.default_focus
            && self.planet_environments == rhs.planet_environments
            && self.effects.len() == rhs.effects.len()
            && self
                .effects
                .iter()
                .zip(&rhs.effects)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a.dump(0) == b.dump(0))
            && same_predicate(&self.location, &rhs.location)
            && same_predicate(&self.combat_targets, &rhs.combat_targets)
            && self.playable == rhs.playable
            && self.native == rhs.native
            && self.can_colonize == rhs.can_colonize
            && self.can_produce_ships == rhs.can_produce_ships
            && self.spawn_rate == rhs.spawn_rate
            && self.spawn_limit == rhs.spawn_limit
            && self.tags == rhs.tags
            && self.likes == rhs.likes
            && self.dislikes == rhs.dislikes
            && self.graphic == rhs.graphic
    }
}

/// Collects species fields and validates them in `build`
#[derive(Debug)]
pub struct SpeciesBuilder {
    name: String,
    description: String,
    gameplay_description: String,
    foci: Vec<FocusType>,
    default_focus: String,
    planet_environments: BTreeMap<PlanetType, PlanetEnvironment>,
    effects: Vec<Arc<dyn EffectGroup>>,
    location: Option<Box<dyn LocationPredicate>>,
    combat_targets: Option<Box<dyn LocationPredicate>>,
    playable: bool,
    native: bool,
    can_colonize: bool,
    can_produce_ships: bool,
    spawn_rate: f32,
    spawn_limit: u32,
    tags: Vec<String>,
    likes: BTreeSet<String>,
    dislikes: BTreeSet<String>,
    graphic: String,
    pedia_tag_prefix: String,
}

impl SpeciesBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let defaults = config();
        Self {
            name: name.into(),
            description: String::new(),
            gameplay_description: String::new(),
            foci: Vec::new(),
            default_focus: String::new(),
            planet_environments: BTreeMap::new(),
            effects: Vec::new(),
            location: None,
            combat_targets: None,
            playable: true,
            native: true,
            can_colonize: true,
            can_produce_ships: true,
            spawn_rate: defaults.default_spawn_rate,
            spawn_limit: defaults.default_spawn_limit,
            tags: Vec::new(),
            likes: BTreeSet::new(),
            dislikes: BTreeSet::new(),
            graphic: String::new(),
            pedia_tag_prefix: defaults.pedia_tag_prefix.clone(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn gameplay_description(mut self, text: impl Into<String>) -> Self {
        self.gameplay_description = text.into();
        self
    }

    pub fn focus(mut self, focus: FocusType) -> Self {
        self.foci.push(focus);
        self
    }

    pub fn foci(mut self, foci: Vec<FocusType>) -> Self {
        self.foci = foci;
        self
    }

    pub fn default_focus(mut self, focus: impl Into<String>) -> Self {
        self.default_focus = focus.into();
        self
    }

    pub fn environment(mut self, planet_type: PlanetType, environment: PlanetEnvironment) -> Self {
        self.planet_environments.insert(planet_type, environment);
        self
    }

    pub fn environments(mut self, environments: BTreeMap<PlanetType, PlanetEnvironment>) -> Self {
        self.planet_environments = environments;
        self
    }

    pub fn effect(mut self, effect: Arc<dyn EffectGroup>) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn location(mut self, location: Box<dyn LocationPredicate>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn combat_targets(mut self, targets: Box<dyn LocationPredicate>) -> Self {
        self.combat_targets = Some(targets);
        self
    }

    pub fn playable(mut self, playable: bool) -> Self {
        self.playable = playable;
        self
    }

    pub fn native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }

    pub fn can_colonize(mut self, can_colonize: bool) -> Self {
        self.can_colonize = can_colonize;
        self
    }

    pub fn can_produce_ships(mut self, can_produce_ships: bool) -> Self {
        self.can_produce_ships = can_produce_ships;
        self
    }

    pub fn spawn_rate(mut self, rate: f32) -> Self {
        self.spawn_rate = rate;
        self
    }

    pub fn spawn_limit(mut self, limit: u32) -> Self {
        self.spawn_limit = limit;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn like(mut self, content: impl Into<String>) -> Self {
        self.likes.insert(content.into());
        self
    }

    pub fn dislike(mut self, content: impl Into<String>) -> Self {
        self.dislikes.insert(content.into());
        self
    }

    pub fn graphic(mut self, graphic: impl Into<String>) -> Self {
        self.graphic = graphic.into();
        self
    }

    /// Tags starting with `prefix` become pedia tags
    pub fn pedia_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.pedia_tag_prefix = prefix.into();
        self
    }

    /// Validate and produce the species
    pub fn build(self) -> Result<Species> {
        if self.name.trim().is_empty() {
            return Err(SpeciesError::EmptyName);
        }

        let mut seen = BTreeSet::new();
        for focus in &self.foci {
            if !seen.insert(focus.name()) {
                return Err(SpeciesError::DuplicateFocus {
                    species: self.name.clone(),
                    focus: focus.name().to_string(),
                });
            }
        }

        if !self.default_focus.is_empty() && !seen.contains(self.default_focus.as_str()) {
            return Err(SpeciesError::UnknownDefaultFocus {
                species: self.name.clone(),
                focus: self.default_focus.clone(),
            });
        }

        if !self.spawn_rate.is_finite() || self.spawn_rate < 0.0 {
            return Err(SpeciesError::InvalidSpawnRate {
                species: self.name.clone(),
                rate: self.spawn_rate,
            });
        }

        let tags: BTreeSet<String> = self
            .tags
            .iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        let pedia_prefix = self.pedia_tag_prefix.to_uppercase();
        let pedia_tags = tags
            .iter()
            .filter(|t| t.starts_with(&pedia_prefix))
            .cloned()
            .collect();

        Ok(Species {
            name: self.name,
            description: self.description,
            gameplay_description: self.gameplay_description,
            foci: self.foci,
            default_focus: self.default_focus,
            planet_environments: self.planet_environments,
            effects: self.effects,
            location: self.location,
            combat_targets: self.combat_targets,
            playable: self.playable,
            native: self.native,
            can_colonize: self.can_colonize,
            can_produce_ships: self.can_produce_ships,
            spawn_rate: self.spawn_rate,
            spawn_limit: self.spawn_limit,
            tags,
            pedia_tags,
            likes: self.likes,
            dislikes: self.dislikes,
            graphic: self.graphic,
        })
    }
}
