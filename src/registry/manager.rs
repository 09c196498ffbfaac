//! Species registry
//!
//! `SpeciesManager` owns the species catalogue for a game session together
//! with the per-game tables gameplay updates every turn (homeworlds,
//! opinions, population and combat statistics).
//!
//! The catalogue arrives from the content loader as a `Pending` value and is
//! materialized on first access. Guarded lookups resolve the pending load
//! (blocking if needed); unchecked lookups never lock and keep seeing the
//! previous catalogue until the new one has been swapped in, which is what
//! the per-object inner loops use.

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use rand::seq::IteratorRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::core::types::{EmpireId, ObjectId};
use crate::universe::checksum::{combine, CheckSum};
use crate::universe::condition::Candidate;
use crate::universe::effects::MeterEffect;
use crate::universe::planet::PlanetType;
use crate::universe::species::Species;

use super::pending::{Pending, PendingState};
use super::state::{
    EmpireOpinionMap, HomeworldMap, ObjectPopulationMap, ShipsDestroyedMap, SpeciesGameState,
    SpeciesOpinionMap,
};

/// Species keyed by name
pub type SpeciesTypeMap = BTreeMap<String, Species>;

/// Ordered tags used to group species in census listings
pub type CensusOrder = Vec<String>;

/// A complete species catalogue as produced by the content loader
#[derive(Debug, Default)]
pub struct SpeciesTypes {
    pub species: SpeciesTypeMap,
    pub census_order: CensusOrder,
}

impl SpeciesTypes {
    pub fn new(species: SpeciesTypeMap, census_order: CensusOrder) -> Self {
        Self {
            species,
            census_order,
        }
    }

    /// Build a catalogue from a list; later entries replace earlier ones
    /// with the same name
    pub fn from_species(species: impl IntoIterator<Item = Species>, census_order: CensusOrder) -> Self {
        let species = species
            .into_iter()
            .map(|s| (s.name().to_string(), s))
            .collect();
        Self::new(species, census_order)
    }
}

/// A populated object as seen by the population counter and effect pass
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedObject {
    pub id: ObjectId,
    pub owner: EmpireId,
    pub species: String,
    pub planet_type: Option<PlanetType>,
    pub focus: Option<String>,
    pub population: f32,
}

impl PopulatedObject {
    pub fn candidate(&self) -> Candidate<'_> {
        Candidate {
            object_id: self.id,
            owner: self.owner,
            planet_type: self.planet_type,
            species: Some(self.species.as_str()),
            focus: self.focus.as_deref(),
            tags: &[],
        }
    }
}

/// Registry of all species plus their per-game state
#[derive(Debug, Default)]
pub struct SpeciesManager {
    types: OnceLock<SpeciesTypes>,
    /// Catalogue replaced by a reload that hasn't completed yet
    previous: Option<SpeciesTypes>,
    pending: Mutex<Option<Pending<SpeciesTypes>>>,

    homeworlds: HomeworldMap,
    empire_opinions: EmpireOpinionMap,
    species_opinions: SpeciesOpinionMap,
    object_populations: ObjectPopulationMap,
    ships_destroyed: ShipsDestroyedMap,
}

impl SpeciesManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with an already-loaded catalogue
    pub fn with_types(types: SpeciesTypes) -> Self {
        let manager = Self::new();
        let _ = manager.types.set(types);
        manager
    }

    // === CATALOGUE ===

    /// Replace the catalogue with the result of `pending` once it completes.
    ///
    /// The current catalogue stays visible to unchecked lookups until then.
    pub fn set_species_types(&mut self, pending: Pending<SpeciesTypes>) {
        tracing::debug!("Species types replaced by pending load {}", pending.label());
        if let Some(current) = self.types.take() {
            self.previous = Some(current);
        }
        *self.pending.get_mut().unwrap_or_else(PoisonError::into_inner) = Some(pending);
    }

    /// Replace the catalogue immediately
    pub fn replace_species_types(&mut self, types: SpeciesTypes) {
        tracing::debug!("Species types replaced with {} species", types.species.len());
        *self.pending.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
        self.previous = None;
        self.types = OnceLock::from(types);
    }

    /// Materialize a finished pending load without blocking.
    ///
    /// Returns true once the pending load has been swapped in.
    pub fn poll_pending(&mut self) -> bool {
        if self.types.get().is_some() {
            self.previous = None;
            return true;
        }
        let slot = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        let Some(pending) = slot.as_mut() else {
            return false;
        };
        let types = match pending.try_take() {
            PendingState::Ready(types) => {
                tracing::debug!("Pending species load materialized: {} species", types.species.len());
                types
            }
            PendingState::Waiting => return false,
            PendingState::Abandoned => {
                tracing::warn!("Pending species load was abandoned; no species available");
                SpeciesTypes::default()
            }
        };
        *slot = None;
        self.previous = None;
        let _ = self.types.set(types);
        true
    }

    /// Catalogue access that first resolves any pending load, blocking on it
    fn types(&self) -> &SpeciesTypes {
        self.types.get_or_init(|| {
            let pending = self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            match pending {
                Some(pending) => {
                    let types = pending.wait().unwrap_or_default();
                    tracing::debug!(
                        "Pending species load materialized: {} species",
                        types.species.len()
                    );
                    types
                }
                None => SpeciesTypes::default(),
            }
        })
    }

    fn types_mut(&mut self) -> Option<&mut SpeciesTypes> {
        self.types();
        self.previous = None;
        self.types.get_mut()
    }

    /// Look up a species by name, resolving a pending load first
    pub fn get_species(&self, name: &str) -> Option<&Species> {
        self.types().species.get(name)
    }

    /// Look up a species without touching the pending load.
    ///
    /// While a reload is in flight this reads the catalogue it replaces.
    /// Returns `None` for every name if nothing was ever materialized.
    pub fn get_species_unchecked(&self, name: &str) -> Option<&Species> {
        self.types
            .get()
            .or(self.previous.as_ref())
            .and_then(|types| types.species.get(name))
    }

    /// Insert or replace a species, returning the one it replaced
    pub fn insert_species(&mut self, species: Species) -> Option<Species> {
        let types = self.types_mut()?;
        types.species.insert(species.name().to_string(), species)
    }

    pub fn remove_species(&mut self, name: &str) -> Option<Species> {
        self.types_mut()?.species.remove(name)
    }

    /// All species in name order
    pub fn iter(&self) -> impl Iterator<Item = &Species> + '_ {
        self.types().species.values()
    }

    pub fn playable(&self) -> impl Iterator<Item = &Species> + '_ {
        self.iter().filter(|s| s.playable())
    }

    pub fn native(&self) -> impl Iterator<Item = &Species> + '_ {
        self.iter().filter(|s| s.native())
    }

    pub fn census_order(&self) -> &[String] {
        &self.types().census_order
    }

    pub fn is_empty(&self) -> bool {
        self.types().species.is_empty()
    }

    pub fn num_species(&self) -> usize {
        self.types().species.len()
    }

    pub fn num_playable_species(&self) -> usize {
        self.playable().count()
    }

    pub fn num_native_species(&self) -> usize {
        self.native().count()
    }

    pub fn random_species_name<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.iter().choose(rng).map(Species::name)
    }

    pub fn random_playable_species_name<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.playable().choose(rng).map(Species::name)
    }

    /// Playable species picked round-robin by `id`
    pub fn sequential_playable_species_name(&self, id: usize) -> Option<&str> {
        let count = self.num_playable_species();
        if count == 0 {
            return None;
        }
        self.playable().nth(id % count).map(Species::name)
    }

    /// Names of species that like `content_name`
    pub fn species_that_like(&self, content_name: &str) -> Vec<&str> {
        self.iter()
            .filter(|s| s.likes().contains(content_name))
            .map(Species::name)
            .collect()
    }

    /// Names of species that dislike `content_name`
    pub fn species_that_dislike(&self, content_name: &str) -> Vec<&str> {
        self.iter()
            .filter(|s| s.dislikes().contains(content_name))
            .map(Species::name)
            .collect()
    }

    // === HOMEWORLDS ===

    pub fn species_homeworlds_map(&self) -> &HomeworldMap {
        &self.homeworlds
    }

    pub fn add_species_homeworld(&mut self, species: impl Into<String>, homeworld_id: ObjectId) {
        let species = species.into();
        if species.is_empty() {
            return;
        }
        self.homeworlds.entry(species).or_default().insert(homeworld_id);
    }

    pub fn remove_species_homeworld(&mut self, species: &str, homeworld_id: ObjectId) {
        if let Some(ids) = self.homeworlds.get_mut(species) {
            ids.remove(&homeworld_id);
            if ids.is_empty() {
                self.homeworlds.remove(species);
            }
        }
    }

    pub fn clear_species_homeworlds(&mut self) {
        self.homeworlds.clear();
    }

    // === OPINIONS ===

    pub fn species_empire_opinions_map(&self) -> &EmpireOpinionMap {
        &self.empire_opinions
    }

    /// Opinion of `species` about `empire`, 0.0 if none is recorded
    pub fn species_empire_opinion(&self, species: &str, empire: EmpireId) -> f32 {
        self.empire_opinions
            .get(species)
            .and_then(|opinions| opinions.get(&empire))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set_species_empire_opinions(&mut self, opinions: EmpireOpinionMap) {
        self.empire_opinions = opinions;
    }

    pub fn set_species_empire_opinion(&mut self, species: impl Into<String>, empire: EmpireId, opinion: f32) {
        self.empire_opinions
            .entry(species.into())
            .or_default()
            .insert(empire, opinion);
    }

    pub fn species_species_opinions_map(&self) -> &SpeciesOpinionMap {
        &self.species_opinions
    }

    /// Opinion of `opinionated` about `rated`, 0.0 if none is recorded
    pub fn species_species_opinion(&self, opinionated: &str, rated: &str) -> f32 {
        self.species_opinions
            .get(opinionated)
            .and_then(|opinions| opinions.get(rated))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set_species_species_opinions(&mut self, opinions: SpeciesOpinionMap) {
        self.species_opinions = opinions;
    }

    pub fn set_species_species_opinion(
        &mut self,
        opinionated: impl Into<String>,
        rated: impl Into<String>,
        opinion: f32,
    ) {
        self.species_opinions
            .entry(opinionated.into())
            .or_default()
            .insert(rated.into(), opinion);
    }

    pub fn clear_species_opinions(&mut self) {
        self.empire_opinions.clear();
        self.species_opinions.clear();
    }

    // === STATISTICS ===

    pub fn species_object_populations(&self) -> &ObjectPopulationMap {
        &self.object_populations
    }

    pub fn species_ships_destroyed(&self) -> &ShipsDestroyedMap {
        &self.ships_destroyed
    }

    pub fn set_species_object_populations(&mut self, populations: ObjectPopulationMap) {
        self.object_populations = populations;
    }

    pub fn set_species_ships_destroyed(&mut self, destroyed: ShipsDestroyedMap) {
        self.ships_destroyed = destroyed;
    }

    /// Count `count` more ships of `destroyed_species` destroyed by `species`
    pub fn record_ships_destroyed(&mut self, species: impl Into<String>, destroyed_species: impl Into<String>, count: u32) {
        *self
            .ships_destroyed
            .entry(species.into())
            .or_default()
            .entry(destroyed_species.into())
            .or_default() += count;
    }

    /// Rebuild the species -> object -> population table from scratch.
    ///
    /// Objects without a species or without population are skipped.
    pub fn update_population_counter(&mut self, objects: &[PopulatedObject]) {
        self.object_populations = objects
            .par_iter()
            .filter(|obj| !obj.species.is_empty() && obj.population > 0.0)
            .fold(ObjectPopulationMap::new, |mut acc, obj| {
                *acc.entry(obj.species.clone())
                    .or_default()
                    .entry(obj.id)
                    .or_default() += obj.population;
                acc
            })
            .reduce(ObjectPopulationMap::new, |mut left, right| {
                for (species, objects) in right {
                    let entry = left.entry(species).or_default();
                    for (id, pop) in objects {
                        *entry.entry(id).or_default() += pop;
                    }
                }
                left
            });
    }

    /// Evaluate every object's species effects on that object, in parallel.
    ///
    /// Uses unchecked lookups: the catalogue must already be materialized.
    /// Output is ordered by object, then by effect order within the species.
    pub fn collect_species_effects(&self, objects: &[PopulatedObject]) -> Vec<(ObjectId, MeterEffect)> {
        objects
            .par_iter()
            .flat_map_iter(|obj| {
                let candidate = obj.candidate();
                self.get_species_unchecked(&obj.species)
                    .map(|species| {
                        species
                            .effects()
                            .iter()
                            .filter_map(|effect| effect.evaluate(&candidate))
                            .map(|effect| (obj.id, effect))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
            })
            .collect()
    }

    // === GAME STATE ===

    /// Clear all per-game tables, keeping the catalogue
    pub fn reset_game_state(&mut self) {
        self.homeworlds.clear();
        self.empire_opinions.clear();
        self.species_opinions.clear();
        self.object_populations.clear();
        self.ships_destroyed.clear();
    }

    /// Snapshot of the per-game tables for saving
    pub fn game_state(&self) -> SpeciesGameState {
        SpeciesGameState {
            homeworlds: self.homeworlds.clone(),
            empire_opinions: self.empire_opinions.clone(),
            species_opinions: self.species_opinions.clone(),
            object_populations: self.object_populations.clone(),
            ships_destroyed: self.ships_destroyed.clone(),
        }
    }

    pub fn restore_game_state(&mut self, state: SpeciesGameState) {
        self.homeworlds = state.homeworlds;
        self.empire_opinions = state.empire_opinions;
        self.species_opinions = state.species_opinions;
        self.object_populations = state.object_populations;
        self.ships_destroyed = state.ships_destroyed;
    }

    /// Checksum over every species plus homeworlds and opinions
    pub fn check_sum(&self) -> u32 {
        let mut sum = 0;
        for (name, species) in &self.types().species {
            combine(&mut sum, name.check_sum());
            combine(&mut sum, species.check_sum());
        }
        combine(&mut sum, self.num_species() as u32);
        combine(&mut sum, self.census_order().check_sum());
        combine(&mut sum, self.homeworlds.check_sum());
        combine(&mut sum, self.empire_opinions.check_sum());
        combine(&mut sum, self.species_opinions.check_sum());
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::planet::PlanetEnvironment;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn species(name: &str, playable: bool, native: bool) -> Species {
        Species::builder(name)
            .playable(playable)
            .native(native)
            .environment(PlanetType::Terran, PlanetEnvironment::Good)
            .build()
            .unwrap()
    }

    fn manager() -> SpeciesManager {
        SpeciesManager::with_types(SpeciesTypes::from_species(
            [
                species("SP_ALPHA", true, false),
                species("SP_BETA", false, true),
                species("SP_GAMMA", true, true),
            ],
            vec!["GOOD_POPULATION".to_string()],
        ))
    }

    #[test]
    fn test_lookup_and_counts() {
        let manager = manager();
        assert_eq!(manager.num_species(), 3);
        assert_eq!(manager.num_playable_species(), 2);
        assert_eq!(manager.num_native_species(), 2);
        assert_eq!(manager.get_species("SP_BETA").map(Species::name), Some("SP_BETA"));
        assert!(manager.get_species("SP_UNKNOWN").is_none());
        assert_eq!(manager.census_order(), ["GOOD_POPULATION".to_string()]);
    }

    #[test]
    fn test_filtered_iteration_in_name_order() {
        let manager = manager();
        let playable: Vec<&str> = manager.playable().map(Species::name).collect();
        let native: Vec<&str> = manager.native().map(Species::name).collect();
        assert_eq!(playable, vec!["SP_ALPHA", "SP_GAMMA"]);
        assert_eq!(native, vec!["SP_BETA", "SP_GAMMA"]);
    }

    #[test]
    fn test_unchecked_lookup_needs_materialized_catalogue() {
        let mut manager = SpeciesManager::new();
        let (tx, pending) = Pending::channel("test");
        manager.set_species_types(pending);

        assert!(manager.get_species_unchecked("SP_ALPHA").is_none());
        assert!(!manager.poll_pending());

        tx.send(SpeciesTypes::from_species([species("SP_ALPHA", true, true)], Vec::new()))
            .unwrap();
        assert!(manager.poll_pending());
        assert!(manager.get_species_unchecked("SP_ALPHA").is_some());
    }

    #[test]
    fn test_previous_catalogue_visible_until_reload_completes() {
        let mut manager = SpeciesManager::with_types(SpeciesTypes::from_species(
            [species("SP_OLD", true, true)],
            Vec::new(),
        ));
        let (tx, pending) = Pending::channel("reload");
        manager.set_species_types(pending);

        assert!(!manager.poll_pending());
        assert!(manager.get_species_unchecked("SP_OLD").is_some());
        assert!(manager.get_species_unchecked("SP_NEW").is_none());

        tx.send(SpeciesTypes::from_species([species("SP_NEW", true, true)], Vec::new()))
            .unwrap();
        assert!(manager.poll_pending());
        assert!(manager.get_species_unchecked("SP_OLD").is_none());
        assert!(manager.get_species_unchecked("SP_NEW").is_some());
        assert_eq!(manager.num_species(), 1);
    }

    #[test]
    fn test_guarded_lookup_swaps_in_reload() {
        let mut manager = SpeciesManager::with_types(SpeciesTypes::from_species(
            [species("SP_OLD", true, true)],
            Vec::new(),
        ));
        manager.set_species_types(Pending::ready(
            "reload",
            SpeciesTypes::from_species([species("SP_NEW", true, true)], Vec::new()),
        ));

        assert!(manager.get_species("SP_NEW").is_some());
        assert!(manager.get_species("SP_OLD").is_none());
        assert!(manager.get_species_unchecked("SP_OLD").is_none());
    }

    #[test]
    fn test_abandoned_load_means_no_species() {
        let mut manager = SpeciesManager::new();
        let (tx, pending) = Pending::<SpeciesTypes>::channel("test");
        manager.set_species_types(pending);
        drop(tx);

        assert!(manager.is_empty());
        assert!(manager.get_species("SP_ALPHA").is_none());
    }

    #[test]
    fn test_replacing_catalogue_keeps_game_state() {
        let mut manager = manager();
        manager.add_species_homeworld("SP_ALPHA", ObjectId(12));
        manager.set_species_types(Pending::ready(
            "reload",
            SpeciesTypes::from_species([species("SP_DELTA", true, true)], Vec::new()),
        ));

        assert_eq!(manager.num_species(), 1);
        assert!(manager.get_species("SP_ALPHA").is_none());
        assert!(manager.species_homeworlds_map()["SP_ALPHA"].contains(&ObjectId(12)));
    }

    #[test]
    fn test_sequential_playable_wraps() {
        let manager = manager();
        assert_eq!(manager.sequential_playable_species_name(0), Some("SP_ALPHA"));
        assert_eq!(manager.sequential_playable_species_name(1), Some("SP_GAMMA"));
        assert_eq!(manager.sequential_playable_species_name(2), Some("SP_ALPHA"));
        assert_eq!(SpeciesManager::new().sequential_playable_species_name(0), None);
    }

    #[test]
    fn test_random_names_are_deterministic_per_seed() {
        let manager = manager();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            let name_a = manager.random_playable_species_name(&mut a);
            let name_b = manager.random_playable_species_name(&mut b);
            assert_eq!(name_a, name_b);
            assert!(matches!(name_a, Some("SP_ALPHA") | Some("SP_GAMMA")));
        }
        assert!(SpeciesManager::new().random_species_name(&mut a).is_none());
    }

    #[test]
    fn test_opinions_default_to_zero() {
        let mut manager = manager();
        assert_eq!(manager.species_empire_opinion("SP_ALPHA", EmpireId(1)), 0.0);

        manager.set_species_empire_opinion("SP_ALPHA", EmpireId(1), 3.5);
        manager.set_species_species_opinion("SP_ALPHA", "SP_BETA", -2.0);
        assert_eq!(manager.species_empire_opinion("SP_ALPHA", EmpireId(1)), 3.5);
        assert_eq!(manager.species_empire_opinion("SP_ALPHA", EmpireId(2)), 0.0);
        assert_eq!(manager.species_species_opinion("SP_ALPHA", "SP_BETA"), -2.0);
        assert_eq!(manager.species_species_opinion("SP_BETA", "SP_ALPHA"), 0.0);

        manager.clear_species_opinions();
        assert!(manager.species_empire_opinions_map().is_empty());
        assert!(manager.species_species_opinions_map().is_empty());
    }

    #[test]
    fn test_population_counter() {
        let mut manager = manager();
        let objects = vec![
            PopulatedObject {
                id: ObjectId(1),
                owner: EmpireId(0),
                species: "SP_ALPHA".to_string(),
                planet_type: Some(PlanetType::Terran),
                focus: None,
                population: 10.0,
            },
            PopulatedObject {
                id: ObjectId(2),
                owner: EmpireId(0),
                species: "SP_ALPHA".to_string(),
                planet_type: Some(PlanetType::Ocean),
                focus: None,
                population: 4.0,
            },
            PopulatedObject {
                id: ObjectId(3),
                owner: EmpireId(1),
                species: String::new(),
                planet_type: Some(PlanetType::Barren),
                focus: None,
                population: 5.0,
            },
        ];
        manager.update_population_counter(&objects);

        let pops = manager.species_object_populations();
        assert_eq!(pops.len(), 1);
        assert_eq!(pops["SP_ALPHA"][&ObjectId(1)], 10.0);
        assert_eq!(pops["SP_ALPHA"][&ObjectId(2)], 4.0);
    }

    #[test]
    fn test_ships_destroyed_accumulates() {
        let mut manager = manager();
        manager.record_ships_destroyed("SP_ALPHA", "SP_BETA", 2);
        manager.record_ships_destroyed("SP_ALPHA", "SP_BETA", 3);
        assert_eq!(manager.species_ships_destroyed()["SP_ALPHA"]["SP_BETA"], 5);

        manager.reset_game_state();
        assert!(manager.game_state().is_empty());
        assert_eq!(manager.num_species(), 3);
    }

    #[test]
    fn test_checksum_tracks_state() {
        let mut manager = manager();
        let initial = manager.check_sum();
        assert_eq!(initial, manager.check_sum());

        manager.add_species_homeworld("SP_ALPHA", ObjectId(5));
        let with_homeworld = manager.check_sum();
        assert_ne!(initial, with_homeworld);

        manager.set_species_empire_opinion("SP_ALPHA", EmpireId(1), 1.0);
        assert_ne!(with_homeworld, manager.check_sum());

        manager.remove_species_homeworld("SP_ALPHA", ObjectId(5));
        manager.clear_species_opinions();
        assert_eq!(initial, manager.check_sum());
    }
}
