//! Species registry integration tests
//!
//! Exercises the registry through its public surface: catalogue lookups,
//! homeworld bookkeeping, checksums, background loading and the parallel
//! effect pass.

use std::path::PathBuf;
use std::sync::Arc;

use stellar_species::content::spawn_species_load;
use stellar_species::core::config::SpeciesConfig;
use stellar_species::core::types::{EmpireId, ObjectId};
use stellar_species::registry::{PopulatedObject, SpeciesGameState, SpeciesManager, SpeciesTypes};
use stellar_species::universe::{
    Condition, EffectGroup, EffectsGroupDef, FocusType, PlanetEnvironment, PlanetType, Species,
    SpeciesBuilder,
};

fn content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/species")
}

fn base_builder(name: &str) -> SpeciesBuilder {
    Species::builder(name)
        .description("A test species")
        .focus(FocusType::new(
            "FOCUS_INDUSTRY",
            "Industry",
            Arc::new(Condition::Always),
            "industry.png",
        ))
        .default_focus("FOCUS_INDUSTRY")
        .environment(PlanetType::Terran, PlanetEnvironment::Good)
        .environment(PlanetType::Desert, PlanetEnvironment::Adequate)
        .tag("GOOD_POPULATION")
        .like("FOCUS_INDUSTRY")
        .dislike("BLD_GATEWAY_VOID")
}

#[test]
fn test_insert_lookup_overwrite_remove() {
    let mut manager = SpeciesManager::with_types(SpeciesTypes::default());
    assert_eq!(manager.num_species(), 0);

    assert!(manager.insert_species(base_builder("SP_TEST").build().unwrap()).is_none());
    assert_eq!(manager.get_species("SP_TEST").map(Species::name), Some("SP_TEST"));
    assert_eq!(manager.num_species(), 1);

    let replaced = manager.insert_species(base_builder("SP_TEST").playable(false).build().unwrap());
    assert!(replaced.is_some_and(|old| old.playable()));
    assert_eq!(manager.num_species(), 1);
    assert_eq!(manager.num_playable_species(), 0);

    manager.insert_species(base_builder("SP_OTHER").build().unwrap());
    assert_eq!(manager.num_species(), 2);
    assert_eq!(manager.iter().count(), manager.num_species());

    assert!(manager.remove_species("SP_TEST").is_some());
    assert!(manager.remove_species("SP_TEST").is_none());
    assert!(manager.get_species("SP_TEST").is_none());
    assert_eq!(manager.num_species(), 1);
}

#[test]
fn test_homeworld_add_remove() {
    let mut manager = SpeciesManager::new();
    manager.add_species_homeworld("SP_TEST", ObjectId(42));
    assert!(manager.species_homeworlds_map()["SP_TEST"].contains(&ObjectId(42)));

    manager.remove_species_homeworld("SP_TEST", ObjectId(42));
    assert!(manager
        .species_homeworlds_map()
        .get("SP_TEST")
        .map_or(true, |ids| ids.is_empty()));

    manager.remove_species_homeworld("SP_TEST", ObjectId(42));
    manager.remove_species_homeworld("SP_NOBODY", ObjectId(1));
    assert!(manager.species_homeworlds_map().is_empty());
}

#[test]
fn test_empty_species_name_is_not_a_homeworld() {
    let mut manager = SpeciesManager::new();
    manager.add_species_homeworld("", ObjectId(7));
    assert!(manager.species_homeworlds_map().is_empty());
}

#[test]
fn test_checksum_is_stable() {
    let manager = SpeciesManager::with_types(SpeciesTypes::from_species(
        [base_builder("SP_TEST").build().unwrap()],
        vec!["ORGANIC".to_string()],
    ));
    assert_eq!(manager.check_sum(), manager.check_sum());

    let twin = SpeciesManager::with_types(SpeciesTypes::from_species(
        [base_builder("SP_TEST").build().unwrap()],
        vec!["ORGANIC".to_string()],
    ));
    assert_eq!(manager.check_sum(), twin.check_sum());
}

#[test]
fn test_checksum_changes_with_any_field() {
    let reference = base_builder("SP_TEST").build().unwrap();
    let variants = vec![
        ("name", base_builder("SP_TEST2").build().unwrap()),
        ("description", base_builder("SP_TEST").description("Other").build().unwrap()),
        (
            "gameplay description",
            base_builder("SP_TEST").gameplay_description("Plays well").build().unwrap(),
        ),
        (
            "foci",
            base_builder("SP_TEST")
                .focus(FocusType::new("FOCUS_RESEARCH", "", Arc::new(Condition::Unowned), ""))
                .build()
                .unwrap(),
        ),
        ("default focus", base_builder("SP_TEST").default_focus("").build().unwrap()),
        (
            "environment",
            base_builder("SP_TEST")
                .environment(PlanetType::Desert, PlanetEnvironment::Poor)
                .build()
                .unwrap(),
        ),
        (
            "effects",
            base_builder("SP_TEST")
                .effect(Arc::new(EffectsGroupDef {
                    scope: Condition::Always,
                    meter: "Happiness".to_string(),
                    amount: 1.0,
                    accounting_label: String::new(),
                    stacking_group: None,
                    priority: 100,
                }))
                .build()
                .unwrap(),
        ),
        (
            "location",
            base_builder("SP_TEST").location(Box::new(Condition::Never)).build().unwrap(),
        ),
        (
            "combat targets",
            base_builder("SP_TEST")
                .combat_targets(Box::new(Condition::Unowned))
                .build()
                .unwrap(),
        ),
        ("playable", base_builder("SP_TEST").playable(false).build().unwrap()),
        ("native", base_builder("SP_TEST").native(false).build().unwrap()),
        ("can colonize", base_builder("SP_TEST").can_colonize(false).build().unwrap()),
        (
            "can produce ships",
            base_builder("SP_TEST").can_produce_ships(false).build().unwrap(),
        ),
        ("spawn rate", base_builder("SP_TEST").spawn_rate(0.25).build().unwrap()),
        ("spawn limit", base_builder("SP_TEST").spawn_limit(3).build().unwrap()),
        ("tags", base_builder("SP_TEST").tag("TELEPATHIC").build().unwrap()),
        ("likes", base_builder("SP_TEST").like("PLC_LIBERTY").build().unwrap()),
        ("dislikes", base_builder("SP_TEST").dislike("PLC_LIBERTY").build().unwrap()),
        ("graphic", base_builder("SP_TEST").graphic("other.png").build().unwrap()),
    ];

    for (field, variant) in variants {
        assert_ne!(
            reference.check_sum(),
            variant.check_sum(),
            "checksum ignores {}",
            field
        );
        assert_ne!(reference, variant, "equality ignores {}", field);
    }
}

#[test]
fn test_registry_checksum_follows_species() {
    let manager = SpeciesManager::with_types(SpeciesTypes::from_species(
        [base_builder("SP_TEST").build().unwrap()],
        Vec::new(),
    ));
    let changed = SpeciesManager::with_types(SpeciesTypes::from_species(
        [base_builder("SP_TEST").spawn_limit(12).build().unwrap()],
        Vec::new(),
    ));
    assert_ne!(manager.check_sum(), changed.check_sum());
}

#[test]
fn test_background_load_materializes_on_first_lookup() {
    let config = SpeciesConfig {
        content_dir: content_dir(),
        ..SpeciesConfig::default()
    };
    let mut manager = SpeciesManager::new();
    manager.set_species_types(spawn_species_load(config).unwrap());

    let human = manager.get_species("SP_HUMAN").unwrap();
    assert_eq!(human.name(), "SP_HUMAN");
    assert!(manager.get_species_unchecked("SP_HUMAN").is_some());
    assert_eq!(manager.num_species(), 4);
}

#[test]
fn test_background_load_of_missing_dir_is_empty() {
    let config = SpeciesConfig {
        content_dir: content_dir().join("does_not_exist"),
        ..SpeciesConfig::default()
    };
    let mut manager = SpeciesManager::new();
    manager.set_species_types(spawn_species_load(config).unwrap());

    assert!(manager.is_empty());
    assert!(manager.get_species("SP_HUMAN").is_none());
}

#[test]
fn test_effects_collected_per_object() {
    let industry: Arc<dyn EffectGroup> = Arc::new(EffectsGroupDef {
        scope: Condition::PlanetType {
            types: vec![PlanetType::Ocean],
        },
        meter: "TargetIndustry".to_string(),
        amount: 2.5,
        accounting_label: "OCEAN_BONUS".to_string(),
        stacking_group: None,
        priority: 100,
    });
    let owned_only: Arc<dyn EffectGroup> = Arc::new(EffectsGroupDef {
        scope: Condition::Not {
            operand: Box::new(Condition::Unowned),
        },
        meter: "Happiness".to_string(),
        amount: 1.0,
        accounting_label: String::new(),
        stacking_group: None,
        priority: 100,
    });
    let species = base_builder("SP_SQUID")
        .effect(industry)
        .effect(owned_only)
        .build()
        .unwrap();
    let manager = SpeciesManager::with_types(SpeciesTypes::from_species([species], Vec::new()));

    let object = |id: i32, owner: i32, species: &str, planet_type: PlanetType| PopulatedObject {
        id: ObjectId(id),
        owner: EmpireId(owner),
        species: species.to_string(),
        planet_type: Some(planet_type),
        focus: None,
        population: 3.0,
    };
    let objects = vec![
        object(1, 0, "SP_SQUID", PlanetType::Ocean),
        object(2, -1, "SP_SQUID", PlanetType::Ocean),
        object(3, 0, "SP_SQUID", PlanetType::Tundra),
        object(4, 0, "SP_UNKNOWN", PlanetType::Ocean),
    ];

    let effects = manager.collect_species_effects(&objects);
    let summary: Vec<(ObjectId, &str)> = effects
        .iter()
        .map(|(id, effect)| (*id, effect.meter.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ObjectId(1), "TargetIndustry"),
            (ObjectId(1), "Happiness"),
            (ObjectId(2), "TargetIndustry"),
            (ObjectId(3), "Happiness"),
        ]
    );
    assert_eq!(effects[0].1.amount, 2.5);
}

#[test]
fn test_game_state_survives_json() {
    let mut manager = SpeciesManager::new();
    manager.add_species_homeworld("SP_TEST", ObjectId(42));
    manager.set_species_empire_opinion("SP_TEST", EmpireId(3), 4.0);
    manager.set_species_species_opinion("SP_TEST", "SP_OTHER", -1.5);
    manager.record_ships_destroyed("SP_TEST", "SP_OTHER", 6);

    let json = manager.game_state().to_json().unwrap();
    let restored = SpeciesGameState::from_json(&json).unwrap();

    let mut other = SpeciesManager::new();
    other.restore_game_state(restored);
    assert_eq!(other.game_state(), manager.game_state());
    assert_eq!(other.species_empire_opinion("SP_TEST", EmpireId(3)), 4.0);
    assert_eq!(other.species_species_opinion("SP_TEST", "SP_OTHER"), -1.5);
    assert_eq!(other.check_sum(), manager.check_sum());
}
