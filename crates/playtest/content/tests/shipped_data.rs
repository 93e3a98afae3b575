//! The data directory shipped with the workspace must load cleanly.

use std::path::PathBuf;

use playtest_content::ContentFactory;
use playtest_core::{EntityType, Heuristic, PcgRng, ProfileMode};

fn shipped() -> ContentFactory {
    ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data"))
}

#[test]
fn demo_level_is_well_formed() {
    let level = shipped().load_level("demo").unwrap();

    assert_eq!(level.catalog.len(), EntityType::COUNT);
    for entity_type in EntityType::all() {
        assert_eq!(level.catalog.of_type(entity_type).count(), 1, "{entity_type}");
    }
    assert!(level.issues().is_empty(), "{:?}", level.issues());
}

#[test]
fn weights_cover_every_heuristic() {
    let weights = shipped().load_weights().unwrap();
    for heuristic in Heuristic::all() {
        let row_total: f32 = EntityType::all()
            .into_iter()
            .map(|entity_type| weights.weight(heuristic, entity_type))
            .sum();
        assert!(row_total > 0.0, "{heuristic} row is empty");
    }
}

#[test]
fn config_and_population_load() {
    let factory = shipped();
    let config = factory.load_config().unwrap();
    assert_eq!(config.max_ticks, 6000);

    let population = factory.load_population().unwrap();
    assert!(matches!(population.profiles, ProfileMode::Range(ref ranges) if ranges.len() == Heuristic::COUNT));

    let mut rng = PcgRng::seeded(3);
    let (profile, _) = population.draw(0, &config, &mut rng);
    assert!(profile.scale(Heuristic::Completion) >= 0.3);
}
