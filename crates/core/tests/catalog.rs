use std::collections::HashMap;

use orchard_core::{
    Catalog, DestructionType, Locale, LocalizedName, Location, MovementClass, RngState, SpriteRef,
    SymbolDef, SymbolId,
};

fn def(key: &str, weight: f64) -> SymbolDef {
    SymbolDef {
        key: key.to_string(),
        name: LocalizedName {
            en: key.to_string(),
            es: key.to_string(),
        },
        base_value: 1,
        movement: MovementClass::Random,
        rarity_weight: weight,
        category: "fruit".to_string(),
        destruction: DestructionType::None,
        sprite: SpriteRef {
            sheet: "test".to_string(),
            frame: 0,
        },
        shield: None,
    }
}

fn tally(catalog: &Catalog, draws: usize, seed: u64) -> HashMap<String, usize> {
    let mut rng = RngState::from_seed(seed);
    let mut counts = HashMap::new();
    for _ in 0..draws {
        *counts.entry(catalog.draw(&mut rng).key.clone()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn draws_converge_on_rarity_weights() {
    let catalog = Catalog::builtin();
    let draws = 200_000;
    let counts = tally(&catalog, draws, 42);
    let total = catalog.total_weight();
    for def in catalog.symbols() {
        let expected = def.rarity_weight / total;
        let observed = counts.get(&def.key).copied().unwrap_or(0) as f64 / draws as f64;
        assert!(
            (observed - expected).abs() < 0.01,
            "{}: expected {expected:.4}, observed {observed:.4}",
            def.key
        );
    }
}

#[test]
fn rare_entries_are_still_reachable() {
    let catalog = Catalog::new(vec![
        def("common", 10.0),
        def("rare", 0.01),
        def("middling", 1.0),
    ])
    .expect("valid catalog");
    let counts = tally(&catalog, 100_000, 9);
    assert!(counts.get("rare").copied().unwrap_or(0) > 0);
    assert_eq!(counts.len(), 3);
}

#[test]
fn single_entry_always_wins() {
    let catalog = Catalog::new(vec![def("only", 0.5)]).expect("valid catalog");
    let mut rng = RngState::from_seed(1);
    for _ in 0..100 {
        assert_eq!(catalog.draw(&mut rng).key, "only");
    }
}

#[test]
fn generated_instances_start_at_base_value() {
    let catalog = Catalog::builtin();
    let mut rng = RngState::from_seed(3);
    for n in 0..50 {
        let symbol = catalog.generate(&mut rng, SymbolId(n), Location::InInventory(0));
        let def = catalog.get(&symbol.key).expect("drawn from catalog");
        assert_eq!(symbol.value, def.base_value);
        assert_eq!(symbol.location, Location::InInventory(0));
        assert!(symbol.protection.is_empty());
    }
}

#[test]
fn same_seed_same_sequence() {
    let catalog = Catalog::builtin();
    let mut left = RngState::from_seed(77);
    let mut right = RngState::from_seed(77);
    for _ in 0..200 {
        assert_eq!(catalog.draw(&mut left).key, catalog.draw(&mut right).key);
    }
}

#[test]
fn names_follow_the_locale() {
    let catalog = Catalog::builtin();
    let cherry = catalog.get("cherry").expect("builtin cherry");
    assert_eq!(cherry.display_name(Locale::En), "Cherry");
    assert_eq!(cherry.display_name(Locale::Es), "Cereza");
}

#[test]
fn builtin_movement_classes() {
    let catalog = Catalog::builtin();
    let movement = |key: &str| catalog.get(key).map(|def| def.movement);
    assert_eq!(movement("cherry"), Some(MovementClass::Random));
    assert_eq!(movement("strawberry"), Some(MovementClass::Movable));
    assert_eq!(movement("pineapple"), Some(MovementClass::Fixed));
    assert_eq!(movement("coconut"), Some(MovementClass::Fixed));
    let coconut = catalog.get("coconut").expect("builtin coconut");
    assert!(coconut.is_protector());
    assert!(!coconut.is_fruit());
}
