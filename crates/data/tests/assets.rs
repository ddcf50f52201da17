use orchard_core::{Catalog, GameConfig, Locale, MovementClass, RunState};
use orchard_data::{load_assets, load_catalog, load_game_config, locale_from_code, normalize_locale};
use std::fs;
use std::path::PathBuf;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("orchard-data-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

macro_rules! locale_case {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(normalize_locale($input), $expected);
        }
    };
}

locale_case!(locale_default, None, "en_US");
locale_case!(locale_blank, Some("  "), "en_US");
locale_case!(locale_en, Some("en"), "en_US");
locale_case!(locale_es, Some("es"), "es_ES");
locale_case!(locale_es_dash, Some("es-ES"), "es_ES");
locale_case!(locale_es_mx, Some("ES_mx"), "es_ES");
locale_case!(locale_other, Some("pt-BR"), "pt_BR");

#[test]
fn locale_codes_pick_display_names() {
    assert_eq!(locale_from_code(Some("es")), Locale::Es);
    assert_eq!(locale_from_code(Some("en-GB")), Locale::En);
    assert_eq!(locale_from_code(Some("fr")), Locale::En);
    assert_eq!(locale_from_code(None), Locale::En);
}

#[test]
fn bundled_config_matches_defaults() {
    let config = load_game_config(&assets_root()).expect("load config");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn bundled_catalog_matches_builtin() {
    let catalog = load_catalog(&assets_root()).expect("load catalog");
    let builtin = Catalog::builtin();
    assert_eq!(catalog.symbols(), builtin.symbols());
    assert_eq!(
        catalog.get("strawberry").map(|def| def.movement),
        Some(MovementClass::Movable)
    );
}

#[test]
fn bundled_assets_start_a_game() {
    let assets = load_assets(&assets_root()).expect("load assets");
    let mut run = RunState::new(assets.config, assets.catalog, 12345);
    let mut events = orchard_core::EventBus::default();
    run.new_game(&mut events).expect("game starts");
    assert_eq!(run.conveyor.occupied_slots().len(), 4);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = scratch_dir("missing-config");
    let config = load_game_config(&dir).expect("defaults");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = scratch_dir("partial-config");
    fs::write(
        dir.join("config.json"),
        r#"{ "coins_per_day": 3, "effects": { "banana_destroy_chance": 0.5 } }"#,
    )
    .expect("write config");
    let config = load_game_config(&dir).expect("load config");
    assert_eq!(config.coins_per_day, 3);
    assert_eq!(config.starting_goal, 50);
    assert_eq!(config.effects.banana_destroy_chance, 0.5);
    assert_eq!(config.effects.kiwi_reset_chance, 0.25);
}

#[test]
fn invalid_config_names_the_file() {
    let dir = scratch_dir("bad-config");
    fs::write(dir.join("config.json"), r#"{ "grid_rows": 0 }"#).expect("write config");
    let err = load_game_config(&dir).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("config.json"), "{message}");
    assert!(message.contains("at least one cell"), "{message}");
}

#[test]
fn unparsable_catalog_is_reported() {
    let dir = scratch_dir("broken-catalog");
    fs::write(dir.join("symbols.json"), "[{").expect("write catalog");
    let err = load_catalog(&dir).unwrap_err();
    assert!(format!("{err:#}").contains("parse"));
}

#[test]
fn missing_catalog_is_an_error() {
    let dir = scratch_dir("missing-catalog");
    let err = load_catalog(&dir).unwrap_err();
    assert!(format!("{err:#}").contains("symbols.json"));
}

#[test]
fn duplicate_keys_fail_validation() {
    let dir = scratch_dir("duplicate-catalog");
    let entry = r#"{
        "key": "cherry",
        "name": { "en": "Cherry", "es": "Cereza" },
        "base_value": 1,
        "movement": "random",
        "rarity_weight": 0.5,
        "category": "fruit",
        "sprite": { "sheet": "fruits", "frame": 0 }
    }"#;
    fs::write(dir.join("symbols.json"), format!("[{entry}, {entry}]")).expect("write catalog");
    let err = load_catalog(&dir).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate symbol key"));
}

#[test]
fn empty_catalog_fails_validation() {
    let dir = scratch_dir("empty-catalog");
    fs::write(dir.join("symbols.json"), "[]").expect("write catalog");
    let err = load_catalog(&dir).unwrap_err();
    assert!(format!("{err:#}").contains("catalog is empty"));
}
