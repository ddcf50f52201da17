use anyhow::{bail, Context};
use orchard_core::{Catalog, GameConfig, Locale, SymbolDef};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

const CONFIG_FILE: &str = "config.json";
const SYMBOLS_FILE: &str = "symbols.json";

/// Everything a run needs from the assets directory.
#[derive(Debug, Clone)]
pub struct Assets {
    pub config: GameConfig,
    pub catalog: Catalog,
}

pub fn load_assets(dir: &Path) -> anyhow::Result<Assets> {
    let config = load_game_config(dir)?;
    let catalog = load_catalog(dir)?;
    Ok(Assets { config, catalog })
}

/// Reads `config.json`. A missing file means the built-in defaults; fields
/// left out of the file take their default values.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    let config: GameConfig = if path.exists() {
        load_json(&path)?
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        GameConfig::default()
    };
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn load_catalog(dir: &Path) -> anyhow::Result<Catalog> {
    let path = dir.join(SYMBOLS_FILE);
    let symbols: Vec<SymbolDef> = load_json(&path)?;
    let count = symbols.len();
    let catalog = Catalog::new(symbols).with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), count, "catalog loaded");
    Ok(catalog)
}

fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    if config.grid_rows == 0 || config.grid_cols == 0 {
        bail!(
            "grid must have at least one cell, got {}x{}",
            config.grid_rows,
            config.grid_cols
        );
    }
    if config.inventory_slots == 0 {
        bail!("inventory needs at least one slot");
    }
    if config.initial_fill > config.inventory_slots {
        bail!(
            "initial fill {} exceeds {} inventory slots",
            config.initial_fill,
            config.inventory_slots
        );
    }
    if config.coins_per_day == 0 {
        bail!("a day needs at least one coin");
    }
    if !config.goal_growth.is_finite() || config.goal_growth < 1.0 {
        bail!("goal growth must be at least 1, got {}", config.goal_growth);
    }
    let effects = &config.effects;
    for (name, value) in [
        ("cherry_floor", effects.cherry_floor),
        ("cherry_step", effects.cherry_step),
        ("banana_destroy_chance", effects.banana_destroy_chance),
        ("kiwi_reset_chance", effects.kiwi_reset_chance),
    ] {
        if !(0.0..=1.0).contains(&value) {
            bail!("{name} must be within [0, 1], got {value}");
        }
    }
    Ok(())
}

/// Canonical locale tag for user input such as `es`, `es-MX` or `EN_us`.
pub fn normalize_locale(locale: Option<&str>) -> String {
    let raw = locale.unwrap_or("en_US").trim();
    if raw.is_empty() {
        return "en_US".to_string();
    }
    let lowered = raw.replace('-', "_").to_ascii_lowercase();
    match lowered.as_str() {
        "en" | "en_us" | "en_gb" => "en_US".to_string(),
        "es" | "es_es" | "es_mx" | "es_419" => "es_ES".to_string(),
        _ => raw.replace('-', "_"),
    }
}

/// Display locale for a tag. Anything that is not Spanish reads as English.
pub fn locale_from_code(locale: Option<&str>) -> Locale {
    match normalize_locale(locale).as_str() {
        "es_ES" => Locale::Es,
        _ => Locale::En,
    }
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GameConfig::default()).is_ok());
    }

    #[test]
    fn overfilled_inventory_is_rejected() {
        let config = GameConfig {
            initial_fill: 9,
            ..GameConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("initial fill"));
    }

    #[test]
    fn chances_must_be_probabilities() {
        let mut config = GameConfig::default();
        config.effects.banana_destroy_chance = 1.5;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("banana_destroy_chance"));
    }
}
