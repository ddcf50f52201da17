use crate::{Location, RngState, SymbolId, SymbolInstance};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const FRUIT: &str = "fruit";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementClass {
    Fixed,
    Random,
    Movable,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DestructionType {
    #[default]
    None,
    SameKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    Es,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en_US",
            Self::Es => "es_ES",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedName {
    pub en: String,
    pub es: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteRef {
    pub sheet: String,
    pub frame: u32,
}

/// Marks a symbol as a protector. Each time a shielded neighbour absorbs a
/// destruction, the protector gains `reward`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShieldRule {
    #[serde(default)]
    pub reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolDef {
    pub key: String,
    pub name: LocalizedName,
    pub base_value: i64,
    pub movement: MovementClass,
    pub rarity_weight: f64,
    pub category: String,
    #[serde(default)]
    pub destruction: DestructionType,
    pub sprite: SpriteRef,
    #[serde(default)]
    pub shield: Option<ShieldRule>,
}

impl SymbolDef {
    pub fn is_fruit(&self) -> bool {
        self.category == FRUIT
    }

    pub fn is_protector(&self) -> bool {
        self.shield.is_some()
    }

    pub fn display_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name.en,
            Locale::Es => &self.name.es,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,
    #[error("duplicate symbol key {0:?}")]
    DuplicateKey(String),
    #[error("symbol {key:?} has invalid rarity weight {weight}")]
    InvalidWeight { key: String, weight: f64 },
    #[error("symbol {0:?} has a negative base value")]
    NegativeBaseValue(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    symbols: Vec<SymbolDef>,
}

impl Catalog {
    pub fn new(symbols: Vec<SymbolDef>) -> Result<Self, CatalogError> {
        if symbols.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for def in &symbols {
            if !seen.insert(def.key.as_str()) {
                return Err(CatalogError::DuplicateKey(def.key.clone()));
            }
            if !def.rarity_weight.is_finite() || def.rarity_weight <= 0.0 {
                return Err(CatalogError::InvalidWeight {
                    key: def.key.clone(),
                    weight: def.rarity_weight,
                });
            }
            if def.base_value < 0 {
                return Err(CatalogError::NegativeBaseValue(def.key.clone()));
            }
        }
        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[SymbolDef] {
        &self.symbols
    }

    pub fn get(&self, key: &str) -> Option<&SymbolDef> {
        self.symbols.iter().find(|def| def.key == key)
    }

    pub fn total_weight(&self) -> f64 {
        self.symbols.iter().map(|def| def.rarity_weight).sum()
    }

    /// Weighted draw over the catalog in its declared order.
    pub fn draw(&self, rng: &mut RngState) -> &SymbolDef {
        let mut remaining = rng.next_below(self.total_weight());
        for def in &self.symbols {
            remaining -= def.rarity_weight;
            if remaining <= 0.0 {
                return def;
            }
        }
        // Float exhaustion; `new` guarantees at least one entry.
        &self.symbols[self.symbols.len() - 1]
    }

    pub fn generate(&self, rng: &mut RngState, id: SymbolId, location: Location) -> SymbolInstance {
        let def = self.draw(rng);
        SymbolInstance::new(id, def, location)
    }

    pub fn builtin() -> Self {
        Self {
            symbols: builtin_symbols(),
        }
    }
}

fn fruit(
    key: &str,
    en: &str,
    es: &str,
    base_value: i64,
    movement: MovementClass,
    rarity_weight: f64,
    frame: u32,
) -> SymbolDef {
    SymbolDef {
        key: key.to_string(),
        name: LocalizedName {
            en: en.to_string(),
            es: es.to_string(),
        },
        base_value,
        movement,
        rarity_weight,
        category: FRUIT.to_string(),
        destruction: DestructionType::None,
        sprite: SpriteRef {
            sheet: "fruits".to_string(),
            frame,
        },
        shield: None,
    }
}

fn builtin_symbols() -> Vec<SymbolDef> {
    use MovementClass::*;
    let mut grape = fruit("grape", "Grape", "Uva", 1, Random, 0.35, 6);
    grape.destruction = DestructionType::SameKey;
    let coconut = SymbolDef {
        key: "coconut".to_string(),
        name: LocalizedName {
            en: "Coconut".to_string(),
            es: "Coco".to_string(),
        },
        base_value: 1,
        movement: Fixed,
        rarity_weight: 0.10,
        category: "nut".to_string(),
        destruction: DestructionType::None,
        sprite: SpriteRef {
            sheet: "fruits".to_string(),
            frame: 11,
        },
        shield: Some(ShieldRule { reward: 1 }),
    };
    vec![
        fruit("cherry", "Cherry", "Cereza", 1, Random, 0.75, 0),
        fruit("lemon", "Lemon", "Limon", 1, Random, 0.55, 1),
        fruit("banana", "Banana", "Banana", 1, Random, 0.30, 2),
        fruit("strawberry", "Strawberry", "Fresa", 1, Movable, 0.20, 3),
        fruit("orange", "Orange", "Naranja", 2, Random, 0.15, 4),
        fruit("watermelon", "Watermelon", "Sandia", 3, Random, 0.25, 5),
        grape,
        fruit("peach", "Peach", "Durazno", 1, Movable, 0.20, 7),
        fruit("kiwi", "Kiwi", "Kiwi", 1, Random, 0.15, 8),
        fruit("pineapple", "Pineapple", "Pina", 2, Fixed, 0.10, 9),
        fruit("apple", "Apple", "Manzana", 1, Fixed, 0.20, 10),
        coconut,
    ]
}
