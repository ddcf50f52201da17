use crate::{Pos, SymbolDef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Location {
    InGrid(Pos),
    InInventory(usize),
    Destroyed,
}

/// Shield granted by a protector for the current turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtectionEntry {
    pub source: SymbolId,
    pub reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolInstance {
    pub id: SymbolId,
    pub key: String,
    pub value: i64,
    pub location: Location,
    #[serde(default)]
    pub protection: Vec<ProtectionEntry>,
}

impl SymbolInstance {
    pub fn new(id: SymbolId, def: &SymbolDef, location: Location) -> Self {
        Self {
            id,
            key: def.key.clone(),
            value: def.base_value,
            location,
            protection: Vec::new(),
        }
    }

    pub fn is_protected(&self) -> bool {
        !self.protection.is_empty()
    }

    pub fn grid_pos(&self) -> Option<Pos> {
        match self.location {
            Location::InGrid(pos) => Some(pos),
            _ => None,
        }
    }

    pub fn slot_index(&self) -> Option<usize> {
        match self.location {
            Location::InInventory(index) => Some(index),
            _ => None,
        }
    }

    pub fn add_value(&mut self, delta: i64) {
        self.value = self.value.saturating_add(delta).max(0);
    }
}
