use crate::{Location, SymbolId, SymbolInstance};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("inventory slot {0} does not exist")]
    NoSuchSlot(usize),
    #[error("inventory slot {0} is occupied")]
    SlotOccupied(usize),
}

/// What one conveyor step did, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConveyorAdvance {
    pub evicted: Option<SymbolInstance>,
    pub moves: Vec<ConveyorMove>,
    pub spawned: Option<SymbolId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConveyorMove {
    pub id: SymbolId,
    pub from: usize,
    pub to: usize,
}

/// Pending symbols waiting to be placed. New symbols enter at slot 0 and
/// drift one slot toward the tail per turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conveyor {
    slots: Vec<Option<SymbolInstance>>,
}

impl Conveyor {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slot_at(&self, index: usize) -> Option<&SymbolInstance> {
        self.slots.get(index)?.as_ref()
    }

    pub fn slots(&self) -> &[Option<SymbolInstance>] {
        &self.slots
    }

    pub fn first_vacant(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn last_occupied_unplaced(&self) -> Option<usize> {
        self.slots.iter().rposition(Option::is_some)
    }

    pub fn occupied_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn find(&self, id: SymbolId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|symbol| symbol.id == id))
    }

    pub fn insert(&mut self, index: usize, mut instance: SymbolInstance) -> Result<(), InventoryError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::NoSuchSlot(index))?;
        if slot.is_some() {
            return Err(InventoryError::SlotOccupied(index));
        }
        instance.location = Location::InInventory(index);
        *slot = Some(instance);
        Ok(())
    }

    pub fn take(&mut self, index: usize) -> Option<SymbolInstance> {
        self.slots.get_mut(index)?.take()
    }

    pub fn drain(&mut self) -> Vec<SymbolInstance> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    /// Removes the unplaced symbol sitting in the tail slot, if any.
    pub fn evict_tail(&mut self) -> Option<SymbolInstance> {
        let mut evicted = self.slots.last_mut()?.take()?;
        evicted.location = Location::Destroyed;
        Some(evicted)
    }

    /// Moves every pending symbol one slot toward the tail. Nothing moves
    /// while the tail is still occupied.
    pub fn shift(&mut self) -> Vec<ConveyorMove> {
        let mut moves = Vec::new();
        if self.slots.last().map_or(true, Option::is_some) {
            return moves;
        }
        for to in (1..self.slots.len()).rev() {
            let from = to - 1;
            if let Some(mut symbol) = self.slots[from].take() {
                symbol.location = Location::InInventory(to);
                moves.push(ConveyorMove {
                    id: symbol.id,
                    from,
                    to,
                });
                self.slots[to] = Some(symbol);
            }
        }
        moves
    }

    /// Shift, then fill slot 0 from `spawn` when it is vacant.
    pub fn shift_and_refill<F>(&mut self, spawn: F) -> (Vec<ConveyorMove>, Option<SymbolId>)
    where
        F: FnOnce() -> SymbolInstance,
    {
        let moves = self.shift();
        let mut spawned = None;
        if self.slots.first().is_some_and(Option::is_none) {
            let instance = spawn();
            spawned = Some(instance.id);
            // Slot 0 was just checked vacant.
            let _ = self.insert(0, instance);
        }
        (moves, spawned)
    }

    pub fn advance<F>(&mut self, spawn: F) -> ConveyorAdvance
    where
        F: FnOnce() -> SymbolInstance,
    {
        let evicted = self.evict_tail();
        let (moves, spawned) = self.shift_and_refill(spawn);
        ConveyorAdvance {
            evicted,
            moves,
            spawned,
        }
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(symbol) = slot {
                if symbol.location != Location::InInventory(index) {
                    return Err(format!(
                        "slot {index} holds {} which reports {:?}",
                        symbol.id, symbol.location
                    ));
                }
            }
        }
        Ok(())
    }
}
