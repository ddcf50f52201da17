use super::*;
use crate::*;
use tracing::debug;

/// Drop target for a dragged symbol: the preferred cell when it is on the
/// grid and free (or is the origin itself), otherwise the origin. The
/// dragged symbol keeps its origin until the drop commits, so the origin is
/// always available to fall back on.
pub fn choose_drop_cell(grid: &Grid, origin: Pos, preferred: Option<Pos>) -> Pos {
    match preferred {
        Some(pos) if pos == origin => origin,
        Some(pos) if grid.in_bounds(pos) && !grid.is_occupied(pos) => pos,
        _ => origin,
    }
}

impl RunState {
    /// Moves an inventory symbol onto the grid. Movable symbols go to
    /// `preferred` when it is free; everything else lands on a random free
    /// cell.
    pub fn place_on_grid(
        &mut self,
        id: SymbolId,
        preferred: Option<Pos>,
        events: &mut EventBus,
    ) -> Result<Pos, RunError> {
        self.try_place_on_grid(id, preferred, events)
            .map_err(|err| {
                debug!(%id, %err, "place rejected");
                err
            })
    }

    fn try_place_on_grid(
        &mut self,
        id: SymbolId,
        preferred: Option<Pos>,
        events: &mut EventBus,
    ) -> Result<Pos, RunError> {
        if self.phase() != Phase::Playing {
            return Err(RunError::InvalidPhase(self.phase()));
        }
        if self.stage != TurnStage::Idle {
            return Err(RunError::TurnLocked);
        }
        let Some(slot) = self.conveyor.find(id) else {
            if self.grid.find(id).is_some() {
                return Err(RunError::AlreadyPlaced(id));
            }
            return Err(RunError::UnknownSymbol(id));
        };
        let movement = self
            .conveyor
            .slot_at(slot)
            .and_then(|symbol| self.movement_of(symbol));
        let free = self.grid.free_cells();
        let chosen = preferred
            .filter(|_| movement == Some(MovementClass::Movable))
            .filter(|pos| free.contains(pos))
            .or_else(|| self.rng.pick(&free).copied());
        let Some(target) = chosen else {
            return Err(RunError::NoFreeCell);
        };
        let Some(instance) = self.conveyor.take(slot) else {
            return Err(RunError::UnknownSymbol(id));
        };
        if let Err(instance) = self.grid.place(instance, target) {
            // `target` came from the free list, so this only restores state.
            let _ = self.conveyor.insert(slot, instance);
            return Err(RunError::NoFreeCell);
        }

        let mut out = Dispatch::new(events, &mut self.barrier);
        out.texture(Spot::Slot(slot), None);
        out.moved(id, Location::InInventory(slot), Location::InGrid(target));
        out.texture(Spot::Cell(target), movement);
        debug!(%id, slot, %target, "placed");
        Ok(target)
    }

    /// Drop handling for a dragged grid symbol. Only movable symbols can be
    /// dragged. Returns the cell the symbol ends up in.
    pub fn return_or_relocate(
        &mut self,
        id: SymbolId,
        preferred: Option<Pos>,
        events: &mut EventBus,
    ) -> Result<Pos, RunError> {
        self.try_return_or_relocate(id, preferred, events)
            .map_err(|err| {
                debug!(%id, %err, "drag rejected");
                err
            })
    }

    fn try_return_or_relocate(
        &mut self,
        id: SymbolId,
        preferred: Option<Pos>,
        events: &mut EventBus,
    ) -> Result<Pos, RunError> {
        if self.phase() != Phase::Playing {
            return Err(RunError::InvalidPhase(self.phase()));
        }
        if self.stage != TurnStage::Idle {
            return Err(RunError::TurnLocked);
        }
        let Some(origin) = self.grid.find(id) else {
            return Err(RunError::NotOnGrid(id));
        };
        let movement = self
            .grid
            .symbol_at(origin)
            .and_then(|symbol| self.movement_of(symbol));
        if movement != Some(MovementClass::Movable) {
            return Err(RunError::NotMovable(id));
        }
        let target = choose_drop_cell(&self.grid, origin, preferred);
        if target == origin {
            return Ok(origin);
        }
        let Some(instance) = self.grid.clear(origin) else {
            return Err(RunError::NotOnGrid(id));
        };
        if let Err(instance) = self.grid.place(instance, target) {
            let _ = self.grid.place(instance, origin);
            return Ok(origin);
        }

        let mut out = Dispatch::new(events, &mut self.barrier);
        out.texture(Spot::Cell(origin), None);
        out.moved(id, Location::InGrid(origin), Location::InGrid(target));
        out.texture(Spot::Cell(target), movement);
        debug!(%id, %origin, %target, "dragged");
        Ok(target)
    }
}
