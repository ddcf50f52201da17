use super::*;
use crate::*;

impl RunState {
    pub fn new(config: GameConfig, catalog: Catalog, seed: u64) -> Self {
        let grid = Grid::new(config.grid_rows, config.grid_cols);
        let conveyor = Conveyor::new(config.inventory_slots);
        let economy = EconomyState::new(&config);
        Self {
            config,
            catalog,
            rng: RngState::from_seed(seed),
            grid,
            conveyor,
            economy,
            barrier: AnimationBarrier::default(),
            stage: TurnStage::Idle,
            next_symbol_id: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.economy.phase
    }

    pub fn stage(&self) -> TurnStage {
        self.stage
    }

    /// True once no turn is resolving and every dispatched animation has
    /// reported back.
    pub fn end_turn_active(&self) -> bool {
        self.stage == TurnStage::Idle && self.barrier.is_clear()
    }

    pub fn pending_animations(&self) -> usize {
        self.barrier.pending()
    }

    pub fn outstanding_animations(&self) -> Vec<AnimationHandle> {
        self.barrier.outstanding()
    }

    pub fn def_of(&self, symbol: &SymbolInstance) -> Option<&SymbolDef> {
        self.catalog.get(&symbol.key)
    }

    pub fn movement_of(&self, symbol: &SymbolInstance) -> Option<MovementClass> {
        self.def_of(symbol).map(|def| def.movement)
    }

    pub fn locate(&self, id: SymbolId) -> Option<Location> {
        if let Some(pos) = self.grid.find(id) {
            return Some(Location::InGrid(pos));
        }
        self.conveyor.find(id).map(Location::InInventory)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&SymbolInstance> {
        match self.locate(id)? {
            Location::InGrid(pos) => self.grid.symbol_at(pos),
            Location::InInventory(slot) => self.conveyor.slot_at(slot),
            Location::Destroyed => None,
        }
    }

    /// Grid and conveyor invariants, plus no symbol held by both.
    pub fn check_invariants(&self) -> Result<(), String> {
        self.grid.check_invariants()?;
        self.conveyor.check_invariants()?;
        for symbol in self.conveyor.slots().iter().flatten() {
            if self.grid.find(symbol.id).is_some() {
                return Err(format!(
                    "symbol {} is in the inventory and on the grid",
                    symbol.id
                ));
            }
        }
        Ok(())
    }

    pub(super) fn alloc_symbol_id(&mut self) -> SymbolId {
        let id = SymbolId(self.next_symbol_id);
        self.next_symbol_id = self.next_symbol_id.saturating_add(1);
        id
    }

    pub(super) fn spawn_symbol(&mut self, location: Location) -> SymbolInstance {
        let id = self.alloc_symbol_id();
        self.catalog.generate(&mut self.rng, id, location)
    }

    pub(super) fn set_stage(&mut self, stage: TurnStage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "turn stage");
        self.stage = stage;
    }
}
