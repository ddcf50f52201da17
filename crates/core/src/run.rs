use crate::{
    AnimationBarrier, AnimationHandle, Catalog, Conveyor, EconomyState, GameConfig, Grid,
    InventoryError, Phase, RngState, SymbolId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod day;
mod placement;
mod state;
mod turn;

pub use placement::choose_drop_cell;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("turn resolution still in flight")]
    TurnLocked,
    #[error("no coins left")]
    NoCoinsLeft,
    #[error("unknown symbol {0}")]
    UnknownSymbol(SymbolId),
    #[error("symbol {0} is already on the grid")]
    AlreadyPlaced(SymbolId),
    #[error("symbol {0} is not on the grid")]
    NotOnGrid(SymbolId),
    #[error("symbol {0} cannot be dragged")]
    NotMovable(SymbolId),
    #[error("no free cell")]
    NoFreeCell,
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Where the current end-turn sequence stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnStage {
    Idle,
    Resolving,
    /// The conveyor shift waits for the tail eviction to finish animating.
    AwaitingEviction(AnimationHandle),
    /// Everything is committed; waiting for outstanding animations.
    Settling,
}

#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub catalog: Catalog,
    pub rng: RngState,
    pub grid: Grid,
    pub conveyor: Conveyor,
    pub economy: EconomyState,
    barrier: AnimationBarrier,
    stage: TurnStage,
    next_symbol_id: u32,
}
