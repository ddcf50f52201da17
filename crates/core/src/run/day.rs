use super::*;
use crate::*;
use tracing::{debug, info};

impl RunState {
    /// Starts a fresh game. A game already in progress is cleared first.
    pub fn new_game(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        if self.stage != TurnStage::Idle {
            debug!("new game rejected while a turn is resolving");
            return Err(RunError::TurnLocked);
        }
        if self.phase() != Phase::AwaitingStart {
            self.clear_board(events);
            self.economy.reset(&self.config);
        }
        self.economy.start()?;

        let fill = self.config.initial_fill.min(self.conveyor.len());
        for slot in 0..fill {
            if self.conveyor.slot_at(slot).is_some() {
                continue;
            }
            let symbol = self.spawn_symbol(Location::InInventory(slot));
            self.conveyor.insert(slot, symbol)?;
            if let Some(symbol) = self.conveyor.slot_at(slot) {
                let movement = self.catalog.get(&symbol.key).map(|def| def.movement);
                let mut out = Dispatch::new(events, &mut self.barrier);
                out.created(symbol);
                out.texture(Spot::Slot(slot), movement);
            }
        }
        info!(
            seed = self.rng.seed(),
            goal = self.economy.goal,
            coins = self.economy.coins_remaining,
            "game started"
        );
        events.push(Event::GameStarted {
            day: self.economy.day,
            goal: self.economy.goal,
            coins: self.economy.coins_remaining,
        });
        Ok(())
    }

    /// Moves a cleared day on to the next one. The board and score carry
    /// over.
    pub fn end_day(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        if !self.end_turn_active() {
            debug!("end day rejected while a turn is resolving");
            return Err(RunError::TurnLocked);
        }
        self.economy.advance_day(&self.config).map_err(|err| {
            debug!(%err, "end day rejected");
            err
        })?;
        info!(day = self.economy.day, goal = self.economy.goal, "day started");
        events.push(Event::DayStarted {
            day: self.economy.day,
            goal: self.economy.goal,
            coins: self.economy.coins_remaining,
        });
        Ok(())
    }

    pub(super) fn game_over(&mut self, events: &mut EventBus) {
        info!(
            day = self.economy.day,
            score = self.economy.score,
            goal = self.economy.goal,
            "game over"
        );
        events.push(Event::GameOver {
            day: self.economy.day,
            score: self.economy.score,
            goal: self.economy.goal,
        });
        self.economy.phase = Phase::GameOver;
        self.clear_board(events);
        self.economy.reset(&self.config);
    }

    fn clear_board(&mut self, events: &mut EventBus) {
        let mut out = Dispatch::new(events, &mut self.barrier);
        for pos in self.grid.occupied_positions() {
            if let Some(mut symbol) = self.grid.clear(pos) {
                symbol.location = Location::Destroyed;
                out.destroyed(&symbol, DestroyCause::Reset);
                out.texture(Spot::Cell(pos), None);
            }
        }
        for slot in self.conveyor.occupied_slots() {
            if let Some(mut symbol) = self.conveyor.take(slot) {
                symbol.location = Location::Destroyed;
                out.destroyed(&symbol, DestroyCause::Reset);
                out.texture(Spot::Slot(slot), None);
            }
        }
    }
}
