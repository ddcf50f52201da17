use super::*;
use crate::*;
use tracing::{debug, info};

impl RunState {
    /// Ends the current turn: charge a coin, resolve effects, relocate random
    /// symbols, then advance the conveyor. The turn settles once every
    /// animation it dispatched has completed.
    pub fn end_turn(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.try_end_turn(events).map_err(|err| {
            debug!(%err, "end turn rejected");
            err
        })
    }

    fn try_end_turn(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        if !self.end_turn_active() {
            return Err(RunError::TurnLocked);
        }
        let turn_value = self.grid.total_value();
        self.economy.charge(turn_value)?;
        self.set_stage(TurnStage::Resolving);
        events.push(Event::TurnCharged {
            turn_value,
            score: self.economy.score,
            coins_remaining: self.economy.coins_remaining,
        });

        let mut out = Dispatch::new(events, &mut self.barrier);
        let report = resolve_effects(
            &mut self.grid,
            &self.catalog,
            &self.config.effects,
            &mut self.rng,
            &mut out,
        );
        let moved = relocate_random(&mut self.grid, &self.catalog, &mut self.rng, &mut out);
        debug!(
            rules = report.rules_fired,
            destroyed = report.destroyed.len(),
            shields = report.shields_triggered,
            relocated = moved.len(),
            "turn resolved"
        );

        let tail = self.conveyor.len().saturating_sub(1);
        match self.conveyor.evict_tail() {
            Some(evicted) => {
                let handle = out.destroyed(&evicted, DestroyCause::Evicted);
                out.texture(Spot::Slot(tail), None);
                self.set_stage(TurnStage::AwaitingEviction(handle));
            }
            None => {
                self.advance_conveyor(events);
                self.set_stage(TurnStage::Settling);
            }
        }
        self.try_settle(events);
        Ok(())
    }

    /// Completion signal from the presentation. Returns false for handles
    /// that are unknown or already completed.
    pub fn animation_finished(&mut self, handle: AnimationHandle, events: &mut EventBus) -> bool {
        if !self.barrier.complete(handle) {
            return false;
        }
        if self.stage == TurnStage::AwaitingEviction(handle) {
            self.advance_conveyor(events);
            self.set_stage(TurnStage::Settling);
        }
        self.try_settle(events);
        true
    }

    /// Completes every outstanding animation, including ones dispatched as
    /// a consequence of earlier completions.
    pub fn settle_all(&mut self, events: &mut EventBus) {
        loop {
            let outstanding = self.barrier.outstanding();
            if outstanding.is_empty() {
                break;
            }
            for handle in outstanding {
                self.animation_finished(handle, events);
            }
        }
    }

    fn advance_conveyor(&mut self, events: &mut EventBus) {
        let catalog = &self.catalog;
        let rng = &mut self.rng;
        let next_id = &mut self.next_symbol_id;
        let (moves, spawned) = self.conveyor.shift_and_refill(|| {
            let id = SymbolId(*next_id);
            *next_id = next_id.saturating_add(1);
            catalog.generate(rng, id, Location::InInventory(0))
        });

        let mut out = Dispatch::new(events, &mut self.barrier);
        for step in &moves {
            out.texture(Spot::Slot(step.from), None);
            out.moved(
                step.id,
                Location::InInventory(step.from),
                Location::InInventory(step.to),
            );
            let movement = self
                .conveyor
                .slot_at(step.to)
                .and_then(|symbol| self.catalog.get(&symbol.key))
                .map(|def| def.movement);
            out.texture(Spot::Slot(step.to), movement);
        }
        if spawned.is_some() {
            if let Some(symbol) = self.conveyor.slot_at(0) {
                out.created(symbol);
                let movement = self.catalog.get(&symbol.key).map(|def| def.movement);
                out.texture(Spot::Slot(0), movement);
            }
        }
    }

    fn try_settle(&mut self, events: &mut EventBus) {
        if self.stage != TurnStage::Settling || !self.barrier.is_clear() {
            return;
        }
        self.set_stage(TurnStage::Idle);
        events.push(Event::TurnSettled {
            score: self.economy.score,
            coins_remaining: self.economy.coins_remaining,
        });
        match self.economy.close_day() {
            Some(DayOutcome::Cleared) => {
                info!(
                    day = self.economy.day,
                    score = self.economy.score,
                    goal = self.economy.goal,
                    "day cleared"
                );
                events.push(Event::DayCleared {
                    day: self.economy.day,
                    score: self.economy.score,
                    goal: self.economy.goal,
                });
            }
            Some(DayOutcome::Failed) => self.game_over(events),
            None => {}
        }
    }
}
