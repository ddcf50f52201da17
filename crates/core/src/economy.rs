use crate::{GameConfig, RunError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    AwaitingStart,
    Playing,
    DayCleared,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayOutcome {
    Cleared,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomyState {
    pub score: i64,
    pub coins_remaining: u32,
    pub coins_max: u32,
    pub day: u32,
    pub goal: i64,
    pub phase: Phase,
}

impl EconomyState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            coins_remaining: config.coins_per_day,
            coins_max: config.coins_per_day,
            day: 1,
            goal: config.starting_goal,
            phase: Phase::AwaitingStart,
        }
    }

    pub fn start(&mut self) -> Result<(), RunError> {
        if self.phase != Phase::AwaitingStart {
            return Err(RunError::InvalidPhase(self.phase));
        }
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Spends one coin and banks `turn_value` into the score.
    pub fn charge(&mut self, turn_value: i64) -> Result<(), RunError> {
        if self.phase != Phase::Playing {
            return Err(RunError::InvalidPhase(self.phase));
        }
        if self.coins_remaining == 0 {
            return Err(RunError::NoCoinsLeft);
        }
        self.coins_remaining -= 1;
        self.score = self.score.saturating_add(turn_value.max(0));
        Ok(())
    }

    pub fn day_outcome(&self) -> Option<DayOutcome> {
        if self.phase != Phase::Playing || self.coins_remaining > 0 {
            return None;
        }
        if self.score >= self.goal {
            Some(DayOutcome::Cleared)
        } else {
            Some(DayOutcome::Failed)
        }
    }

    /// Applies the end-of-day check once the coins run out.
    pub fn close_day(&mut self) -> Option<DayOutcome> {
        let outcome = self.day_outcome()?;
        self.phase = match outcome {
            DayOutcome::Cleared => Phase::DayCleared,
            DayOutcome::Failed => Phase::GameOver,
        };
        Some(outcome)
    }

    pub fn advance_day(&mut self, config: &GameConfig) -> Result<(), RunError> {
        if self.phase != Phase::DayCleared {
            return Err(RunError::InvalidPhase(self.phase));
        }
        self.day = self.day.saturating_add(1);
        self.coins_remaining = self.coins_max;
        self.goal = config.next_goal(self.goal);
        self.phase = Phase::Playing;
        Ok(())
    }

    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> EconomyState {
        let mut economy = EconomyState::new(&GameConfig::default());
        economy.start().expect("start");
        economy
    }

    #[test]
    fn five_turns_of_twelve_clear_the_first_day() {
        let config = GameConfig::default();
        let mut economy = playing();
        for turn in 0..5 {
            economy.charge(12).expect("charge");
            if turn < 4 {
                assert_eq!(economy.close_day(), None);
            }
        }
        assert_eq!(economy.score, 60);
        assert_eq!(economy.coins_remaining, 0);
        assert_eq!(economy.close_day(), Some(DayOutcome::Cleared));
        assert_eq!(economy.phase, Phase::DayCleared);

        economy.advance_day(&config).expect("advance");
        assert_eq!(economy.day, 2);
        assert_eq!(economy.goal, 113);
        assert_eq!(economy.coins_remaining, 5);
        assert_eq!(economy.score, 60);
        assert_eq!(economy.phase, Phase::Playing);
    }

    #[test]
    fn short_score_ends_the_game() {
        let mut economy = playing();
        for _ in 0..5 {
            economy.charge(3).expect("charge");
        }
        assert_eq!(economy.close_day(), Some(DayOutcome::Failed));
        assert_eq!(economy.phase, Phase::GameOver);
    }

    #[test]
    fn charging_without_coins_is_rejected() {
        let mut economy = playing();
        economy.coins_remaining = 0;
        assert!(matches!(economy.charge(1), Err(RunError::NoCoinsLeft)));
        assert_eq!(economy.score, 0);
    }

    #[test]
    fn advancing_requires_a_cleared_day() {
        let mut economy = playing();
        assert!(matches!(
            economy.advance_day(&GameConfig::default()),
            Err(RunError::InvalidPhase(Phase::Playing))
        ));
        assert_eq!(economy.day, 1);
    }
}
