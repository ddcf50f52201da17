use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectTuning {
    /// Lowest success chance a crowded cherry can fall to.
    pub cherry_floor: f64,
    /// Chance lost per other cherry on the grid.
    pub cherry_step: f64,
    pub banana_destroy_chance: f64,
    pub strawberry_bonus: i64,
    pub orange_gain: i64,
    pub lemon_gain: i64,
    pub kiwi_reset_chance: f64,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            cherry_floor: 0.15,
            cherry_step: 0.03,
            banana_destroy_chance: 0.15,
            strawberry_bonus: 1,
            orange_gain: 2,
            lemon_gain: 1,
            kiwi_reset_chance: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub inventory_slots: usize,
    pub initial_fill: usize,
    pub coins_per_day: u32,
    pub starting_goal: i64,
    pub goal_growth: f64,
    pub effects: EffectTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_rows: 8,
            grid_cols: 8,
            inventory_slots: 8,
            initial_fill: 4,
            coins_per_day: 5,
            starting_goal: 50,
            goal_growth: 2.25,
            effects: EffectTuning::default(),
        }
    }
}

impl GameConfig {
    pub fn next_goal(&self, goal: i64) -> i64 {
        (goal as f64 * self.goal_growth).ceil() as i64
    }
}
