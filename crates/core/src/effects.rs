use crate::{Catalog, EffectTuning, Grid, NeighborPattern, Pos, RngState, SymbolDef, SymbolId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DestroyCause {
    /// Removed by the effect of the given symbol, possibly itself.
    Effect(SymbolId),
    /// Swept up because it shares a key with a destroyed symbol.
    Chain(SymbolId),
    /// Fell off the end of the conveyor unplaced.
    Evicted,
    /// Cleared by a game over or a new game.
    Reset,
}

/// A single state change requested by an effect rule. Rules only read the
/// grid; the resolver applies mutations in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddValue { target: Pos, delta: i64 },
    SetValue { target: Pos, value: i64 },
    SwapValues { a: Pos, b: Pos },
    /// Drop back to `value` and fire the reset cue.
    ResetValue { target: Pos, value: i64 },
    /// Destruction is resolved through the target's protectors instead.
    TriggerShield { target: Pos },
    Destroy { target: Pos, cause: DestroyCause },
}

pub struct EffectContext<'a> {
    pub grid: &'a Grid,
    pub catalog: &'a Catalog,
    pub tuning: &'a EffectTuning,
}

impl EffectContext<'_> {
    pub fn def_at(&self, pos: Pos) -> Option<&SymbolDef> {
        let symbol = self.grid.symbol_at(pos)?;
        self.catalog.get(&symbol.key)
    }

    fn is_fruit_at(&self, pos: Pos) -> bool {
        self.def_at(pos).is_some_and(SymbolDef::is_fruit)
    }

    fn key_at(&self, pos: Pos) -> Option<&str> {
        self.grid.symbol_at(pos).map(|symbol| symbol.key.as_str())
    }

    fn value_at(&self, pos: Pos) -> i64 {
        self.grid.symbol_at(pos).map_or(0, |symbol| symbol.value)
    }

    fn neighbors_where<F>(&self, pos: Pos, pattern: NeighborPattern, pred: F) -> Vec<Pos>
    where
        F: Fn(Pos) -> bool,
    {
        self.grid
            .occupied_neighbors(pos, pattern)
            .into_iter()
            .filter(|next| pred(*next))
            .collect()
    }

    /// Occupied cells other than `pos`, row-major.
    fn others_where<F>(&self, pos: Pos, pred: F) -> Vec<Pos>
    where
        F: Fn(Pos) -> bool,
    {
        self.grid
            .occupied_positions()
            .into_iter()
            .filter(|other| *other != pos && pred(*other))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EffectRule {
    Cherry,
    Banana,
    Strawberry,
    Orange,
    Lemon,
    Watermelon,
    Grape,
    Peach,
    Kiwi,
    Pineapple,
    Apple,
    Shield,
}

impl EffectRule {
    pub const ALL: [EffectRule; 12] = [
        EffectRule::Cherry,
        EffectRule::Banana,
        EffectRule::Strawberry,
        EffectRule::Orange,
        EffectRule::Lemon,
        EffectRule::Watermelon,
        EffectRule::Grape,
        EffectRule::Peach,
        EffectRule::Kiwi,
        EffectRule::Pineapple,
        EffectRule::Apple,
        EffectRule::Shield,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "cherry" => Some(Self::Cherry),
            "banana" => Some(Self::Banana),
            "strawberry" => Some(Self::Strawberry),
            "orange" => Some(Self::Orange),
            "lemon" => Some(Self::Lemon),
            "watermelon" => Some(Self::Watermelon),
            "grape" => Some(Self::Grape),
            "peach" => Some(Self::Peach),
            "kiwi" => Some(Self::Kiwi),
            "pineapple" => Some(Self::Pineapple),
            "apple" => Some(Self::Apple),
            "coconut" => Some(Self::Shield),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Cherry => "cherry",
            Self::Banana => "banana",
            Self::Strawberry => "strawberry",
            Self::Orange => "orange",
            Self::Lemon => "lemon",
            Self::Watermelon => "watermelon",
            Self::Grape => "grape",
            Self::Peach => "peach",
            Self::Kiwi => "kiwi",
            Self::Pineapple => "pineapple",
            Self::Apple => "apple",
            Self::Shield => "coconut",
        }
    }

    /// Computes the mutations for the symbol at `pos`. The grid is read as
    /// it stands, including changes made earlier in the same pass.
    pub fn resolve(self, ctx: &EffectContext, pos: Pos, rng: &mut RngState) -> Vec<Mutation> {
        let Some(symbol) = ctx.grid.symbol_at(pos) else {
            return Vec::new();
        };
        let own_key = symbol.key.as_str();
        let own_id = symbol.id;
        let tuning = ctx.tuning;
        let mut out = Vec::new();
        match self {
            Self::Cherry => {
                let others = ctx.others_where(pos, |other| ctx.key_at(other) == Some(own_key));
                let chance =
                    (1.0 - tuning.cherry_step * others.len() as f64).max(tuning.cherry_floor);
                if rng.chance(chance) {
                    let gain = ctx
                        .neighbors_where(pos, NeighborPattern::Plus, |n| ctx.is_fruit_at(n))
                        .len() as i64;
                    push_gain(&mut out, pos, gain);
                }
            }
            Self::Banana => {
                push_gain(&mut out, pos, 1);
                if rng.chance(tuning.banana_destroy_chance) {
                    if symbol.is_protected() {
                        out.push(Mutation::TriggerShield { target: pos });
                    } else {
                        let fruits =
                            ctx.neighbors_where(pos, NeighborPattern::All8, |n| ctx.is_fruit_at(n));
                        if let Some(&target) = rng.pick(&fruits) {
                            push_gain(&mut out, target, ctx.value_at(target));
                        }
                        out.push(Mutation::Destroy {
                            target: pos,
                            cause: DestroyCause::Effect(own_id),
                        });
                    }
                }
            }
            Self::Strawberry => {
                let fruits =
                    ctx.neighbors_where(pos, NeighborPattern::All8, |n| ctx.is_fruit_at(n));
                if fruits.is_empty() {
                    push_gain(&mut out, pos, tuning.strawberry_bonus);
                }
            }
            Self::Orange => {
                let drained = ctx.neighbors_where(pos, NeighborPattern::Diagonals, |n| {
                    ctx.is_fruit_at(n) && ctx.key_at(n) != Some(own_key) && ctx.value_at(n) > 1
                });
                push_gain(&mut out, pos, tuning.orange_gain * drained.len() as i64);
                for target in drained {
                    out.push(Mutation::AddValue { target, delta: -1 });
                }
            }
            Self::Lemon => {
                let foreign = ctx.neighbors_where(pos, NeighborPattern::Diagonals, |n| {
                    ctx.is_fruit_at(n) && ctx.key_at(n) != Some(own_key)
                });
                if foreign.is_empty() {
                    let kin = ctx
                        .neighbors_where(pos, NeighborPattern::Plus, |n| {
                            ctx.key_at(n) == Some(own_key)
                        })
                        .len() as i64;
                    push_gain(&mut out, pos, tuning.lemon_gain * kin);
                }
            }
            Self::Watermelon => {
                push_gain(&mut out, pos, 1);
                let below = Pos::new(pos.row + 1, pos.col);
                if let Some(victim) = ctx.grid.symbol_at(below) {
                    if victim.is_protected() {
                        out.push(Mutation::TriggerShield { target: below });
                    } else if victim.key == own_key {
                        out.push(Mutation::Destroy {
                            target: below,
                            cause: DestroyCause::Effect(own_id),
                        });
                        out.push(Mutation::Destroy {
                            target: pos,
                            cause: DestroyCause::Effect(own_id),
                        });
                    } else if ctx.is_fruit_at(below) {
                        push_gain(&mut out, pos, victim.value);
                        out.push(Mutation::Destroy {
                            target: below,
                            cause: DestroyCause::Effect(own_id),
                        });
                    }
                }
            }
            Self::Grape => {
                let kin = ctx.others_where(pos, |other| ctx.key_at(other) == Some(own_key));
                push_gain(&mut out, pos, kin.len() as i64);
            }
            Self::Peach => {
                if ctx.grid.is_edge(pos) {
                    let fruits = ctx.others_where(pos, |other| ctx.is_fruit_at(other));
                    push_gain(&mut out, pos, fruits.len() as i64);
                }
            }
            Self::Kiwi => {
                let fruits = ctx.others_where(pos, |other| ctx.is_fruit_at(other));
                let gain = match rng.pick(&fruits) {
                    Some(&source) => ctx.value_at(source),
                    None => 1,
                };
                push_gain(&mut out, pos, gain);
                if rng.chance(tuning.kiwi_reset_chance) && symbol.value + gain > 1 {
                    out.push(Mutation::ResetValue {
                        target: pos,
                        value: 1,
                    });
                }
            }
            Self::Pineapple => {
                let others = ctx.others_where(pos, |_| true);
                match rng.pick(&others) {
                    Some(&other) => out.push(Mutation::SwapValues { a: pos, b: other }),
                    None => push_gain(&mut out, pos, 1),
                }
            }
            Self::Apple => {
                let best = ctx
                    .others_where(pos, |other| ctx.is_fruit_at(other))
                    .into_iter()
                    .map(|other| ctx.value_at(other))
                    .max()
                    .unwrap_or(0);
                out.push(Mutation::SetValue {
                    target: pos,
                    value: best,
                });
            }
            Self::Shield => {}
        }
        out
    }
}

fn push_gain(out: &mut Vec<Mutation>, target: Pos, delta: i64) {
    if delta != 0 {
        out.push(Mutation::AddValue { target, delta });
    }
}
