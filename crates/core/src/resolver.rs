//! Per-turn effect resolution.
//!
//! Three passes over the grid: protection from the previous turn is wiped,
//! protectors shield their neighbours, then every symbol fires its rule in
//! row-major order. Mutations land immediately, so a symbol later in the
//! order sees what earlier symbols did.

use crate::{
    Catalog, DestroyCause, Dispatch, DestructionType, EffectContext, EffectRule, EffectTuning,
    Event, Grid, Location, Mutation, NeighborPattern, Pos, ProtectionEntry, RngState, Spot,
    SymbolInstance,
};
use tracing::trace;

#[derive(Debug, Default)]
pub struct EffectReport {
    pub destroyed: Vec<SymbolInstance>,
    pub shields_triggered: usize,
    pub rules_fired: usize,
}

pub fn resolve_effects(
    grid: &mut Grid,
    catalog: &Catalog,
    tuning: &EffectTuning,
    rng: &mut RngState,
    out: &mut Dispatch,
) -> EffectReport {
    grid.clear_protection();
    register_shields(grid, catalog);

    let mut report = EffectReport::default();
    let order: Vec<Pos> = grid.positions().collect();
    for pos in order {
        let Some(symbol) = grid.symbol_at(pos) else {
            continue;
        };
        let Some(rule) = EffectRule::from_key(&symbol.key) else {
            continue;
        };
        let mutations = {
            let ctx = EffectContext {
                grid: &*grid,
                catalog,
                tuning,
            };
            rule.resolve(&ctx, pos, rng)
        };
        report.rules_fired += 1;
        for mutation in mutations {
            apply_mutation(grid, catalog, mutation, out, &mut report);
        }
    }
    report
}

/// Gives every neighbour of a protector a shield entry for this turn.
/// Protectors never shield copies of themselves.
pub fn register_shields(grid: &mut Grid, catalog: &Catalog) {
    let mut grants = Vec::new();
    for pos in grid.occupied_positions() {
        let Some(protector) = grid.symbol_at(pos) else {
            continue;
        };
        let Some(shield) = catalog.get(&protector.key).and_then(|def| def.shield) else {
            continue;
        };
        for neighbor in grid.occupied_neighbors(pos, NeighborPattern::All8) {
            if grid.symbol_at(neighbor).is_some_and(|n| n.key != protector.key) {
                grants.push((
                    neighbor,
                    ProtectionEntry {
                        source: protector.id,
                        reward: shield.reward,
                    },
                ));
            }
        }
    }
    for (pos, entry) in grants {
        if let Some(symbol) = grid.symbol_at_mut(pos) {
            symbol.protection.push(entry);
        }
    }
}

pub fn apply_mutation(
    grid: &mut Grid,
    catalog: &Catalog,
    mutation: Mutation,
    out: &mut Dispatch,
    report: &mut EffectReport,
) {
    trace!(?mutation, "apply");
    match mutation {
        Mutation::AddValue { target, delta } => {
            if let Some(symbol) = grid.symbol_at_mut(target) {
                let before = symbol.value;
                symbol.add_value(delta);
                if symbol.value != before {
                    out.value_changed(symbol);
                }
            }
        }
        Mutation::SetValue { target, value } => {
            if let Some(symbol) = grid.symbol_at_mut(target) {
                if symbol.value != value {
                    symbol.value = value.max(0);
                    out.value_changed(symbol);
                }
            }
        }
        Mutation::SwapValues { a, b } => {
            let (Some(left), Some(right)) = (
                grid.symbol_at(a).map(|s| s.value),
                grid.symbol_at(b).map(|s| s.value),
            ) else {
                return;
            };
            for (pos, value) in [(a, right), (b, left)] {
                if let Some(symbol) = grid.symbol_at_mut(pos) {
                    symbol.value = value;
                    out.value_changed(symbol);
                }
            }
        }
        Mutation::ResetValue { target, value } => {
            if let Some(symbol) = grid.symbol_at_mut(target) {
                symbol.value = value;
                out.value_changed(symbol);
                out.push(Event::ValueReset { id: symbol.id });
            }
        }
        Mutation::TriggerShield { target } => trigger_shield(grid, target, out, report),
        Mutation::Destroy { target, cause } => {
            destroy_with_chain(grid, catalog, target, cause, out, report)
        }
    }
}

/// Runs every protector callback registered on the symbol at `target`.
/// Protectors that are gone by now are skipped.
pub fn trigger_shield(grid: &mut Grid, target: Pos, out: &mut Dispatch, report: &mut EffectReport) {
    let Some(protected) = grid.symbol_at(target) else {
        return;
    };
    let protected_id = protected.id;
    let entries = protected.protection.clone();
    for entry in entries {
        let Some(source_pos) = grid.find(entry.source) else {
            continue;
        };
        if let Some(protector) = grid.symbol_at_mut(source_pos) {
            protector.add_value(entry.reward);
            if entry.reward != 0 {
                out.value_changed(protector);
            }
        }
        out.push(Event::ShieldTriggered {
            protector: entry.source,
            protected: protected_id,
        });
        report.shields_triggered += 1;
    }
}

/// Destroys the symbol at `target`. A shielded target calls its protectors
/// instead. Symbols whose destruction type is `SameKey` take every
/// unshielded copy of their key with them; shielded copies call their
/// protectors.
pub fn destroy_with_chain(
    grid: &mut Grid,
    catalog: &Catalog,
    target: Pos,
    cause: DestroyCause,
    out: &mut Dispatch,
    report: &mut EffectReport,
) {
    let Some(symbol) = grid.symbol_at(target) else {
        return;
    };
    let shielded = symbol.is_protected();
    let trigger_id = symbol.id;
    let key = symbol.key.clone();
    if shielded {
        trigger_shield(grid, target, out, report);
        return;
    }
    let chained = catalog
        .get(&key)
        .is_some_and(|def| def.destruction == DestructionType::SameKey);

    destroy_at(grid, target, cause, out, report);
    if !chained {
        return;
    }
    let copies: Vec<Pos> = grid
        .occupied_positions()
        .into_iter()
        .filter(|pos| grid.symbol_at(*pos).is_some_and(|s| s.key == key))
        .collect();
    for pos in copies {
        let shielded = grid.symbol_at(pos).is_some_and(SymbolInstance::is_protected);
        if shielded {
            trigger_shield(grid, pos, out, report);
        } else {
            destroy_at(grid, pos, DestroyCause::Chain(trigger_id), out, report);
        }
    }
}

fn destroy_at(
    grid: &mut Grid,
    pos: Pos,
    cause: DestroyCause,
    out: &mut Dispatch,
    report: &mut EffectReport,
) {
    let Some(mut symbol) = grid.clear(pos) else {
        return;
    };
    symbol.location = Location::Destroyed;
    trace!(id = %symbol.id, key = %symbol.key, %pos, ?cause, "destroyed");
    out.destroyed(&symbol, cause);
    out.texture(Spot::Cell(pos), None);
    report.destroyed.push(symbol);
}
