use crate::{Catalog, Dispatch, Grid, Location, MovementClass, Pos, RngState, Spot, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub id: SymbolId,
    pub from: Pos,
    pub to: Pos,
}

fn is_random_at(grid: &Grid, catalog: &Catalog, pos: Pos) -> bool {
    grid.symbol_at(pos)
        .and_then(|symbol| catalog.get(&symbol.key))
        .is_some_and(|def| def.movement == MovementClass::Random)
}

/// Chooses a new cell for every random-movement symbol. Candidates are the
/// free cells plus the cells random symbols currently hold; each claim
/// removes its cell from the pool. A symbol whose only remaining candidate
/// is its own cell stays put.
pub fn plan_relocations(grid: &Grid, catalog: &Catalog, rng: &mut RngState) -> Vec<Relocation> {
    let movers: Vec<Pos> = grid
        .occupied_positions()
        .into_iter()
        .filter(|pos| is_random_at(grid, catalog, *pos))
        .collect();
    if movers.is_empty() {
        return Vec::new();
    }
    let mut pool: Vec<Pos> = grid
        .positions()
        .filter(|pos| !grid.is_occupied(*pos) || is_random_at(grid, catalog, *pos))
        .collect();
    rng.shuffle(&mut pool);

    let mut plan = Vec::with_capacity(movers.len());
    for from in movers {
        let Some(symbol) = grid.symbol_at(from) else {
            continue;
        };
        match pool.iter().position(|candidate| *candidate != from) {
            Some(idx) => {
                let to = pool.remove(idx);
                plan.push(Relocation {
                    id: symbol.id,
                    from,
                    to,
                });
            }
            None => {
                // Staying keeps the cell, so nobody else may claim it.
                pool.retain(|candidate| *candidate != from);
            }
        }
    }
    plan
}

/// Vacates every source cell before writing any destination, so no cell is
/// ever held by two symbols.
pub fn commit_relocations(
    grid: &mut Grid,
    catalog: &Catalog,
    plan: &[Relocation],
    out: &mut Dispatch,
) {
    let mut lifted = Vec::with_capacity(plan.len());
    for step in plan {
        if let Some(symbol) = grid.clear(step.from) {
            out.texture(Spot::Cell(step.from), None);
            lifted.push((symbol, step));
        }
    }
    for (symbol, step) in lifted {
        let movement = catalog.get(&symbol.key).map(|def| def.movement);
        let id = symbol.id;
        match grid.place(symbol, step.to) {
            Ok(_) => {
                out.moved(id, Location::InGrid(step.from), Location::InGrid(step.to));
                out.texture(Spot::Cell(step.to), movement);
            }
            Err(symbol) => {
                // Out-of-bounds destination; put it back where it was.
                let _ = grid.place(symbol, step.from);
                out.texture(Spot::Cell(step.from), movement);
            }
        }
    }
}

pub fn relocate_random(
    grid: &mut Grid,
    catalog: &Catalog,
    rng: &mut RngState,
    out: &mut Dispatch,
) -> Vec<Relocation> {
    let plan = plan_relocations(grid, catalog, rng);
    commit_relocations(grid, catalog, &plan, out);
    plan
}
