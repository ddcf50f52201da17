use crate::{Location, SymbolId, SymbolInstance};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Self { row, col })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborPattern {
    /// Orthogonal neighbours.
    Plus,
    /// The four corners.
    Diagonals,
    All8,
}

const PLUS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ALL8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl NeighborPattern {
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Self::Plus => &PLUS,
            Self::Diagonals => &DIAGONALS,
            Self::All8 => &ALL8,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub symbol: Option<SymbolInstance>,
}

impl Cell {
    pub fn occupied(&self) -> bool {
        self.symbol.is_some()
    }
}

/// Row-major cell matrix. Callers own the placement rules; the grid only
/// checks bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    pub fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    pub fn symbol_at(&self, pos: Pos) -> Option<&SymbolInstance> {
        self.cell_at(pos)?.symbol.as_ref()
    }

    pub fn symbol_at_mut(&mut self, pos: Pos) -> Option<&mut SymbolInstance> {
        let idx = self.index(pos)?;
        self.cells[idx].symbol.as_mut()
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.cell_at(pos).is_some_and(Cell::occupied)
    }

    pub fn is_edge(&self, pos: Pos) -> bool {
        self.in_bounds(pos)
            && (pos.row == 0 || pos.col == 0 || pos.row + 1 == self.rows || pos.col + 1 == self.cols)
    }

    /// Puts `instance` at `pos` and returns whatever was there before.
    /// Out-of-bounds positions hand the instance back unchanged.
    pub fn place(
        &mut self,
        mut instance: SymbolInstance,
        pos: Pos,
    ) -> Result<Option<SymbolInstance>, SymbolInstance> {
        let Some(idx) = self.index(pos) else {
            return Err(instance);
        };
        instance.location = Location::InGrid(pos);
        Ok(self.cells[idx].symbol.replace(instance))
    }

    pub fn clear(&mut self, pos: Pos) -> Option<SymbolInstance> {
        let idx = self.index(pos)?;
        self.cells[idx].symbol.take()
    }

    pub fn neighbors(&self, pos: Pos, pattern: NeighborPattern) -> Vec<Pos> {
        pattern
            .offsets()
            .iter()
            .filter_map(|&(d_row, d_col)| pos.offset(d_row, d_col))
            .filter(|next| self.in_bounds(*next))
            .collect()
    }

    pub fn occupied_neighbors(&self, pos: Pos, pattern: NeighborPattern) -> Vec<Pos> {
        self.neighbors(pos, pattern)
            .into_iter()
            .filter(|next| self.is_occupied(*next))
            .collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Pos::new(row, col)))
    }

    pub fn occupied_positions(&self) -> Vec<Pos> {
        self.positions().filter(|pos| self.is_occupied(*pos)).collect()
    }

    pub fn free_cells(&self) -> Vec<Pos> {
        self.positions().filter(|pos| !self.is_occupied(*pos)).collect()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolInstance> {
        self.cells.iter().filter_map(|cell| cell.symbol.as_ref())
    }

    pub fn find(&self, id: SymbolId) -> Option<Pos> {
        self.symbols()
            .find(|symbol| symbol.id == id)
            .and_then(SymbolInstance::grid_pos)
    }

    pub fn count(&self) -> usize {
        self.symbols().count()
    }

    pub fn total_value(&self) -> i64 {
        self.symbols().map(|symbol| symbol.value).sum()
    }

    pub fn clear_protection(&mut self) {
        for cell in &mut self.cells {
            if let Some(symbol) = cell.symbol.as_mut() {
                symbol.protection.clear();
            }
        }
    }

    pub fn drain(&mut self) -> Vec<SymbolInstance> {
        self.cells
            .iter_mut()
            .filter_map(|cell| cell.symbol.take())
            .collect()
    }

    /// Every held symbol must report the cell it sits in, and no id may
    /// appear twice.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for pos in self.positions() {
            let Some(symbol) = self.symbol_at(pos) else {
                continue;
            };
            if symbol.location != Location::InGrid(pos) {
                return Err(format!(
                    "symbol {} at {pos} reports {:?}",
                    symbol.id, symbol.location
                ));
            }
            if !seen.insert(symbol.id) {
                return Err(format!("symbol {} appears twice on the grid", symbol.id));
            }
        }
        Ok(())
    }
}
