use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Working state of one puzzle: the static [`Layout`] plus per-cell solution, locks and symbols.
///
/// Every accessor taking a coordinate panics when it is out of bounds. Coordinates coming from
/// outside the crate go through [`Layout::validate_coords`] first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    layout: Layout,
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new(layout: Layout) -> Self {
        let size = layout.size();
        Self {
            layout,
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn from_parts(layout: Layout, cells: Array2<Cell>) -> Result<Self> {
        if cells.dim() != layout.disabled_mask().dim() {
            return Err(PuzzleError::InvalidLayoutShape);
        }
        Ok(Self { layout, cells })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn width(&self) -> Coord {
        self.layout.width()
    }

    pub fn height(&self) -> Coord {
        self.layout.height()
    }

    /// Resets every cell to unlit, unlocked and empty. The disabled mask is kept.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn is_disabled(&self, coords: Coord2) -> bool {
        self.layout[coords]
    }

    pub fn is_locked(&self, coords: Coord2) -> bool {
        self.cells[coords.to_nd_index()].locked
    }

    pub fn is_in_solution(&self, coords: Coord2) -> bool {
        self.cells[coords.to_nd_index()].solution
    }

    pub fn set_solution(&mut self, coords: Coord2, lit: bool) {
        self.cells[coords.to_nd_index()].solution = lit;
    }

    /// Freezes the current solution value of `coords`.
    pub fn lock_tile(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].locked = true;
    }

    /// Freezes `coords` with the given solution value.
    pub fn lock_tile_lit(&mut self, coords: Coord2, lit: bool) {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.locked = true;
        cell.solution = lit;
    }

    pub fn symbol(&self, coords: Coord2) -> Symbol {
        self.cells[coords.to_nd_index()].symbol
    }

    pub fn color(&self, coords: Coord2) -> Color {
        self.cells[coords.to_nd_index()].color
    }

    pub fn set_symbol(&mut self, coords: Coord2, symbol: Symbol, color: Color) {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.symbol = symbol;
        cell.color = color;
    }

    /// Whether `coords` is enabled and still free for a symbol.
    pub fn is_open(&self, coords: Coord2) -> bool {
        !self.is_disabled(coords) && self.symbol(coords).is_none()
    }

    /// Enabled coordinates without a symbol, rows first.
    pub fn open_tiles(&self) -> Vec<Coord2> {
        iter_coords(self.size())
            .filter(|&coords| self.is_open(coords))
            .collect()
    }

    /// Coordinates carrying `symbol` painted `color`.
    pub fn find_symbols(&self, symbol: Symbol, color: Color) -> Vec<Coord2> {
        iter_coords(self.size())
            .filter(|&coords| {
                let cell = self.cell(coords);
                cell.symbol == symbol && cell.color == color
            })
            .collect()
    }

    pub fn locked_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.locked).count()
    }

    /// Solution bitmap, with disabled cells reported unlit.
    pub fn solution_mask(&self) -> Array2<bool> {
        let mut mask = self.cells.map(|cell| cell.solution);
        for (lit, &disabled) in mask.iter_mut().zip(self.layout.disabled_mask().iter()) {
            *lit &= !disabled;
        }
        mask
    }
}
