use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the player is shown of one tutorial cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasCell {
    On,
    Off,
    Undecided,
}

impl CanvasCell {
    pub const fn from_lit(lit: bool) -> Self {
        if lit { Self::On } else { Self::Off }
    }

    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

impl Default for CanvasCell {
    fn default() -> Self {
        Self::Undecided
    }
}

/// Revealed state of a tutorial puzzle, shaped like the [`Grid`] it was built from.
///
/// Cells only ever go from decided to [`CanvasCell::Undecided`]; the grid keeps the hidden value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    layout: Layout,
    cells: Array2<CanvasCell>,
}

impl Canvas {
    /// Reveals every enabled cell of `grid` as its solution value. Disabled cells start undecided.
    pub fn from_grid(grid: &Grid) -> Self {
        let layout = grid.layout().clone();
        let mut cells = Array2::default(layout.size().to_nd_index());
        for coords in iter_coords(layout.size()) {
            if !layout.is_disabled(coords) {
                cells[coords.to_nd_index()] = CanvasCell::from_lit(grid.is_in_solution(coords));
            }
        }
        Self { layout, cells }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn cell(&self, coords: Coord2) -> CanvasCell {
        self.cells[coords.to_nd_index()]
    }

    pub fn cells(&self) -> &Array2<CanvasCell> {
        &self.cells
    }

    /// Hides `coords`. Returns whether it was still revealed.
    pub fn redact(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        let was_decided = cell.is_decided();
        *cell = CanvasCell::Undecided;
        was_decided
    }

    /// Hidden enabled cells.
    pub fn gaps(&self) -> Vec<Coord2> {
        iter_coords(self.size())
            .filter(|&coords| !self.layout.is_disabled(coords) && !self.cell(coords).is_decided())
            .collect()
    }

    /// Revealed cells with their value, rows first.
    pub fn iter_decided(&self) -> impl Iterator<Item = (Coord2, bool)> + '_ {
        iter_coords(self.size()).filter_map(|coords| match self.cell(coords) {
            CanvasCell::On => Some((coords, true)),
            CanvasCell::Off => Some((coords, false)),
            CanvasCell::Undecided => None,
        })
    }

    pub fn neighbor_counts(&self, coords: Coord2) -> NeighborCounts {
        let mut counts = NeighborCounts::default();
        for pos in self.layout.iter_enabled_neighbors(coords) {
            counts.total += 1;
            match self.cell(pos) {
                CanvasCell::On => counts.on += 1,
                CanvasCell::Off => counts.off += 1,
                CanvasCell::Undecided => {}
            }
        }
        counts
    }
}

/// Enabled orthogonal neighbors of a cell, and how many of them are revealed on or off.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborCounts {
    pub total: u8,
    pub on: u8,
    pub off: u8,
}

/// Whether a revealed cell in `state` can be hidden and still be read off its neighbors: at
/// least half of them show the opposite state and fewer than half show the same one.
pub fn is_deducible(state: CanvasCell, counts: NeighborCounts) -> bool {
    let half = counts.total / 2;
    match state {
        CanvasCell::Off => counts.on >= half && counts.off < half,
        CanvasCell::On => counts.off >= half && counts.on < half,
        CanvasCell::Undecided => false,
    }
}
