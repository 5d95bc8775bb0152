#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use graveyard::*;
pub use grid::*;
pub use region::*;
pub use store::*;
pub use tutorial::*;
pub use types::*;

pub mod catalog;
mod cell;
mod error;
mod generator;
mod graveyard;
mod grid;
mod region;
mod store;
mod tutorial;
mod types;

/// Static shape of a puzzle: its size and which cells are permanently out of play.
///
/// This is what the persistence collaborator hands out on load. Clearing a [`Grid`] never
/// touches it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LayoutRepr")]
pub struct Layout {
    disabled: Array2<bool>,
}

/// Unchecked serialized form of [`Layout`].
#[derive(Deserialize)]
struct LayoutRepr {
    disabled: Array2<bool>,
}

impl TryFrom<LayoutRepr> for Layout {
    type Error = PuzzleError;

    fn try_from(repr: LayoutRepr) -> Result<Self> {
        Self::from_disabled_mask(repr.disabled)
    }
}

impl Layout {
    /// Fully enabled layout of the given size, each side clamped to at least one cell.
    pub fn new((size_x, size_y): Coord2) -> Self {
        let size = (size_x.max(1), size_y.max(1));
        Self {
            disabled: Array2::default(size.to_nd_index()),
        }
    }

    pub fn from_disabled_mask(disabled: Array2<bool>) -> Result<Self> {
        let (dim_x, dim_y) = disabled.dim();
        if dim_x == 0 || dim_y == 0 || dim_x > Coord::MAX.into() || dim_y > Coord::MAX.into() {
            return Err(PuzzleError::InvalidLayoutShape);
        }
        Ok(Self { disabled })
    }

    pub fn from_disabled_coords(size: Coord2, disabled_coords: &[Coord2]) -> Result<Self> {
        let mut layout = Self::new(size);
        if layout.size() != size {
            return Err(PuzzleError::InvalidLayoutShape);
        }

        for &coords in disabled_coords {
            let coords = layout.validate_coords(coords)?;
            layout.disabled[coords.to_nd_index()] = true;
        }

        Ok(layout)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(PuzzleError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.disabled.dim();
        // Shape is checked on construction.
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (size_x, size_y) = self.size();
        mult(size_x, size_y)
    }

    pub fn enabled_cell_count(&self) -> CellCount {
        let disabled = self.disabled.iter().filter(|&&is_disabled| is_disabled).count();
        self.total_cells() - disabled as CellCount
    }

    pub fn is_disabled(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn disabled_mask(&self) -> &Array2<bool> {
        &self.disabled
    }

    /// In-bounds, enabled orthogonal neighbors of `coords`.
    pub fn iter_enabled_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.disabled
            .iter_neighbors(coords)
            .filter(|&pos| !self[pos])
    }
}

impl Index<Coord2> for Layout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.disabled[(x as usize, y as usize)]
    }
}
