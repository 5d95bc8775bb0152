use alloc::string::String;
use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;
pub use canvas::*;

mod canvas;

/// Where the host places the hint blocks of a tutorial puzzle.
///
/// `path` is handed to the host untouched; `origin` is the local position of cell `(0, 0)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintAnchor {
    pub path: String,
    pub origin: (f32, f32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TutorialPuzzle {
    pub grid: Grid,
    pub canvas: Canvas,
}

/// Generator of tutorial puzzles: a random solution with some revealed cells hidden again, each
/// of them deducible from its revealed neighbors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TutorialGenerator {
    id: PuzzleId,
    layout: Layout,
    min_gaps: usize,
    max_gaps: usize,
    anchor: HintAnchor,
    forced: Vec<(Coord2, bool)>,
}

impl TutorialGenerator {
    pub fn new(
        id: PuzzleId,
        layout: Layout,
        min_gaps: usize,
        max_gaps: usize,
        anchor: HintAnchor,
    ) -> Result<Self> {
        if min_gaps > max_gaps {
            return Err(PuzzleError::InvalidGapRange {
                min: min_gaps,
                max: max_gaps,
            });
        }

        Ok(Self {
            id,
            layout,
            min_gaps,
            max_gaps,
            anchor,
            forced: Vec::new(),
        })
    }

    pub fn load<S: PuzzleStore + ?Sized>(
        id: PuzzleId,
        store: &S,
        min_gaps: usize,
        max_gaps: usize,
        anchor: HintAnchor,
    ) -> Result<Self> {
        Self::new(id, store.load(id)?, min_gaps, max_gaps, anchor)
    }

    pub fn id(&self) -> PuzzleId {
        self.id
    }

    pub fn anchor(&self) -> &HintAnchor {
        &self.anchor
    }

    pub fn gap_range(&self) -> (usize, usize) {
        (self.min_gaps, self.max_gaps)
    }

    /// Pins `coords` to `lit` in every attempt. It is still shown, and may still be hidden.
    pub fn force_cell(&mut self, coords: Coord2, lit: bool) -> Result<&mut Self> {
        let coords = self.layout.validate_coords(coords)?;
        self.forced.push((coords, lit));
        Ok(self)
    }

    /// One hint block per revealed cell, at the anchor origin offset by the cell coordinates.
    pub fn hint_blocks(&self, canvas: &Canvas) -> Vec<HintBlock> {
        let (origin_x, origin_y) = self.anchor.origin;
        canvas
            .iter_decided()
            .map(|(coords, lit)| HintBlock {
                coords,
                lit,
                position: (origin_x + f32::from(coords.0), origin_y + f32::from(coords.1)),
            })
            .collect()
    }

    /// Generates, saves the grid and its solution, and swaps the host's hint blocks for the
    /// revealed cells of the new puzzle.
    pub fn publish<S, H, R>(
        &self,
        store: &mut S,
        host: &mut H,
        rng: &mut R,
    ) -> Result<Generated<TutorialPuzzle>>
    where
        S: PuzzleStore + ?Sized,
        H: HintHost + ?Sized,
        R: Rng + ?Sized,
    {
        let generated = self.generate(rng);
        let puzzle = &generated.output;
        log::info!(
            "Tutorial {} generated after {} attempts with {} gaps",
            self.id,
            generated.attempts,
            puzzle.canvas.gaps().len()
        );

        store.save(self.id, &puzzle.grid)?;
        store.write_solution(self.id, &puzzle.grid)?;
        host.replace_hint_blocks(self.id, &self.anchor, self.hint_blocks(&puzzle.canvas))?;

        Ok(generated)
    }
}

impl PuzzleGenerator for TutorialGenerator {
    type Output = TutorialPuzzle;

    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Attempt<TutorialPuzzle> {
        let mut grid = Grid::new(self.layout.clone());
        for &(coords, lit) in &self.forced {
            grid.lock_tile_lit(coords, lit);
        }

        randomize_solution(&mut grid, rng);

        let mut canvas = Canvas::from_grid(&grid);
        redact_deducible_cells(&mut canvas, self.min_gaps, self.max_gaps, rng)?;

        Ok(TutorialPuzzle { grid, canvas })
    }
}

/// Hides random deducible cells of `canvas` until `max_gaps` are hidden, or, once `min_gaps`
/// are, on an even coin flip after each one. Returns the hidden cells in the order they went.
///
/// Gives up after `width * height * 2` draws in a row hide nothing, which only fails the
/// attempt if fewer than `min_gaps` cells are hidden by then.
pub fn redact_deducible_cells<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    min_gaps: usize,
    max_gaps: usize,
    rng: &mut R,
) -> Attempt<Vec<Coord2>> {
    if min_gaps == 0 {
        return Ok(Vec::new());
    }

    let (size_x, size_y) = canvas.size();
    let finish_threshold = usize::from(mult(size_x, size_y)) * 2;
    let mut gaps = Vec::new();
    let mut misses = 0;

    while gaps.len() < max_gaps {
        let x = rng.random_range(0..size_x);
        let y = rng.random_range(0..size_y);
        let state = canvas.cell((x, y));

        if state.is_decided() && is_deducible(state, canvas.neighbor_counts((x, y))) {
            canvas.redact((x, y));
            gaps.push((x, y));
            misses = 0;

            if gaps.len() >= max_gaps || (gaps.len() >= min_gaps && rng.random_bool(0.5)) {
                return Ok(gaps);
            }
            continue;
        }

        misses += 1;
        if misses >= finish_threshold {
            return if gaps.len() >= min_gaps {
                Ok(gaps)
            } else {
                Err(Infeasible::GapShortfall {
                    gaps: gaps.len(),
                    min_gaps,
                })
            };
        }
    }

    Ok(gaps)
}
