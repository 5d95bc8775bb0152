use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

pub const GRAVEYARD_METAPUZZLE_ID: PuzzleId = 109;

/// Bits per gravestone row.
pub const ROW_BITS: usize = 8;

/// Gravestone rows. The last two read the same both ways.
pub const ROWS: usize = 5;

/// Host ids of the gravestones, one per bit, row by row.
pub const GRAVESTONE_IDS: [[u8; ROW_BITS]; ROWS] = [
    [40, 39, 35, 38, 36, 33, 37, 34],
    [30, 29, 28, 27, 26, 25, 24, 23],
    [16, 31, 18, 32, 19, 20, 21, 22],
    [46, 42, 41, 45, 43, 47, 48, 57],
    [54, 52, 50, 53, 51, 55, 49, 56],
];

/// Host-geometry collaborator that swaps the sprite of a gravestone.
pub trait GravestoneHost {
    /// Shows gravestone `grave` as a one or as a zero.
    fn set_gravestone(&mut self, grave: u8, one: bool) -> Result<()>;
}

/// Binary strings spelled by the graveyard gravestones. The metapuzzle solution is the parity of
/// each column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravestoneRows {
    rows: [[bool; ROW_BITS]; ROWS],
}

impl GravestoneRows {
    pub fn new(rows: [[bool; ROW_BITS]; ROWS]) -> Self {
        Self { rows }
    }

    /// Three free rows followed by two palindromic ones.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut rows = [[false; ROW_BITS]; ROWS];
        for row in &mut rows[..3] {
            for bit in row.iter_mut() {
                *bit = rng.random_bool(0.5);
            }
        }
        for row in &mut rows[3..] {
            for j in 0..ROW_BITS / 2 {
                let bit = rng.random_bool(0.5);
                row[j] = bit;
                row[ROW_BITS - 1 - j] = bit;
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[[bool; ROW_BITS]; ROWS] {
        &self.rows
    }

    /// Whether each column holds an odd number of ones.
    pub fn column_parity(&self) -> [bool; ROW_BITS] {
        core::array::from_fn(|j| self.rows.iter().filter(|row| row[j]).count() % 2 == 1)
    }

    /// Writes the column parity into row 0 of `grid`, column by column.
    pub fn write_solution(&self, grid: &mut Grid) -> Result<()> {
        for (x, lit) in self.column_parity().into_iter().enumerate() {
            let coords = grid.layout().validate_coords((x as Coord, 0))?;
            grid.set_solution(coords, lit);
        }
        Ok(())
    }
}

/// Draws new gravestone rows, saves the metapuzzle with their column parity as its solution and
/// shows the rows on the gravestones.
pub fn publish_graveyard_metapuzzle<S, H, R>(
    store: &mut S,
    host: &mut H,
    rng: &mut R,
) -> Result<GravestoneRows>
where
    S: PuzzleStore + ?Sized,
    H: GravestoneHost + ?Sized,
    R: Rng + ?Sized,
{
    let rows = GravestoneRows::random(rng);

    let mut grid = Grid::new(store.load(GRAVEYARD_METAPUZZLE_ID)?);
    rows.write_solution(&mut grid)?;
    store.save(GRAVEYARD_METAPUZZLE_ID, &grid)?;
    store.write_solution(GRAVEYARD_METAPUZZLE_ID, &grid)?;

    for (ids, bits) in GRAVESTONE_IDS.iter().zip(rows.rows()) {
        for (&grave, &one) in ids.iter().zip(bits) {
            host.set_gravestone(grave, one)?;
        }
    }
    log::info!("Puzzle {GRAVEYARD_METAPUZZLE_ID}: gravestones rewritten");

    Ok(rows)
}
