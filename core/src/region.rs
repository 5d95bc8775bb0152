use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::*;

/// Maximal set of enabled cells 4-connected to `seed` that share its solution value.
///
/// Cells come back in breadth-first order, starting with `seed`. Regions are recomputed on every
/// call since placement keeps changing the grid.
pub fn find_region(grid: &Grid, seed: Coord2) -> Vec<Coord2> {
    let state = grid.is_in_solution(seed);
    let layout = grid.layout();

    let mut region = Vec::new();
    let mut visited = BTreeSet::from([seed]);
    let mut to_visit = VecDeque::from([seed]);

    while let Some(visit_coords) = to_visit.pop_front() {
        region.push(visit_coords);

        to_visit.extend(
            layout
                .iter_enabled_neighbors(visit_coords)
                .filter(|&pos| grid.is_in_solution(pos) == state)
                .filter(|&pos| visited.insert(pos))
                .collect::<Vec<_>>(),
        );
    }

    region
}

/// Number of enabled orthogonal neighbors sharing the solution value of `coords`.
pub fn matching_neighbor_count(grid: &Grid, coords: Coord2) -> u8 {
    let state = grid.is_in_solution(coords);
    let count = grid
        .layout()
        .iter_enabled_neighbors(coords)
        .filter(|&pos| grid.is_in_solution(pos) == state)
        .count();
    // At most four neighbors.
    count as u8
}
