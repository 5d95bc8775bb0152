use rand::Rng;

use crate::*;

/// Gives every cell that is neither disabled nor locked a fair coin flip, lighting it on heads.
///
/// Cells are visited rows first and expected to start unlit, so tails leaves them alone.
pub fn randomize_solution<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for coords in iter_coords(grid.size()) {
        if grid.is_disabled(coords) || grid.is_locked(coords) {
            continue;
        }

        if rng.random_bool(0.5) {
            grid.set_solution(coords, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn disabled_and_locked_cells_are_not_flipped() {
        let layout = Layout::from_disabled_coords((8, 8), &[(0, 0)]).unwrap();
        let mut grid = Grid::new(layout);
        grid.lock_tile_lit((1, 0), false);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..32 {
            randomize_solution(&mut grid, &mut rng);
            assert!(!grid.is_in_solution((0, 0)));
            assert!(!grid.is_in_solution((1, 0)));
        }
    }

    #[test]
    fn same_seed_same_solution() {
        let layout = Layout::new((6, 6));
        let mut first = Grid::new(layout.clone());
        let mut second = Grid::new(layout);

        randomize_solution(&mut first, &mut StdRng::seed_from_u64(9));
        randomize_solution(&mut second, &mut StdRng::seed_from_u64(9));

        assert_eq!(first.solution_mask(), second.solution_mask());
        assert!(first.solution_mask().iter().any(|&lit| lit));
    }
}
