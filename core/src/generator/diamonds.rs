use alloc::vec::Vec;
use rand::Rng;

use super::take_random;
use crate::*;

/// Places `amount` diamonds painted `color` so that no region ends up with a lone one.
///
/// A region already holding one matching symbol gets a single diamond to complete the pair, a
/// region holding none gets a fresh pair at once, and a region holding two or more is left
/// alone. Every region sampled is dropped from the candidate pool, even when it is rejected.
pub fn place_diamonds<R: Rng + ?Sized>(
    grid: &mut Grid,
    color: Color,
    mut amount: usize,
    rng: &mut R,
) -> Attempt<()> {
    let mut pool = grid.open_tiles();

    while amount > 0 {
        if pool.is_empty() {
            return Err(Infeasible::DiamondPool {
                color,
                remaining: amount,
            });
        }

        let coords = pool[rng.random_range(0..pool.len())];
        let region = find_region(grid, coords);

        let mut region_open = Vec::new();
        for &pos in &region {
            if let Some(index) = pool.iter().position(|&candidate| candidate == pos) {
                pool.remove(index);
                region_open.push(pos);
            }
        }

        let matches = count_color(grid, &region, color);
        if matches >= 2 {
            continue;
        }
        if region_open.len() + matches < 2 {
            continue;
        }
        if matches == 0 && amount == 1 {
            continue;
        }

        grid.set_symbol(coords, Symbol::Diamond, color);
        amount -= 1;

        if matches == 0 {
            region_open.retain(|&pos| pos != coords);
            let Some(partner) = take_random(&mut region_open, rng) else {
                return Err(Infeasible::DiamondPartner { color });
            };
            grid.set_symbol(partner, Symbol::Diamond, color);
            amount -= 1;
        }
    }

    Ok(())
}

/// Number of cells in `tiles` whose symbol counts as `color`.
pub fn count_color(grid: &Grid, tiles: &[Coord2], color: Color) -> usize {
    tiles
        .iter()
        .filter(|&&coords| {
            let cell = grid.cell(coords);
            color.matches(cell.symbol, cell.color)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn uniform_grid(size: Coord2, lit: bool) -> Grid {
        let mut grid = Grid::new(Layout::new(size));
        for coords in iter_coords(size) {
            grid.set_solution(coords, lit);
        }
        grid
    }

    #[test]
    fn fresh_region_gets_a_pair() {
        let mut grid = uniform_grid((3, 3), true);
        let mut rng = StdRng::seed_from_u64(0);

        place_diamonds(&mut grid, Color::Teal, 2, &mut rng).unwrap();

        assert_eq!(grid.find_symbols(Symbol::Diamond, Color::Teal).len(), 2);
    }

    #[test]
    fn single_diamond_needs_an_existing_partner() {
        let mut grid = uniform_grid((3, 3), true);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            place_diamonds(&mut grid, Color::White, 1, &mut rng),
            Err(Infeasible::DiamondPool {
                color: Color::White,
                remaining: 1,
            })
        );

        let mut grid = uniform_grid((3, 3), true);
        grid.set_symbol((1, 1), Symbol::Diamond, Color::White);

        place_diamonds(&mut grid, Color::White, 1, &mut rng).unwrap();

        assert_eq!(grid.find_symbols(Symbol::Diamond, Color::White).len(), 2);
    }

    /// Left half lit, right half unlit: two regions of four cells each.
    fn split_grid() -> Grid {
        let mut grid = uniform_grid((4, 2), false);
        for coords in iter_coords((2, 2)) {
            grid.set_solution(coords, true);
        }
        grid
    }

    #[test]
    fn odd_amount_needs_a_lone_matching_symbol() {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = split_grid();

            assert_eq!(
                place_diamonds(&mut grid, Color::Black, 3, &mut rng),
                Err(Infeasible::DiamondPool {
                    color: Color::Black,
                    remaining: 1,
                })
            );

            let mut grid = split_grid();
            grid.set_symbol((0, 0), Symbol::Diamond, Color::Black);

            place_diamonds(&mut grid, Color::Black, 3, &mut rng).unwrap();

            assert_eq!(grid.find_symbols(Symbol::Diamond, Color::Black).len(), 4);
        }
    }

    #[test]
    fn saturated_region_is_skipped() {
        let mut grid = uniform_grid((3, 1), false);
        grid.set_symbol((0, 0), Symbol::Diamond, Color::Black);
        grid.set_symbol((2, 0), Symbol::Diamond, Color::Black);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(place_diamonds(&mut grid, Color::Black, 2, &mut rng).is_err());
        assert_eq!(grid.symbol((1, 0)), Symbol::None);
    }

    #[test]
    fn flowers_count_toward_gold_pairs() {
        let mut grid = uniform_grid((2, 1), true);
        grid.set_symbol((0, 0), Symbol::Flower(1), Color::Black);
        let mut rng = StdRng::seed_from_u64(5);

        place_diamonds(&mut grid, Color::Gold, 1, &mut rng).unwrap();

        assert_eq!(grid.symbol((1, 0)), Symbol::Diamond);
        assert_eq!(grid.color((1, 0)), Color::Gold);
    }

    #[test]
    fn pairs_stay_within_one_region() {
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..50 {
            let mut grid = Grid::new(Layout::new((5, 5)));
            randomize_solution(&mut grid, &mut rng);
            if place_diamonds(&mut grid, Color::White, 4, &mut rng).is_err() {
                continue;
            }

            let diamonds = grid.find_symbols(Symbol::Diamond, Color::White);
            assert_eq!(diamonds.len(), 4);
            for &coords in &diamonds {
                let region = find_region(&grid, coords);
                assert!(count_color(&grid, &region, Color::White) >= 2);
            }
        }
    }
}
