use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use rand::Rng;

use super::take_random;
use crate::*;

/// Places exactly the requested number of flowers for each petal count, on open cells whose
/// matching neighbor count equals that petal count.
pub fn place_fixed_flowers<R: Rng + ?Sized>(
    grid: &mut Grid,
    flowers: &BTreeMap<u8, usize>,
    rng: &mut R,
) -> Attempt<()> {
    let mut spots: BTreeMap<u8, Vec<Coord2>> =
        flowers.keys().map(|&petals| (petals, Vec::new())).collect();

    for coords in grid.open_tiles() {
        if let Some(bucket) = spots.get_mut(&matching_neighbor_count(grid, coords)) {
            bucket.push(coords);
        }
    }

    for (&petals, &wanted) in flowers {
        let bucket = spots.entry(petals).or_default();
        if bucket.len() < wanted {
            return Err(Infeasible::FlowerSpots {
                petals,
                wanted,
                available: bucket.len(),
            });
        }

        for _ in 0..wanted {
            let Some(coords) = take_random(bucket, rng) else {
                break;
            };
            grid.set_symbol(coords, Symbol::Flower(petals), Color::Black);
        }
    }

    Ok(())
}

/// Places `amount` flowers one by one on random open cells, each showing the matching neighbor
/// count of its cell at the moment it lands.
pub fn place_wildcard_flowers<R: Rng + ?Sized>(
    grid: &mut Grid,
    amount: usize,
    rng: &mut R,
) -> Attempt<()> {
    for placed in 0..amount {
        let open = grid.open_tiles();
        if open.is_empty() {
            return Err(Infeasible::NoOpenTiles {
                remaining: amount - placed,
            });
        }

        let coords = open[rng.random_range(0..open.len())];
        let petals = matching_neighbor_count(grid, coords);
        grid.set_symbol(coords, Symbol::Flower(petals), Color::Black);
    }

    Ok(())
}
