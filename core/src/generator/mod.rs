use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;
pub use diamonds::*;
pub use flowers::*;
pub use solution::*;

mod diamonds;
mod flowers;
mod solution;

/// Something that can produce a puzzle in independent, all-or-nothing attempts.
pub trait PuzzleGenerator {
    type Output;

    /// One from-scratch pass. Nothing from a failed attempt is carried into the next one.
    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Attempt<Self::Output>;

    /// Retries [`Self::attempt`] until it succeeds.
    ///
    /// There is no cap on the number of attempts: a configuration that can never be satisfied
    /// keeps the caller busy forever.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Generated<Self::Output> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(rng) {
                Ok(output) => return Generated { output, attempts },
                Err(reason) => log::debug!("Attempt {attempts} discarded: {reason}"),
            }
        }
    }
}

/// Successful generation together with the number of attempts it took.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Generated<T> {
    pub output: T,
    pub attempts: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRequest {
    pub kind: SymbolKind,
    pub color: Color,
    pub amount: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreLock {
    pub coords: Coord2,
    /// `None` freezes whatever value the random solution gives the cell.
    pub lit: Option<bool>,
}

/// Generator of one regular panel, configured through its setters before [`PuzzleGenerator::generate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    id: PuzzleId,
    layout: Layout,
    symbols: Vec<SymbolRequest>,
    flowers: BTreeMap<u8, usize>,
    wildcard_flowers: usize,
    locks: usize,
    pre_locks: Vec<PreLock>,
}

impl Generator {
    pub fn new(id: PuzzleId, layout: Layout) -> Self {
        Self {
            id,
            layout,
            symbols: Vec::new(),
            flowers: BTreeMap::new(),
            wildcard_flowers: 0,
            locks: 0,
            pre_locks: Vec::new(),
        }
    }

    /// Generator for the puzzle stored under `id`, shaped by its stored layout.
    pub fn load<S: PuzzleStore + ?Sized>(id: PuzzleId, store: &S) -> Result<Self> {
        Ok(Self::new(id, store.load(id)?))
    }

    pub fn id(&self) -> PuzzleId {
        self.id
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Requests `amount` symbols of `kind` painted `color`. Requests are served in the order
    /// they are added. Only diamonds are placed so far, dice and bars are accepted and ignored.
    pub fn add(&mut self, kind: SymbolKind, color: Color, amount: usize) -> &mut Self {
        self.symbols.push(SymbolRequest {
            kind,
            color,
            amount,
        });
        self
    }

    /// Requests exactly `amount` flowers with `petals` petals, replacing an earlier request for
    /// the same petal count.
    pub fn set_flowers(&mut self, petals: u8, amount: usize) -> Result<&mut Self> {
        if petals > MAX_PETALS {
            return Err(PuzzleError::PetalCountOutOfRange(petals));
        }
        self.flowers.insert(petals, amount);
        Ok(self)
    }

    /// Requests `amount` flowers whose petal count is read off the cell they land on.
    pub fn set_wildcard_flowers(&mut self, amount: usize) -> &mut Self {
        self.wildcard_flowers = amount;
        self
    }

    /// Number of extra cells locked after placement, on top of [`Self::lock_tile`].
    pub fn set_locks(&mut self, count: usize) -> &mut Self {
        self.locks = count;
        self
    }

    /// Locks `coords` in every attempt, lit or unlit as given, or at its random value for `None`.
    pub fn lock_tile(&mut self, coords: Coord2, lit: Option<bool>) -> Result<&mut Self> {
        let coords = self.layout.validate_coords(coords)?;
        self.pre_locks.push(PreLock { coords, lit });
        Ok(self)
    }

    /// Accepted for compatibility with hand-made panels, but forced symbols are not applied.
    pub fn force_tile(&mut self, coords: Coord2, symbol: Symbol, color: Color) -> Result<&mut Self> {
        let coords = self.layout.validate_coords(coords)?;
        log::debug!(
            "Puzzle {}: ignoring forced {symbol:?} ({color:?}) at {coords:?}",
            self.id
        );
        Ok(self)
    }

    pub fn symbol_requests(&self) -> &[SymbolRequest] {
        &self.symbols
    }

    pub fn flower_requests(&self) -> &BTreeMap<u8, usize> {
        &self.flowers
    }

    pub fn wildcard_flowers(&self) -> usize {
        self.wildcard_flowers
    }

    pub fn locks(&self) -> usize {
        self.locks
    }

    pub fn pre_locks(&self) -> &[PreLock] {
        &self.pre_locks
    }

    /// Generates and hands the result to `store`.
    pub fn generate_into<S, R>(&self, store: &mut S, rng: &mut R) -> Result<Generated<Grid>>
    where
        S: PuzzleStore + ?Sized,
        R: Rng + ?Sized,
    {
        let generated = self.generate(rng);
        log::info!(
            "Puzzle {} generated after {} attempts",
            self.id,
            generated.attempts
        );
        store.save(self.id, &generated.output)?;
        Ok(generated)
    }
}

impl PuzzleGenerator for Generator {
    type Output = Grid;

    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Attempt<Grid> {
        let mut grid = Grid::new(self.layout.clone());

        for lock in &self.pre_locks {
            if let Some(lit) = lock.lit {
                grid.lock_tile_lit(lock.coords, lit);
            }
        }

        randomize_solution(&mut grid, rng);

        for lock in self.pre_locks.iter().filter(|lock| lock.lit.is_none()) {
            grid.lock_tile(lock.coords);
        }

        if !self.flowers.is_empty() {
            place_fixed_flowers(&mut grid, &self.flowers, rng)?;
        }

        if self.wildcard_flowers > 0 {
            place_wildcard_flowers(&mut grid, self.wildcard_flowers, rng)?;
        }

        for request in &self.symbols {
            match request.kind {
                SymbolKind::Diamond => place_diamonds(&mut grid, request.color, request.amount, rng)?,
                SymbolKind::Dice | SymbolKind::Bar => {
                    log::trace!("Puzzle {}: no placer for {:?}, skipped", self.id, request.kind)
                }
            }
        }

        if self.locks > 0 {
            lock_random_tiles(&mut grid, self.locks, rng);
        }

        Ok(grid)
    }
}

/// Locks up to `count` open, unlocked cells picked without replacement.
///
/// Locks fewer cells, without failing, when the candidates run out first.
pub fn lock_random_tiles<R: Rng + ?Sized>(grid: &mut Grid, count: usize, rng: &mut R) -> usize {
    let mut candidates: Vec<Coord2> = grid
        .open_tiles()
        .into_iter()
        .filter(|&coords| !grid.is_locked(coords))
        .collect();

    let mut locked = 0;
    while locked < count {
        let Some(coords) = take_random(&mut candidates, rng) else {
            log::debug!("Only {locked} of {count} extra locks fit");
            break;
        };
        grid.lock_tile(coords);
        locked += 1;
    }
    locked
}

/// Removes and returns a uniformly drawn element.
pub(crate) fn take_random<T, R: Rng + ?Sized>(items: &mut Vec<T>, rng: &mut R) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.random_range(0..items.len());
    Some(items.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn generator(size: Coord2, disabled: &[Coord2]) -> Generator {
        Generator::new(0, Layout::from_disabled_coords(size, disabled).unwrap())
    }

    #[test]
    fn petal_count_is_validated_on_set() {
        let mut generator = generator((3, 3), &[]);

        assert_eq!(
            generator.set_flowers(5, 1).err(),
            Some(PuzzleError::PetalCountOutOfRange(5))
        );
        assert!(generator.flower_requests().is_empty());

        generator.set_flowers(2, 1).unwrap();
        generator.set_flowers(2, 3).unwrap();
        assert_eq!(generator.flower_requests().get(&2), Some(&3));
    }

    #[test]
    fn pre_lock_coords_are_validated() {
        let mut generator = generator((3, 3), &[]);

        assert_eq!(
            generator.lock_tile((3, 0), Some(true)).err(),
            Some(PuzzleError::InvalidCoords)
        );
        assert_eq!(
            generator.force_tile((0, 9), Symbol::Diamond, Color::Black).err(),
            Some(PuzzleError::InvalidCoords)
        );
    }

    #[test]
    fn pre_locks_are_authoritative() {
        let mut generator = generator((4, 4), &[]);
        generator.lock_tile((1, 1), Some(true)).unwrap();
        generator.lock_tile((2, 2), Some(false)).unwrap();
        generator.lock_tile((3, 3), None).unwrap();
        assert_eq!(generator.pre_locks().len(), 3);
        assert_eq!(
            generator.pre_locks()[2],
            PreLock {
                coords: (3, 3),
                lit: None,
            }
        );
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let grid = generator.attempt(&mut rng).unwrap();
            assert!(grid.is_locked((1, 1)) && grid.is_in_solution((1, 1)));
            assert!(grid.is_locked((2, 2)) && !grid.is_in_solution((2, 2)));
            assert!(grid.is_locked((3, 3)));
            assert_eq!(grid.locked_count(), 3);
        }
    }

    #[test]
    fn dice_and_bars_are_inert() {
        let mut generator = generator((3, 3), &[]);
        generator.add(SymbolKind::Dice, Color::Black, 2);
        generator.add(SymbolKind::Bar, Color::Black, 3);
        let mut rng = StdRng::seed_from_u64(3);

        let grid = generator.attempt(&mut rng).unwrap();

        assert_eq!(grid.open_tiles().len(), 9);
    }

    #[test]
    fn extra_locks_stop_when_pool_runs_out() {
        let mut grid = Grid::new(Layout::from_disabled_coords((2, 2), &[(0, 0)]).unwrap());
        grid.set_symbol((1, 0), Symbol::Diamond, Color::White);
        let mut rng = StdRng::seed_from_u64(11);

        let locked = lock_random_tiles(&mut grid, 5, &mut rng);

        assert_eq!(locked, 2);
        assert!(grid.is_locked((0, 1)) && grid.is_locked((1, 1)));
        assert!(!grid.is_locked((1, 0)));
    }

    #[test]
    fn extra_locks_skip_pre_locked_cells() {
        let mut generator = generator((3, 1), &[]);
        generator.lock_tile((0, 0), Some(true)).unwrap();
        generator.set_locks(1);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..10 {
            let grid = generator.attempt(&mut rng).unwrap();
            assert_eq!(grid.locked_count(), 2);
        }
    }

    #[test]
    fn generate_counts_attempts() {
        let mut generator = generator((2, 2), &[]);
        generator.add(SymbolKind::Diamond, Color::White, 2);
        let mut rng = StdRng::seed_from_u64(1);

        let generated = generator.generate(&mut rng);

        assert!(generated.attempts >= 1);
        assert_eq!(
            generated.output.find_symbols(Symbol::Diamond, Color::White).len(),
            2
        );
    }
}
