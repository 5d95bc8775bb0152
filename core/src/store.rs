use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Persistence collaborator holding puzzles by id.
pub trait PuzzleStore {
    /// Static layout of the puzzle stored under `id`.
    fn load(&self, id: PuzzleId) -> Result<Layout>;

    /// Stores the solution, locks and symbols of `grid` under `id`.
    fn save(&mut self, id: PuzzleId, grid: &Grid) -> Result<()>;

    /// Stores only the solution bitmap of `grid` under `id`.
    fn write_solution(&mut self, id: PuzzleId, grid: &Grid) -> Result<()>;
}

/// Physical block standing for one revealed tutorial cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintBlock {
    pub coords: Coord2,
    pub lit: bool,
    pub position: (f32, f32),
}

/// Host-geometry collaborator that owns the hint blocks shown next to tutorial puzzles.
pub trait HintHost {
    /// Drops the blocks already shown at `anchor` and shows `blocks` instead.
    fn replace_hint_blocks(
        &mut self,
        id: PuzzleId,
        anchor: &HintAnchor,
        blocks: Vec<HintBlock>,
    ) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredPuzzle {
    pub layout: Layout,
    pub cells: Option<Array2<Cell>>,
    pub solution: Option<Array2<bool>>,
}

/// In-memory [`PuzzleStore`], serializable as a whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    puzzles: BTreeMap<PuzzleId, StoredPuzzle>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `layout` under `id`, dropping anything saved for it before.
    pub fn insert_layout(&mut self, id: PuzzleId, layout: Layout) {
        self.puzzles.insert(
            id,
            StoredPuzzle {
                layout,
                cells: None,
                solution: None,
            },
        );
    }

    pub fn contains(&self, id: PuzzleId) -> bool {
        self.puzzles.contains_key(&id)
    }

    pub fn get(&self, id: PuzzleId) -> Option<&StoredPuzzle> {
        self.puzzles.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PuzzleId> + '_ {
        self.puzzles.keys().copied()
    }

    /// Grid last saved under `id`, or a blank one if nothing was saved yet.
    pub fn restore(&self, id: PuzzleId) -> Result<Grid> {
        let stored = self.stored(id)?;
        match &stored.cells {
            Some(cells) => Grid::from_parts(stored.layout.clone(), cells.clone()),
            None => Ok(Grid::new(stored.layout.clone())),
        }
    }

    fn stored(&self, id: PuzzleId) -> Result<&StoredPuzzle> {
        self.puzzles.get(&id).ok_or(PuzzleError::UnknownPuzzle(id))
    }

    fn stored_mut(&mut self, id: PuzzleId, grid: &Grid) -> Result<&mut StoredPuzzle> {
        let stored = self
            .puzzles
            .get_mut(&id)
            .ok_or(PuzzleError::UnknownPuzzle(id))?;
        if stored.layout != *grid.layout() {
            return Err(PuzzleError::InvalidLayoutShape);
        }
        Ok(stored)
    }
}

impl PuzzleStore for MemoryStore {
    fn load(&self, id: PuzzleId) -> Result<Layout> {
        Ok(self.stored(id)?.layout.clone())
    }

    fn save(&mut self, id: PuzzleId, grid: &Grid) -> Result<()> {
        let stored = self.stored_mut(id, grid)?;
        stored.cells = Some(grid.cells().clone());
        Ok(())
    }

    fn write_solution(&mut self, id: PuzzleId, grid: &Grid) -> Result<()> {
        let stored = self.stored_mut(id, grid)?;
        stored.solution = Some(grid.solution_mask());
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintPlacement {
    pub anchor: HintAnchor,
    pub blocks: Vec<HintBlock>,
}

/// [`HintHost`] and [`GravestoneHost`] that only remembers the latest state it was given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingHost {
    placements: BTreeMap<PuzzleId, HintPlacement>,
    gravestones: BTreeMap<u8, bool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placement(&self, id: PuzzleId) -> Option<&HintPlacement> {
        self.placements.get(&id)
    }

    pub fn gravestone(&self, grave: u8) -> Option<bool> {
        self.gravestones.get(&grave).copied()
    }
}

impl GravestoneHost for RecordingHost {
    fn set_gravestone(&mut self, grave: u8, one: bool) -> Result<()> {
        self.gravestones.insert(grave, one);
        Ok(())
    }
}

impl HintHost for RecordingHost {
    fn replace_hint_blocks(
        &mut self,
        id: PuzzleId,
        anchor: &HintAnchor,
        blocks: Vec<HintBlock>,
    ) -> Result<()> {
        self.placements.insert(
            id,
            HintPlacement {
                anchor: anchor.clone(),
                blocks,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(id: PuzzleId, layout: Layout) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_layout(id, layout);
        store
    }

    #[test]
    fn clear_load_save_load_keeps_layout() {
        let layout = Layout::from_disabled_coords((4, 3), &[(0, 0), (3, 2)]).unwrap();
        let mut store = store_with(12, layout.clone());

        let mut grid = Grid::new(store.load(12).unwrap());
        grid.set_symbol((1, 1), Symbol::Diamond, Color::Gold);
        grid.clear();
        store.save(12, &grid).unwrap();
        let reloaded = store.load(12).unwrap();

        assert_eq!(reloaded, layout);
        let restored = store.restore(12).unwrap();
        assert!(iter_coords(restored.size()).all(|coords| restored.symbol(coords).is_none()));
        assert!(restored.is_disabled((3, 2)));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut store = MemoryStore::new();
        let grid = Grid::new(Layout::new((1, 1)));

        assert!(!store.contains(3));
        assert_eq!(store.load(3), Err(PuzzleError::UnknownPuzzle(3)));
        assert_eq!(store.save(3, &grid), Err(PuzzleError::UnknownPuzzle(3)));
        assert_eq!(store.restore(3), Err(PuzzleError::UnknownPuzzle(3)));
    }

    #[test]
    fn save_rejects_foreign_layout() {
        let mut store = store_with(1, Layout::new((2, 2)));
        let grid = Grid::new(Layout::new((3, 3)));

        assert_eq!(store.save(1, &grid), Err(PuzzleError::InvalidLayoutShape));
    }

    #[test]
    fn solution_is_written_separately() {
        let mut store = store_with(5, Layout::new((2, 1)));
        let mut grid = Grid::new(store.load(5).unwrap());
        grid.set_solution((1, 0), true);

        store.write_solution(5, &grid).unwrap();

        let stored = store.get(5).unwrap();
        assert!(stored.cells.is_none());
        assert_eq!(
            stored.solution.as_ref().unwrap().iter().copied().collect::<Vec<_>>(),
            [false, true]
        );
    }

    #[test]
    fn store_with_bad_layout_fails_to_parse() {
        let json = r#"{"puzzles":{"5":{"layout":{"disabled":{"v":1,"dim":[0,3],"data":[]}},"cells":null,"solution":null}}}"#;

        assert!(serde_json::from_str::<MemoryStore>(json).is_err());
    }

    #[test]
    fn store_round_trips_through_json() {
        let mut store = store_with(9, Layout::from_disabled_coords((2, 2), &[(1, 0)]).unwrap());
        let mut grid = Grid::new(store.load(9).unwrap());
        grid.set_symbol((0, 1), Symbol::Flower(3), Color::Black);
        store.save(9, &grid).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let parsed: MemoryStore = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, store);
        assert!(parsed.contains(9));
        assert_eq!(parsed.ids().collect::<Vec<_>>(), [9]);
        assert_eq!(parsed.restore(9).unwrap(), grid);
    }
}
