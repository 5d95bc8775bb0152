//! Recipes for every puzzle generated in one randomizer session.
//!
//! Each recipe names a puzzle id whose layout is expected in the [`PuzzleStore`]. [`run`] walks
//! them in session order: regular panels first, then the tutorial islands, then the four
//! chained tutorials at the end of the starting area, and last the graveyard metapuzzle.

use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::*;
use crate::Color::*;
use crate::SymbolKind::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PanelRecipe {
    pub id: PuzzleId,
    pub symbols: &'static [(SymbolKind, Color, usize)],
    pub flowers: &'static [(u8, usize)],
    pub wildcard_flowers: usize,
    pub locks: usize,
    /// Known to need very many attempts, or to never finish. Odd diamond amounts in a color no
    /// flower can stand in for never finish: diamonds without a partner come in pairs.
    pub unreliable: bool,
}

impl PanelRecipe {
    const fn diamonds(
        id: PuzzleId,
        symbols: &'static [(SymbolKind, Color, usize)],
        locks: usize,
    ) -> Self {
        Self {
            id,
            symbols,
            flowers: &[],
            wildcard_flowers: 0,
            locks,
            unreliable: false,
        }
    }

    pub fn generator(&self, layout: Layout) -> Result<Generator> {
        let mut generator = Generator::new(self.id, layout);
        for &(kind, color, amount) in self.symbols {
            generator.add(kind, color, amount);
        }
        for &(petals, amount) in self.flowers {
            generator.set_flowers(petals, amount)?;
        }
        generator
            .set_wildcard_flowers(self.wildcard_flowers)
            .set_locks(self.locks);
        Ok(generator)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TutorialRecipe {
    pub id: PuzzleId,
    pub min_gaps: usize,
    pub max_gaps: usize,
    pub path: &'static str,
    pub origin: (f32, f32),
    /// Pins one cell of column 0, among its first `n` rows, to unlit. The row is drawn per session.
    pub unlit_first_column: Option<Coord>,
}

impl TutorialRecipe {
    const fn new(
        id: PuzzleId,
        (min_gaps, max_gaps): (usize, usize),
        path: &'static str,
        origin: (f32, f32),
    ) -> Self {
        Self {
            id,
            min_gaps,
            max_gaps,
            path,
            origin,
            unlit_first_column: None,
        }
    }

    fn anchor(&self) -> HintAnchor {
        HintAnchor {
            path: self.path.into(),
            origin: self.origin,
        }
    }

    pub fn generator<R: Rng + ?Sized>(
        &self,
        layout: Layout,
        rng: &mut R,
    ) -> Result<TutorialGenerator> {
        let mut generator =
            TutorialGenerator::new(self.id, layout, self.min_gaps, self.max_gaps, self.anchor())?;
        if let Some(rows) = self.unlit_first_column {
            let y = rng.random_range(0..rows.max(1));
            generator.force_cell((0, y), false)?;
        }
        Ok(generator)
    }
}

pub const PANELS: &[PanelRecipe] = &[
    PanelRecipe {
        wildcard_flowers: 4,
        ..PanelRecipe::diamonds(3000, &[(Diamond, White, 4)], 0)
    },
    PanelRecipe {
        flowers: &[(2, 1), (4, 1), (0, 1)],
        wildcard_flowers: 1,
        unreliable: true,
        ..PanelRecipe::diamonds(
            97,
            &[(Diamond, Black, 3), (Diamond, White, 4), (Dice, Black, 2)],
            6,
        )
    },
    PanelRecipe::diamonds(26, &[(Diamond, Teal, 2)], 0),
    PanelRecipe::diamonds(255, &[(Diamond, Teal, 2)], 3),
    PanelRecipe::diamonds(107, &[(Diamond, Teal, 4)], 2),
    PanelRecipe::diamonds(81, &[(Diamond, Teal, 4)], 2),
    PanelRecipe::diamonds(59, &[(Diamond, Gold, 6)], 2),
    PanelRecipe::diamonds(62, &[(Diamond, Gold, 6)], 0),
    PanelRecipe::diamonds(253, &[(Diamond, Gold, 6)], 3),
    PanelRecipe::diamonds(347, &[(Diamond, Gold, 8)], 0),
    PanelRecipe::diamonds(
        110,
        &[(Diamond, Black, 10), (Diamond, White, 4), (Diamond, Gold, 2)],
        7,
    ),
    PanelRecipe {
        wildcard_flowers: 1,
        unreliable: true,
        ..PanelRecipe::diamonds(
            468,
            &[(Bar, Black, 3), (Diamond, Black, 3), (Diamond, White, 2)],
            4,
        )
    },
    PanelRecipe {
        unreliable: true,
        ..PanelRecipe::diamonds(19, &[(Diamond, Gold, 16)], 4)
    },
    PanelRecipe {
        unreliable: true,
        ..PanelRecipe::diamonds(128, &[(Diamond, Gold, 16)], 4)
    },
    PanelRecipe {
        wildcard_flowers: 2,
        ..PanelRecipe::diamonds(61, &[(Diamond, White, 4)], 0)
    },
];

pub const TUTORIALS: &[TutorialRecipe] = &[
    TutorialRecipe {
        unlit_first_column: Some(2),
        ..TutorialRecipe::new(
            408,
            (0, 0),
            "2ndIsland/GraphicsRoot/StartingArea_HintPillarBase",
            (-0.5, 1.0),
        )
    },
    TutorialRecipe::new(
        415,
        (1, 1),
        "3rdIsland/GraphicsRoot/StartingArea_HintPillarBase (1)",
        (-0.5, 1.0),
    ),
    TutorialRecipe::new(
        419,
        (2, 3),
        "4thIsland/NewGraphicsRoot/StartingArea_HintPillarBase (2)",
        (-0.5, 1.0),
    ),
    TutorialRecipe::new(
        428,
        (3, 4),
        "5thIsland/NewGraphicsRoot/StartingArea_HintPillarBase (3)",
        (-0.5, 1.0),
    ),
    TutorialRecipe::new(
        380,
        (4, 5),
        "Mainland/GraphicsRoot/StartingArea_HintPillarBase (4)",
        (-1.5, 1.0),
    ),
    TutorialRecipe::new(
        381,
        (5, 6),
        "Mainland/GraphicsRoot/StartingArea_HintPillarBase (11)",
        (-1.5, 1.0),
    ),
    TutorialRecipe::new(
        397,
        (8, 9),
        "Mainland/GraphicsRoot/StartingArea_HintPillarBase (7)",
        (-1.0, 1.0),
    ),
];

pub const FINAL_TUTORIAL_IDS: [PuzzleId; 4] = [163, 436, 442, 449];

pub const FINAL_TUTORIAL_PATHS: [&str; 4] = [
    "StartingArea_AboveLowerWorldPath_FadeGroup/StartingArea_HintPillarBase (9)",
    "StartingArea_AboveLowerWorldPath_FadeGroup/StartingArea_HintPillarBase (7)",
    "StartingArea_AboveLowerWorldPath_FadeGroup/StartingArea_HintPillarBase (8)",
    "StartingArea_AboveLowerWorldPath_FadeGroup/StartingArea_HintPillarBase (10)",
];

/// The four closing tutorials, chained in a random order.
///
/// Four distinct cells of the top-left 3x3 corner are picked, one per tutorial. Each tutorial pins
/// its own cell to a random value and the next tutorial's cell to the opposite of that one's
/// value, wrapping around, so each pinned cell shows up with both values across the set.
pub fn final_tutorials<S, R>(store: &S, rng: &mut R) -> Result<Vec<TutorialGenerator>>
where
    S: PuzzleStore + ?Sized,
    R: Rng + ?Sized,
{
    let mut ids = FINAL_TUTORIAL_IDS;
    ids.shuffle(rng);

    let mut corner: Vec<Coord2> = iter_coords((3, 3)).collect();
    corner.shuffle(rng);
    let cells = [corner[0], corner[1], corner[2], corner[3]];
    let values: [bool; 4] = core::array::from_fn(|_| rng.random_bool(0.5));

    let mut generators = Vec::new();
    for (id, path) in ids.into_iter().zip(FINAL_TUTORIAL_PATHS) {
        let anchor = HintAnchor {
            path: path.into(),
            origin: (-1.0, 1.0),
        };
        generators.push(TutorialGenerator::new(id, store.load(id)?, 3, 5, anchor)?);
    }
    generators.shuffle(rng);

    for (index, generator) in generators.iter_mut().enumerate() {
        let next = (index + 1) % cells.len();
        generator
            .force_cell(cells[index], values[index])?
            .force_cell(cells[next], !values[next])?;
    }

    Ok(generators)
}

/// Outcome of [`run`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    pub generated: Vec<PuzzleId>,
    pub skipped: Vec<PuzzleId>,
    pub attempts: u64,
}

/// Generates every recipe whose layout is in `store`, saving the results and publishing the
/// tutorial hint blocks and gravestones to `host`. Unknown ids are skipped with a warning.
pub fn run<S, H, R>(
    store: &mut S,
    host: &mut H,
    rng: &mut R,
    skip_unreliable: bool,
) -> Result<CatalogReport>
where
    S: PuzzleStore + ?Sized,
    H: HintHost + GravestoneHost + ?Sized,
    R: Rng + ?Sized,
{
    let mut report = CatalogReport::default();

    for recipe in PANELS {
        if recipe.unreliable && skip_unreliable {
            log::info!("Puzzle {}: unreliable recipe skipped", recipe.id);
            report.skipped.push(recipe.id);
            continue;
        }
        let Some(layout) = load_or_skip(&*store, recipe.id, &mut report)? else {
            continue;
        };
        if recipe.unreliable {
            log::warn!("Puzzle {}: recipe may never finish on this layout", recipe.id);
        }

        let generated = recipe.generator(layout)?.generate_into(store, rng)?;
        report.generated.push(recipe.id);
        report.attempts += generated.attempts;
    }

    for recipe in TUTORIALS {
        let Some(layout) = load_or_skip(&*store, recipe.id, &mut report)? else {
            continue;
        };

        let generated = recipe.generator(layout, rng)?.publish(store, host, rng)?;
        report.generated.push(recipe.id);
        report.attempts += generated.attempts;
    }

    if let Some(&missing) = FINAL_TUTORIAL_IDS.iter().find(|&&id| !is_known(&*store, id)) {
        log::warn!("Puzzle {missing}: no layout stored, final tutorials skipped");
        report.skipped.extend(FINAL_TUTORIAL_IDS);
    } else {
        for generator in final_tutorials(&*store, rng)? {
            let generated = generator.publish(store, host, rng)?;
            report.generated.push(generator.id());
            report.attempts += generated.attempts;
        }
    }

    if load_or_skip(&*store, GRAVEYARD_METAPUZZLE_ID, &mut report)?.is_some() {
        publish_graveyard_metapuzzle(store, host, rng)?;
        report.generated.push(GRAVEYARD_METAPUZZLE_ID);
        report.attempts += 1;
    }

    Ok(report)
}

fn is_known<S: PuzzleStore + ?Sized>(store: &S, id: PuzzleId) -> bool {
    store.load(id).is_ok()
}

fn load_or_skip<S: PuzzleStore + ?Sized>(
    store: &S,
    id: PuzzleId,
    report: &mut CatalogReport,
) -> Result<Option<Layout>> {
    match store.load(id) {
        Ok(layout) => Ok(Some(layout)),
        Err(PuzzleError::UnknownPuzzle(_)) => {
            log::warn!("Puzzle {id}: no layout stored, skipped");
            report.skipped.push(id);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn recipe_ids_are_unique() {
        let mut ids: Vec<PuzzleId> = PANELS
            .iter()
            .map(|recipe| recipe.id)
            .chain(TUTORIALS.iter().map(|recipe| recipe.id))
            .chain(FINAL_TUTORIAL_IDS)
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn odd_diamond_amounts_are_unreliable() {
        for recipe in PANELS {
            let unpairable = recipe.symbols.iter().any(|&(kind, color, amount)| {
                let flower_color = matches!(color, Color::Gold | Color::PetalPurple);
                kind == SymbolKind::Diamond && amount % 2 == 1 && !flower_color
            });
            if unpairable {
                assert!(recipe.unreliable, "recipe {} can never finish", recipe.id);
            }
        }
        assert!(PANELS.iter().any(|recipe| recipe.id == 97 && recipe.unreliable));
        assert!(PANELS.iter().any(|recipe| recipe.id == 468 && recipe.unreliable));
    }

    #[test]
    fn panel_recipe_builds_its_generator() {
        let recipe = PANELS.iter().find(|recipe| recipe.id == 97).unwrap();

        let generator = recipe.generator(Layout::new((5, 5))).unwrap();

        assert_eq!(generator.symbol_requests().len(), 3);
        assert_eq!(generator.flower_requests().len(), 3);
        assert_eq!(generator.wildcard_flowers(), 1);
        assert_eq!(generator.locks(), 6);
    }

    #[test]
    fn first_tutorial_pins_an_unlit_cell() {
        let mut rng = StdRng::seed_from_u64(4);
        let generator = TUTORIALS[0].generator(Layout::new((2, 2)), &mut rng).unwrap();

        let puzzle = generator.attempt(&mut rng).unwrap();

        let pinned: Vec<_> = [(0, 0), (0, 1)]
            .into_iter()
            .filter(|&coords| puzzle.grid.is_locked(coords))
            .collect();
        assert_eq!(pinned.len(), 1);
        assert!(!puzzle.grid.is_in_solution(pinned[0]));
    }

    #[test]
    fn final_tutorials_chain_opposite_values() {
        let mut store = MemoryStore::new();
        for id in FINAL_TUTORIAL_IDS {
            store.insert_layout(id, Layout::new((3, 3)));
        }
        let mut rng = StdRng::seed_from_u64(99);

        let generators = final_tutorials(&store, &mut rng).unwrap();
        assert_eq!(generators.len(), 4);
        for generator in &generators {
            assert_eq!(generator.gap_range(), (3, 5));
            assert!(FINAL_TUTORIAL_PATHS.contains(&generator.anchor().path.as_str()));
        }

        let puzzles: Vec<_> = generators
            .iter()
            .map(|generator| generator.generate(&mut rng).output)
            .collect();

        for (index, puzzle) in puzzles.iter().enumerate() {
            let next = &puzzles[(index + 1) % puzzles.len()];
            let shared: Vec<_> = iter_coords((3, 3))
                .filter(|&coords| puzzle.grid.is_locked(coords) && next.grid.is_locked(coords))
                .collect();
            assert_eq!(shared.len(), 1);
            let coords = shared[0];
            assert_ne!(puzzle.grid.is_in_solution(coords), next.grid.is_in_solution(coords));
        }
    }

    #[test]
    fn run_skips_missing_layouts() {
        let mut store = MemoryStore::new();
        store.insert_layout(26, Layout::new((3, 3)));
        store.insert_layout(415, Layout::new((3, 3)));
        let mut host = RecordingHost::new();
        let mut rng = StdRng::seed_from_u64(6);

        let report = run(&mut store, &mut host, &mut rng, true).unwrap();

        assert_eq!(report.generated, [26, 415]);
        assert!(report.skipped.contains(&3000));
        assert!(report.skipped.contains(&19));
        assert!(report.skipped.contains(&163));
        assert!(report.skipped.contains(&GRAVEYARD_METAPUZZLE_ID));
        assert!(store.get(26).unwrap().cells.is_some());
        assert!(store.get(415).unwrap().solution.is_some());
        assert_eq!(
            host.placement(415).unwrap().anchor.path,
            "3rdIsland/GraphicsRoot/StartingArea_HintPillarBase (1)"
        );
    }

    #[test]
    fn run_writes_graveyard_parity() {
        let mut store = MemoryStore::new();
        store.insert_layout(GRAVEYARD_METAPUZZLE_ID, Layout::new((8, 1)));
        let mut host = RecordingHost::new();
        let mut rng = StdRng::seed_from_u64(12);

        let report = run(&mut store, &mut host, &mut rng, true).unwrap();

        assert_eq!(report.generated, [GRAVEYARD_METAPUZZLE_ID]);
        let solution = store
            .get(GRAVEYARD_METAPUZZLE_ID)
            .and_then(|stored| stored.solution.as_ref())
            .unwrap();
        for (x, &lit) in solution.iter().enumerate() {
            let ones = GRAVESTONE_IDS
                .iter()
                .filter(|ids| host.gravestone(ids[x]) == Some(true))
                .count();
            assert_eq!(lit, ones % 2 == 1);
        }
    }
}
