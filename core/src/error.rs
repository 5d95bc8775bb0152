use thiserror::Error;

use crate::{Color, PuzzleId};

/// Configuration and collaborator errors, reported at call time.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Petal count {0} out of range, expected 0 to 4")]
    PetalCountOutOfRange(u8),
    #[error("Minimum gap count {min} is above the maximum {max}")]
    InvalidGapRange { min: usize, max: usize },
    #[error("Layout shape does not match declared size")]
    InvalidLayoutShape,
    #[error("No puzzle stored under id {0}")]
    UnknownPuzzle(PuzzleId),
}

pub type Result<T> = core::result::Result<T, PuzzleError>;

/// Reason a single generation attempt gave up. Never surfaced past the retry loop.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Infeasible {
    #[error("only {available} open tiles see {petals} matching neighbors, {wanted} flowers requested")]
    FlowerSpots {
        petals: u8,
        wanted: usize,
        available: usize,
    },
    #[error("ran out of open tiles with {remaining} wildcard flowers left")]
    NoOpenTiles { remaining: usize },
    #[error("ran out of candidate regions with {remaining} {color:?} diamonds left")]
    DiamondPool { color: Color, remaining: usize },
    #[error("no room left for a partner {color:?} diamond")]
    DiamondPartner { color: Color },
    #[error("only {gaps} deducible gaps found, {min_gaps} required")]
    GapShortfall { gaps: usize, min_gaps: usize },
}

pub type Attempt<T> = core::result::Result<T, Infeasible>;
