use serde::{Deserialize, Serialize};

use crate::{PuzzleError, Result};

/// Highest petal count a flower can show, one per orthogonal neighbor.
pub const MAX_PETALS: u8 = 4;

/// Hint marker carried by a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    None,
    Diamond,
    Dice,
    Bar,
    Flower(u8),
}

impl Symbol {
    /// Flower with `petals` petals, rejecting counts a cell cannot have.
    pub fn flower(petals: u8) -> Result<Self> {
        if petals <= MAX_PETALS {
            Ok(Self::Flower(petals))
        } else {
            Err(PuzzleError::PetalCountOutOfRange(petals))
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn petals(self) -> Option<u8> {
        match self {
            Self::Flower(petals) => Some(petals),
            _ => None,
        }
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::None
    }
}

/// Symbol kinds accepted by [`crate::Generator::add`]. Flowers have their own setters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Diamond,
    Dice,
    Bar,
}

impl From<SymbolKind> for Symbol {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Diamond => Self::Diamond,
            SymbolKind::Dice => Self::Dice,
            SymbolKind::Bar => Self::Bar,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
    Gray,
    Gold,
    Teal,
    PetalPurple,
    Red,
    Orange,
    Blue,
}

impl Default for Color {
    fn default() -> Self {
        Self::Black
    }
}

impl Color {
    /// Whether a placed `symbol` painted `painted` counts as this color when pairing diamonds.
    ///
    /// Flowers carry their color in the petals: a flower with at least one petal counts as
    /// gold, one with a missing petal counts as petal purple, and it never counts as anything
    /// else.
    pub fn matches(self, symbol: Symbol, painted: Color) -> bool {
        match symbol {
            Symbol::None => false,
            Symbol::Flower(petals) => match self {
                Self::Gold => petals >= 1,
                Self::PetalPurple => petals < MAX_PETALS,
                _ => false,
            },
            _ => painted == self,
        }
    }
}

/// Mutable state of one cell. Whether the cell is disabled lives in the [`crate::Layout`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub locked: bool,
    pub solution: bool,
    pub symbol: Symbol,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flower_rejects_five_petals() {
        assert_eq!(Symbol::flower(4), Ok(Symbol::Flower(4)));
        assert_eq!(
            Symbol::flower(5),
            Err(PuzzleError::PetalCountOutOfRange(5))
        );
    }

    #[test]
    fn flowers_match_by_petals() {
        assert!(Color::Gold.matches(Symbol::Flower(1), Color::Black));
        assert!(!Color::Gold.matches(Symbol::Flower(0), Color::Black));
        assert!(Color::PetalPurple.matches(Symbol::Flower(3), Color::Black));
        assert!(!Color::PetalPurple.matches(Symbol::Flower(4), Color::Black));
        assert!(!Color::Black.matches(Symbol::Flower(2), Color::Black));
    }

    #[test]
    fn other_symbols_match_by_paint() {
        assert!(Color::Teal.matches(Symbol::Diamond, Color::Teal));
        assert!(!Color::Teal.matches(Symbol::Diamond, Color::White));
        assert!(!Color::Black.matches(Symbol::None, Color::Black));
    }
}
