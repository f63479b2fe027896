use serde::{Deserialize, Serialize};

/// Player-visible state of a single board position.
///
/// `TriggeredMine`, `RevealedMine` and `Misflagged` only appear once the
/// owning layer has left `Playing`; during play every cell is `Hidden`,
/// `Revealed` or `Flagged`. Revealed-and-flagged is unrepresentable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    /// Opened safe cell carrying its precomputed adjacent-mine count.
    Revealed(u8),
    Flagged,
    /// The exact mine that ended the game.
    TriggeredMine,
    /// Mine uncovered by loss handling.
    RevealedMine,
    /// Flag that turned out to sit on a safe cell, marked on loss.
    Misflagged,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(
            self,
            Self::Revealed(_) | Self::TriggeredMine | Self::RevealedMine
        )
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged | Self::Misflagged)
    }

    pub const fn is_misflagged(self) -> bool {
        matches!(self, Self::Misflagged)
    }

    pub const fn is_triggered(self) -> bool {
        matches!(self, Self::TriggeredMine)
    }

    /// Adjacent-mine count for an opened safe cell.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
