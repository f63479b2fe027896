use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::*;

/// Stable identity of a layer, assigned once by the session and kept until
/// the layer is cleared. Never a positional index: it survives removal of
/// sibling layers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
///
/// `Won` and `Lost` are terminal; reveal and flag requests on a finished
/// layer are no-ops.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayerState {
    Playing,
    Won,
    Lost,
}

impl LayerState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for LayerState {
    fn default() -> Self {
        Self::Playing
    }
}

/// One layer's full gameplay state machine: reveal propagation, flag
/// accounting, win/loss detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerEngine {
    id: LayerId,
    layout: MineLayout,
    board: Array2<CellState>,
    state: LayerState,
    revealed_count: CellCount,
    flags_used: CellCount,
    triggered_mine: Option<Coord2>,
}

impl LayerEngine {
    pub fn new(id: LayerId, layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            id,
            layout,
            board: Array2::default(size.to_nd_index()),
            state: Default::default(),
            revealed_count: 0,
            flags_used: 0,
            triggered_mine: None,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// Running count of revealed safe cells, maintained with every reveal.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flags_used(&self) -> CellCount {
        self.flags_used
    }

    /// How many mines have not been flagged yet; negative when overflagged.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flags_used as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.layout.contains_mine(coords)
    }

    pub fn adjacent_mines_at(&self, coords: Coord2) -> u8 {
        self.layout.adjacent_mines(coords)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Reveal a hidden cell. Out-of-bounds coordinates, finished layers and
    /// flagged or already-revealed cells are silent no-ops.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() || !self.layout.in_bounds(coords) {
            return NoChange;
        }
        if !matches!(self.board[coords.to_nd_index()], CellState::Hidden) {
            return NoChange;
        }

        if self.layout.contains_mine(coords) {
            log::debug!("layer {:?}: mine hit at {:?}", self.id, coords);
            self.board[coords.to_nd_index()] = CellState::TriggeredMine;
            self.triggered_mine = Some(coords);
            self.state = LayerState::Lost;
            self.apply_loss_marks();
            return HitMine;
        }

        self.flood_reveal(coords);

        if self.revealed_count >= self.layout.safe_cell_count() {
            self.state = LayerState::Won;
            self.auto_flag_mines();
            Won
        } else {
            Revealed
        }
    }

    /// Toggle the flag on a hidden cell. Out-of-bounds coordinates, finished
    /// layers and revealed cells are silent no-ops.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use MarkOutcome::*;

        if self.state.is_finished() || !self.layout.in_bounds(coords) {
            return NoChange;
        }

        match self.board[coords.to_nd_index()] {
            CellState::Hidden => {
                self.board[coords.to_nd_index()] = CellState::Flagged;
                self.flags_used += 1;
                Changed
            }
            CellState::Flagged => {
                self.board[coords.to_nd_index()] = CellState::Hidden;
                self.flags_used -= 1;
                Changed
            }
            _ => NoChange,
        }
    }

    /// Exact-match clearing predicate: every mine flagged, every safe cell
    /// unflagged. Gated on the running flag count so toggles stay cheap.
    pub fn is_flag_complete(&self) -> bool {
        if self.flags_used != self.layout.mine_count() {
            return false;
        }

        let (x_end, y_end) = self.layout.size();
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                if self.board[coords.to_nd_index()].is_flagged() != self.layout.contains_mine(coords)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Worklist flood fill: reveal the seed, then expand breadth-first
    /// through connected zero-cells and their direct neighbors. Flagged
    /// cells are barriers and are never crossed or revealed.
    fn flood_reveal(&mut self, start: Coord2) {
        let adjacent = self.layout.adjacent_mines(start);
        self.board[start.to_nd_index()] = CellState::Revealed(adjacent);
        self.revealed_count += 1;
        log::debug!(
            "layer {:?}: revealed {:?}, adjacent mines: {}",
            self.id,
            start,
            adjacent
        );

        if adjacent != 0 {
            return;
        }

        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .layout
            .iter_neighbors(start)
            .filter(|&pos| matches!(self.board[pos.to_nd_index()], CellState::Hidden))
            .collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // flags block expansion, mines stay hidden
            if !matches!(self.board[visit_coords.to_nd_index()], CellState::Hidden)
                || self.layout.contains_mine(visit_coords)
            {
                continue;
            }

            let visit_adjacent = self.layout.adjacent_mines(visit_coords);
            self.board[visit_coords.to_nd_index()] = CellState::Revealed(visit_adjacent);
            self.revealed_count += 1;
            log::trace!(
                "layer {:?}: flood revealed {:?}, adjacent mines: {}",
                self.id,
                visit_coords,
                visit_adjacent
            );

            if visit_adjacent == 0 {
                to_visit.extend(
                    self.layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| matches!(self.board[pos.to_nd_index()], CellState::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// Flags every still-hidden mine after a win so the finished board shows
    /// all mines flagged. Player flags on mines are kept as-is.
    fn auto_flag_mines(&mut self) {
        let (x_end, y_end) = self.layout.size();
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                if self.layout.contains_mine(coords)
                    && matches!(self.board[coords.to_nd_index()], CellState::Hidden)
                {
                    self.board[coords.to_nd_index()] = CellState::Flagged;
                    self.flags_used += 1;
                }
            }
        }
    }

    /// End-state marking after a loss: hidden mines are uncovered, flags on
    /// safe cells become misflags, flags on mines stay flags, untouched safe
    /// cells stay hidden. Idempotent.
    fn apply_loss_marks(&mut self) {
        let (x_end, y_end) = self.layout.size();
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                let cell = self.board[coords.to_nd_index()];
                if self.layout.contains_mine(coords) {
                    if matches!(cell, CellState::Hidden) {
                        self.board[coords.to_nd_index()] = CellState::RevealedMine;
                    }
                } else if matches!(cell, CellState::Flagged) {
                    self.board[coords.to_nd_index()] = CellState::Misflagged;
                }
            }
        }
    }
}
