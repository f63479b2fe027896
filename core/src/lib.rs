use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use report::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod report;
mod session;
mod types;

/// Shape of a single layer: board size plus mine count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl LayerConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps into a playable shape: at least one cell per axis, at least one
    /// mine, at least one safe cell.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.max(1);
        let size_y = size_y.max(1);
        let max_mines = mult(size_x, size_y).saturating_sub(1).max(1);
        let clamped = mines.clamp(1, max_mines);
        if clamped != mines {
            log::warn!(
                "mine count {} clamped to {} for a {}x{} board",
                mines,
                clamped,
                size_x,
                size_y
            );
        }
        Self::new_unchecked((size_x, size_y), clamped)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Immutable output of board generation: mine placement plus fully
/// precomputed 8-neighbor adjacency counts. Mine cells keep an unused 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        let dim = mine_mask.dim();
        let bounds: Coord2 = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        let mut adjacent = Array2::from_elem(mine_mask.raw_dim(), 0u8);
        for x in 0..bounds.0 {
            for y in 0..bounds.1 {
                let coords = (x, y);
                if mine_mask[coords.to_nd_index()] {
                    continue;
                }
                let count = neighbors(coords, bounds)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                adjacent[coords.to_nd_index()] = count as u8;
            }
        }

        Self {
            mine_mask,
            adjacent,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(mine_mask);
        if layout.safe_cell_count() == 0 {
            return Err(GameError::TooManyMines);
        }
        Ok(layout)
    }

    pub fn layer_config(&self) -> LayerConfig {
        LayerConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Precomputed at construction, never recounted afterwards.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_config_clamps_mines_into_range() {
        let config = LayerConfig::new((3, 3), 100);
        assert_eq!(config.mines, 8);

        let config = LayerConfig::new((3, 3), 0);
        assert_eq!(config.mines, 1);
        assert_eq!(config.safe_cells(), 8);
    }

    #[test]
    fn layout_counts_mines_and_precomputes_adjacency() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(2, 2)]).unwrap();

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 8);
        assert!(layout.contains_mine((2, 2)));
        assert_eq!(layout.adjacent_mines((1, 1)), 1);
        assert_eq!(layout.adjacent_mines((2, 1)), 1);
        assert_eq!(layout.adjacent_mines((0, 0)), 0);
    }

    #[test]
    fn layout_adjacency_matches_literal_neighbor_count() {
        let mines = &[(0, 0), (1, 0), (2, 2), (3, 1)];
        let layout = MineLayout::from_mine_coords((4, 4), mines).unwrap();

        let bounds = layout.size();
        for x in 0..bounds.0 {
            for y in 0..bounds.1 {
                if layout.contains_mine((x, y)) {
                    continue;
                }
                let literal = neighbors((x, y), bounds)
                    .filter(|&pos| layout.contains_mine(pos))
                    .count() as u8;
                assert_eq!(layout.adjacent_mines((x, y)), literal, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn layout_rejects_out_of_range_mine_coords() {
        let result = MineLayout::from_mine_coords((2, 2), &[(2, 0)]);
        assert_eq!(result, Err(GameError::InvalidCoords));
    }

    #[test]
    fn layout_rejects_fully_mined_board() {
        let result = MineLayout::from_mine_coords((2, 1), &[(0, 0), (1, 0)]);
        assert_eq!(result, Err(GameError::TooManyMines));
    }
}
