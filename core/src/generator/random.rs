use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Uniform placement without replacement: shuffle the full cell index range
/// and take the first `mines` positions. Deliberately no safe-start
/// guarantee, the first reveal can lose immediately.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayerGenerator {
    seed: u64,
}

impl RandomLayerGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayerGenerator for RandomLayerGenerator {
    fn generate(self, config: LayerConfig) -> MineLayout {
        let total = config.total_cells();
        let max_mines = total.saturating_sub(1).max(1);
        let mines = config.mines.clamp(1, max_mines);
        if mines != config.mines {
            log::warn!(
                "requested {} mines on a {}x{} board, generating {}",
                config.mines,
                config.size.0,
                config.size.1,
                mines
            );
        }

        let mut indices: Vec<CellCount> = (0..total).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let width = config.size.0 as CellCount;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for &index in &indices[..mines as usize] {
            let coords = ((index % width) as Coord, (index / width) as Coord);
            mine_mask[coords.to_nd_index()] = true;
        }

        MineLayout::from_mine_mask(mine_mask)
    }
}
