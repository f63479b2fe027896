use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

pub const MIN_AXIS: Coord = 4;
pub const MIN_DENSITY: f32 = 0.05;
pub const MAX_DENSITY: f32 = 0.4;

/// Session-wide configuration, fixed for the session's lifetime.
/// `depth` is the initial layer count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub width: Coord,
    pub height: Coord,
    pub depth: u8,
    pub mine_density: f32,
}

impl SessionConfig {
    /// Clamps every value into a playable range; construction never fails.
    pub fn new(width: Coord, height: Coord, depth: u8, mine_density: f32) -> Self {
        let config = Self {
            width: width.max(MIN_AXIS),
            height: height.max(MIN_AXIS),
            depth: depth.max(1),
            mine_density: mine_density.clamp(MIN_DENSITY, MAX_DENSITY),
        };
        if config.width != width
            || config.height != height
            || config.depth != depth
            || config.mine_density != mine_density
        {
            log::warn!(
                "session config ({}, {}, {}, {}) clamped to {:?}",
                width,
                height,
                depth,
                mine_density,
                config
            );
        }
        config
    }

    /// Mine count per layer: `round(width * height * density)` clamped so
    /// every layer keeps at least one mine and one safe cell.
    pub fn mines_per_layer(&self) -> CellCount {
        let total = mult(self.width, self.height);
        let raw = (f32::from(total) * self.mine_density).round() as CellCount;
        raw.clamp(1, total - 1)
    }

    pub fn layer_config(&self) -> LayerConfig {
        LayerConfig::new_unchecked((self.width, self.height), self.mines_per_layer())
    }
}

/// Derived on read from the win flag plus surviving layer states; never
/// stored, so there is no second source of truth to invalidate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OverallStatus {
    Playing,
    Won,
    Lost,
}

/// Owns the stack of active layers, dispatches player actions by positional
/// index, and mediates layer-clearing removal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    config: SessionConfig,
    layers: Vec<LayerEngine>,
    next_layer_id: u32,
    won: bool,
}

impl Session {
    /// An empty session; call [`Session::new_game`] to populate it.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            next_layer_id: 0,
            won: false,
        }
    }

    /// A fully generated session with `depth` independently mined layers.
    pub fn create(config: SessionConfig) -> Self {
        let mut session = Self::new(config);
        session.new_game();
        session
    }

    /// Like [`Session::create`] but reproducible from a seed.
    pub fn create_seeded(config: SessionConfig, seed: u64) -> Self {
        let mut session = Self::new(config);
        session.new_game_seeded(seed);
        session
    }

    pub fn new_game(&mut self) {
        self.new_game_seeded(rand::rng().random());
    }

    pub fn new_game_seeded(&mut self, seed: u64) {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let layer_config = self.config.layer_config();

        self.won = false;
        self.layers.clear();
        for _ in 0..self.config.depth {
            let layout = RandomLayerGenerator::new(seeds.random()).generate(layer_config);
            let id = LayerId(self.next_layer_id);
            self.next_layer_id += 1;
            self.layers.push(LayerEngine::new(id, layout));
        }

        log::debug!(
            "new game: {} layers of {}x{}, {} mines each",
            self.config.depth,
            self.config.width,
            self.config.height,
            layer_config.mines
        );
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer at its current position; positions shift when earlier layers
    /// are cleared, so callers must not hold indices across a clearing.
    pub fn layer(&self, layer_index: usize) -> Option<&LayerEngine> {
        self.layers.get(layer_index)
    }

    pub fn layer_by_id(&self, id: LayerId) -> Option<&LayerEngine> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerEngine> {
        self.layers.iter()
    }

    /// Sum of mine counts across surviving layers.
    pub fn total_mines(&self) -> CellCount {
        self.layers.iter().map(LayerEngine::total_mines).sum()
    }

    /// Sum of currently placed flags across surviving layers.
    pub fn total_flags(&self) -> CellCount {
        self.layers.iter().map(LayerEngine::flags_used).sum()
    }

    pub fn overall_status(&self) -> OverallStatus {
        if self.won {
            OverallStatus::Won
        } else if self
            .layers
            .iter()
            .any(|layer| matches!(layer.state(), LayerState::Lost))
        {
            OverallStatus::Lost
        } else {
            OverallStatus::Playing
        }
    }

    /// Reveal a cell on the addressed layer. A stale or out-of-range index
    /// is a silent no-op. A winning reveal auto-flags the layer's mines,
    /// which in turn clears the layer off the board.
    pub fn reveal(&mut self, layer_index: usize, coords: Coord2) -> RevealOutcome {
        let Some(layer) = self.layers.get_mut(layer_index) else {
            return RevealOutcome::NoChange;
        };

        let outcome = layer.reveal(coords);
        if matches!(outcome, RevealOutcome::Won) {
            self.clear_layer_if_complete(layer_index);
        }
        outcome
    }

    /// Toggle a flag on the addressed layer, then evaluate layer clearing.
    pub fn toggle_flag(&mut self, layer_index: usize, coords: Coord2) -> MarkOutcome {
        let Some(layer) = self.layers.get_mut(layer_index) else {
            return MarkOutcome::NoChange;
        };

        let outcome = layer.toggle_flag(coords);
        if outcome.has_update() {
            self.clear_layer_if_complete(layer_index);
        }
        outcome
    }

    /// Removes the layer when its flags match its mine set exactly; the
    /// session is won when the last layer leaves the board this way.
    fn clear_layer_if_complete(&mut self, layer_index: usize) -> bool {
        let Some(layer) = self.layers.get(layer_index) else {
            return false;
        };
        if !layer.is_flag_complete() {
            return false;
        }

        let removed = self.layers.remove(layer_index);
        log::debug!(
            "layer {:?} cleared, {} layers remaining",
            removed.id(),
            self.layers.len()
        );

        if self.layers.is_empty() {
            self.won = true;
        }
        true
    }
}
