use serde::{Deserialize, Serialize};

use crate::*;

/// Flat snapshot of one layer for the presentation side: counters and
/// status only, no board payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerReport {
    pub id: LayerId,
    pub status: LayerState,
    pub size: Coord2,
    pub mines: CellCount,
    pub flags_used: CellCount,
    pub revealed_count: CellCount,
    pub mines_left: isize,
}

impl LayerReport {
    pub fn from_engine(engine: &LayerEngine) -> Self {
        Self {
            id: engine.id(),
            status: engine.state(),
            size: engine.size(),
            mines: engine.total_mines(),
            flags_used: engine.flags_used(),
            revealed_count: engine.revealed_count(),
            mines_left: engine.mines_left(),
        }
    }
}

/// Session-wide snapshot: overall status plus per-layer reports in the
/// current addressing order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub overall: OverallStatus,
    pub total_mines: CellCount,
    pub total_flags: CellCount,
    pub layers: Vec<LayerReport>,
}

impl SessionReport {
    pub fn from_session(session: &Session) -> Self {
        Self {
            overall: session.overall_status(),
            total_mines: session.total_mines(),
            total_flags: session.total_flags(),
            layers: session.layers().map(LayerReport::from_engine).collect(),
        }
    }
}
