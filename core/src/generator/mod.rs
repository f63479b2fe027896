use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout for one freshly created layer.
pub trait LayerGenerator {
    fn generate(self, config: LayerConfig) -> MineLayout;
}
