//! Benchmark profiles for the gridbot movement engine.
//!
//! - [`stress_config`]: a large board with immediate highlight refresh
//! - [`serpentine_path`]: a deterministic sequence of legal moves

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gridbot_core::CellIndex;
use gridbot_engine::BoardConfig;

/// A `size`×`size` board starting in the corner, refreshing highlights
/// without delay.
pub fn stress_config(size: u32) -> BoardConfig {
    let mut config = BoardConfig::with_size(size);
    config.highlight_delay = 0.0;
    config
}

/// Cells visited by walking row 0 left to right, row 1 right to left, and
/// so on, starting from cell 1 (the agent starts on cell 0).
///
/// Every step is a legal eight-neighbourhood move from the previous cell.
pub fn serpentine_path(size: u32) -> Vec<CellIndex> {
    let mut path = Vec::with_capacity((size * size) as usize);
    for row in 0..size {
        let cols: Box<dyn Iterator<Item = u32>> = if row % 2 == 0 {
            Box::new(0..size)
        } else {
            Box::new((0..size).rev())
        };
        for col in cols {
            path.push(CellIndex(row * size + col));
        }
    }
    path.remove(0);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbot_space::is_legal_move;

    #[test]
    fn serpentine_path_is_legal() {
        let size = 5;
        let path = serpentine_path(size);
        assert_eq!(path.len(), 24);
        let mut from = CellIndex(0);
        for &to in &path {
            assert!(is_legal_move(from, to, size), "{from} -> {to}");
            from = to;
        }
    }

    #[test]
    fn stress_config_is_valid() {
        assert!(stress_config(100).validate().is_ok());
    }
}
