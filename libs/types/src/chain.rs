//! Chain-level configuration the rest of the engine is indexed by.

use serde::{Deserialize, Serialize};

/// Trade-size search space for the size optimizer (C6), per chain.
///
/// Invariant (enforced by `config::validate`): `min < max`, `steps >= 3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeGrid {
    pub min: f64,
    pub max: f64,
    pub steps: u32,
}

impl SizeGrid {
    pub fn is_valid(&self) -> bool {
        self.min < self.max && self.steps >= 3
    }

    /// `steps` evenly spaced points across `[min, max]`, inclusive.
    pub fn points(&self) -> Vec<f64> {
        if self.steps < 2 {
            return vec![self.min];
        }
        let span = self.max - self.min;
        (0..self.steps)
            .map(|i| self.min + span * (i as f64) / ((self.steps - 1) as f64))
            .collect()
    }
}

/// Static description of one EVM-compatible chain (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub name: String,
    /// Lowercase-hex wrapped-native token address (e.g. WETH, WMATIC).
    pub wrapped_native: String,
    /// Gas price floor, in gwei, used when no live fee data is available.
    pub gas_price_floor_gwei: f64,
    pub size_grid: SizeGrid,
    /// Gas units for a 2-hop flash-loan round trip; chain-provided default.
    pub gas_units_hint_roundtrip_v2: u64,
}

impl ChainDescriptor {
    pub const DEFAULT_GAS_UNITS_HINT: u64 = 215_000;

    pub fn is_valid(&self) -> bool {
        self.chain_id > 0
            && self.wrapped_native.len() == 42
            && self.wrapped_native.starts_with("0x")
            && self.size_grid.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_grid_points_span_min_to_max() {
        let grid = SizeGrid {
            min: 100.0,
            max: 1000.0,
            steps: 4,
        };
        let points = grid.points();
        assert_eq!(points.len(), 4);
        assert!((points[0] - 100.0).abs() < 1e-9);
        assert!((points[3] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn size_grid_rejects_too_few_steps() {
        let grid = SizeGrid {
            min: 1.0,
            max: 2.0,
            steps: 2,
        };
        assert!(!grid.is_valid());
        let grid3 = SizeGrid {
            min: 1.0,
            max: 2.0,
            steps: 3,
        };
        assert!(grid3.is_valid());
    }
}
