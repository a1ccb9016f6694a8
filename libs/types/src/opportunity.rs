//! The published opportunity record and its deterministic id.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub chain_id: u64,
    pub dex_in: String,
    pub dex_out: String,
    pub base_token: String,
    pub quote_token: String,
    pub amount_in: f64,
    pub est_profit_usd: f64,
    pub gas_usd: f64,
    /// Monotonic milliseconds.
    pub ts: u64,
}

impl Opportunity {
    /// `id` is a deterministic hash of `(chainId, sorted pools, quantized
    /// amountIn, blockNumber)` — used for dedup (spec §3, §4.9).
    ///
    /// `amountIn` is quantized to 6 significant decimal digits before
    /// hashing so that floating-point jitter between re-scans of the same
    /// trade does not produce distinct ids.
    pub fn compute_id(chain_id: u64, pools: &[String], amount_in: f64, block_number: u64) -> String {
        let mut sorted_pools = pools.to_vec();
        sorted_pools.sort();
        let quantized = quantize(amount_in);

        let mut hasher = Keccak256::new();
        hasher.update(chain_id.to_be_bytes());
        for p in &sorted_pools {
            hasher.update(p.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(quantized.to_be_bytes());
        hasher.update(block_number.to_be_bytes());
        let digest = hasher.finalize();
        hex::encode(digest)
    }
}

/// Round `x` to 6 significant digits represented as a fixed-point integer,
/// so near-identical amounts hash to the same quantized value.
fn quantize(x: f64) -> u64 {
    if x <= 0.0 {
        return 0;
    }
    let magnitude = x.abs().log10().floor() as i32;
    let scale = 10f64.powi(5 - magnitude);
    (x * scale).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_deterministic_for_same_inputs() {
        let pools = vec!["0xpoolA".to_string(), "0xpoolB".to_string()];
        let a = Opportunity::compute_id(56, &pools, 1.0, 100);
        let b = Opportunity::compute_id(56, &pools, 1.0, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn id_is_order_independent_on_pool_list() {
        let forward = vec!["0xpoolA".to_string(), "0xpoolB".to_string()];
        let reverse = vec!["0xpoolB".to_string(), "0xpoolA".to_string()];
        assert_eq!(
            Opportunity::compute_id(56, &forward, 1.0, 100),
            Opportunity::compute_id(56, &reverse, 1.0, 100)
        );
    }

    #[test]
    fn id_differs_on_block_number() {
        let pools = vec!["0xpoolA".to_string()];
        let a = Opportunity::compute_id(56, &pools, 1.0, 100);
        let b = Opportunity::compute_id(56, &pools, 1.0, 101);
        assert_ne!(a, b);
    }

    #[test]
    fn quantize_absorbs_float_jitter() {
        assert_eq!(quantize(1.0000001), quantize(1.0000002));
    }
}
