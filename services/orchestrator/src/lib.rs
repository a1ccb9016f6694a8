//! Orchestrator (spec §4.7 / C7): the six-rule admission pipeline that
//! decides whether an asset — and which of its generated pairs — is
//! allowed to publish as a trading opportunity.
//!
//! ## Purpose
//! Evaluates rules in a fixed order and stops at the first block, so a
//! caller always gets a single, specific rejection reason rather than an
//! aggregate of everything that happened to be wrong.
//!
//! ## Integration Points
//! Takes an `AssetDescriptor`, the active `ConfigSnapshot`, a caller-
//! supplied USD liquidity figure (rule 2 has no price oracle of its
//! own), and the `PairPlan`s search + the size optimizer already
//! produced for this asset against the quote-set. Returns a
//! `ValidationResult` the engine turns into `asset.validated` /
//! `asset.rejected` events and feeds to the publisher.
//!
//! ## Architecture Role
//! Holds per-asset `ValidationStatus` in `AdmissionTable`, the only
//! mutable state in this crate; rule evaluation itself (`rules` module)
//! is pure.

pub mod rules;
pub mod state;

pub use rules::RejectReason;
pub use state::{AdmissionTable, AssetKey};

use rust_decimal::Decimal;
use types::asset::{AssetDescriptor, ValidationStatus};
use types::config_snapshot::ConfigSnapshot;
use types::error::ErrorKind;
use types::pair::PairPlan;

/// Everything `validate` needs for one asset's admission pass.
pub struct ValidationInput<'a> {
    pub asset: &'a AssetDescriptor,
    pub config: &'a ConfigSnapshot,
    /// USD liquidity of the asset's deepest pool, as computed by the
    /// caller from `price-feed` output (rule 2).
    pub liquidity_usd: Decimal,
    /// Candidate pairs already generated against the quote-set and sized
    /// by the optimizer (rules 4-6 filter and re-score these).
    pub candidate_pairs: &'a [PairPlan],
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<RejectReason>,
    pub pairs: Option<Vec<PairPlan>>,
}

impl ValidationResult {
    fn rejected(reason: RejectReason) -> Self {
        Self { valid: false, reason: Some(reason), pairs: None }
    }
}

/// Runs the six ordered rules against one asset (spec §4.7). Pure with
/// respect to state — callers that track `ValidationStatus` across
/// rounds should route the result through `AdmissionTable::transition`.
pub fn validate(input: &ValidationInput) -> ValidationResult {
    if let Err(reason) = rules::check_configured(input.asset, input.config) {
        return ValidationResult::rejected(reason);
    }
    if let Err(reason) = rules::check_liquidity(input.liquidity_usd) {
        return ValidationResult::rejected(reason);
    }
    if let Err(reason) = rules::check_safety_score(input.asset) {
        return ValidationResult::rejected(reason);
    }
    let with_pairs = match rules::check_has_pairs(input.candidate_pairs) {
        Ok(p) => p,
        Err(reason) => return ValidationResult::rejected(reason),
    };
    let profitable = match rules::check_profitable(with_pairs, input.config) {
        Ok(p) => p,
        Err(reason) => return ValidationResult::rejected(reason),
    };
    let atomic = match rules::check_atomic(profitable) {
        Ok(p) => p,
        Err(reason) => return ValidationResult::rejected(reason),
    };

    ValidationResult { valid: true, reason: None, pairs: Some(atomic) }
}

/// Publishes `pairs` for `asset`, provided its tracked status is
/// `Valid` — spec §4.7's `addToTrading(asset, pairs) -> {success}`.
/// Returns the pairs for the caller to hand to the publisher; the
/// orchestrator itself does not hold a channel to the publisher.
pub fn add_to_trading(
    table: &AdmissionTable,
    key: &AssetKey,
    pairs: Vec<PairPlan>,
) -> Result<Vec<PairPlan>, ErrorKind> {
    let status = table.status(key);
    if status != ValidationStatus::Valid {
        return Err(ErrorKind::NotValidated {
            asset: key.address.clone(),
            status: format!("{status:?}"),
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::chain::{ChainDescriptor, SizeGrid};
    use types::config_snapshot::{ChainConfig, DexConfig, RpcPoolConfig};
    use types::pair::PairPlan;
    use std::collections::HashSet;

    fn config_with_chain() -> ConfigSnapshot {
        let mut config = ConfigSnapshot::empty("v1");
        config.chains.push(ChainConfig {
            descriptor: ChainDescriptor {
                chain_id: 56,
                name: "bsc".into(),
                wrapped_native: "0x0000000000000000000000000000000000dead".into(),
                gas_price_floor_gwei: 3.0,
                size_grid: SizeGrid { min: 100.0, max: 10_000.0, steps: 6 },
                gas_units_hint_roundtrip_v2: 215_000,
            },
            rpc_pool: RpcPoolConfig { wss: vec!["wss://a".into()], https: vec!["https://a".into()] },
            dexes: vec![DexConfig { dex_id: "pancakeswap".into(), name: "PancakeSwap".into() }],
            pools: vec![],
        });
        config
    }

    fn asset() -> AssetDescriptor {
        AssetDescriptor {
            chain_id: 56,
            address: "0xweth".into(),
            symbol: "WETH".into(),
            decimals: 18,
            safety_score: 90,
            flags: HashSet::new(),
        }
    }

    fn plan() -> PairPlan {
        PairPlan {
            route: vec!["pancakeswap".into(), "sushiswap".into()],
            hops: 2,
            est_gross_bps: 100,
            est_slippage_bps: 10,
            est_gas_usd: 0.2,
            est_profit_bps: 0,
            atomic: true,
            pools_used: vec![],
            reasons_block: None,
        }
    }

    /// This end-to-end run corresponds to the "happy path" scenario in
    /// spec §8 scenario 1: a well-configured, liquid, high-safety asset
    /// with a profitable atomic route should validate.
    #[test]
    fn well_formed_asset_with_profitable_pair_is_valid() {
        use rust_decimal_macros::dec;
        let config = config_with_chain();
        let asset = asset();
        let candidates = vec![plan()];
        let input = ValidationInput {
            asset: &asset,
            config: &config,
            liquidity_usd: dec!(2_000_000),
            candidate_pairs: &candidates,
        };
        let result = validate(&input);
        assert!(result.valid);
        assert!(result.reason.is_none());
        assert_eq!(result.pairs.unwrap().len(), 1);
    }

    #[test]
    fn unconfigured_chain_blocks_immediately() {
        use rust_decimal_macros::dec;
        let config = ConfigSnapshot::empty("v1"); // no chains
        let asset = asset();
        let input = ValidationInput {
            asset: &asset,
            config: &config,
            liquidity_usd: dec!(2_000_000),
            candidate_pairs: &[],
        };
        let result = validate(&input);
        assert!(!result.valid);
        assert_eq!(result.reason, Some(RejectReason::NotConfigured));
    }

    #[test]
    fn rule_order_reports_liquidity_before_safety_score() {
        use rust_decimal_macros::dec;
        let config = config_with_chain();
        let mut asset = asset();
        asset.safety_score = 10; // also fails rule 3
        let input = ValidationInput {
            asset: &asset,
            config: &config,
            liquidity_usd: dec!(1), // fails rule 2 first
            candidate_pairs: &[],
        };
        let result = validate(&input);
        assert_eq!(result.reason, Some(RejectReason::LowLiq));
    }

    #[test]
    fn add_to_trading_requires_valid_status() {
        let table = AdmissionTable::new();
        let key = AssetKey { chain_id: 56, address: "0xweth".into() };
        let err = add_to_trading(&table, &key, vec![plan()]).unwrap_err();
        assert!(matches!(err, ErrorKind::NotValidated { .. }));

        table.transition(&key, ValidationStatus::Validating, "v1");
        table.transition(&key, ValidationStatus::Valid, "v1");
        let pairs = add_to_trading(&table, &key, vec![plan()]).unwrap();
        assert_eq!(pairs.len(), 1);
    }
}
