//! Maps DEX event-log topics to the registry's snapshot invalidation call.
//!
//! `Sync`/`Swap`/`Burn`/`Mint` logs mean "this pool's reserves just changed";
//! the registry doesn't decode the log body, it only needs topic0 to know
//! *that* invalidation is warranted — decoding (if ever needed) belongs to
//! `dex_abi`.

use dex_abi::event_signatures::{
    UNISWAP_V2_BURN, UNISWAP_V2_MINT, UNISWAP_V2_SWAP, UNISWAP_V2_SYNC, UNISWAP_V3_BURN,
    UNISWAP_V3_MINT, UNISWAP_V3_SWAP,
};
use web3::types::H256;

/// Topic0 values the registry subscribes to across every supported family.
pub fn invalidating_topics() -> Vec<H256> {
    vec![
        UNISWAP_V2_SYNC,
        UNISWAP_V2_SWAP,
        UNISWAP_V2_MINT,
        UNISWAP_V2_BURN,
        UNISWAP_V3_SWAP,
        UNISWAP_V3_MINT,
        UNISWAP_V3_BURN,
    ]
}

pub fn is_invalidating_topic(topic: &H256) -> bool {
    invalidating_topics().contains(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_topic_is_invalidating() {
        assert!(is_invalidating_topic(&UNISWAP_V2_SYNC));
    }

    #[test]
    fn erc20_transfer_is_not_invalidating() {
        assert!(!is_invalidating_topic(&dex_abi::event_signatures::ERC20_TRANSFER));
    }
}
