//! Shared DEX ABI and event-decoding library
//!
//! Canonical event signatures and log decoders for the DEX families the engine
//! quotes against. Kept separate from `amm` (pure pricing math) so the RPC
//! transport and pool registry can filter/decode logs without depending on
//! pricing internals.
//!
//! # Architecture
//!
//! ```text
//! libs/dex-abi/
//! ├── abi/        # ABI definitions and event decoders
//! │   ├── events.rs      # Event structures and decoders
//! │   ├── uniswap_v2.rs  # V2 specific ABIs
//! │   └── uniswap_v3.rs  # V3 specific ABIs
//! └── event_signatures.rs  # precomputed topic0 constants
//! ```
//!
//! # Design Principles
//! - Single canonical source for DEX ABIs
//! - Protocol-agnostic interfaces
//! - Zero-copy where possible
//! - Semantic validation built-in

pub mod abi;
pub mod event_signatures;

// Re-export commonly used types
pub use abi::{
    detect_dex_protocol,
    events::{DecodingError, ValidatedBurn, ValidatedMint, ValidatedSwap},
    get_all_event_signatures, get_swap_signatures, BurnEventDecoder, MintEventDecoder,
    SwapEventDecoder,
};

// Re-export centralized event signature constants
pub use event_signatures::{
    // Utility functions
    get_all_dex_signatures,
    get_liquidity_signatures,
    get_swap_signatures as get_swap_signature_constants,
    to_hex_string,
    ERC20_APPROVAL,
    // ERC-20 signatures
    ERC20_TRANSFER,
    UNISWAP_V2_BURN,
    UNISWAP_V2_MINT,
    // Uniswap V2 signatures
    UNISWAP_V2_SWAP,
    UNISWAP_V2_SYNC,
    UNISWAP_V3_BURN,
    UNISWAP_V3_MINT,
    // Uniswap V3 signatures
    UNISWAP_V3_SWAP,
};
