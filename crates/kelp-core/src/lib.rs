//! # kelp-core — coin-set entities, crypto, and boundary traits.
//!
//! Shared foundation for the Kelp engine:
//! - [`types`] — coins, programs, contracts, conditions, spend bundles
//! - [`crypto`] — Ed25519 keypairs, spend sighash, signature aggregation
//! - [`address`] — Bech32m puzzle-hash addresses
//! - [`traits`] — the ledger-service boundary
//! - [`error`] — shared error taxonomy, including [`error::RejectReason`]
//! - [`constants`] — monetary units and protocol defaults

pub mod address;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod traits;
pub mod types;

pub use error::RejectReason;
pub use traits::{LedgerService, StepEffects};
pub use types::{
    AggregateSignature, Coin, CoinSpend, Condition, Contract, Hash256, Program, SpendBundle,
};
