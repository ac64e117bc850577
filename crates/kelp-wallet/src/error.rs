//! Wallet error types.

use kelp_core::error::CryptoError;
use thiserror::Error;

/// Errors that can occur while selecting coins or constructing spends.
///
/// These are fail-fast errors: the caller could have validated the request
/// beforehand. Ledger rejections are *not* represented here — they travel
/// as data in push results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Available coins cannot cover the target amount.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds {
        /// Total value available, in motes.
        have: u64,
        /// Target amount, in motes.
        need: u64,
    },

    /// The actor holds no coins at all.
    #[error("no spendable coins")]
    NoCoins,

    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A combine was requested over fewer than two coins.
    #[error("combine requires at least two coins, got {0}")]
    CombineTooFew(usize),

    /// Arithmetic overflow while totalling coin values.
    #[error("value overflow")]
    ValueOverflow,

    /// Cryptographic failure while signing.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
