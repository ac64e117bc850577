//! # kelp-wallet — coin selection, actors, and atomic spend construction.
//!
//! The wallet side of the engine:
//!
//! - [`keys`] — master seed and deterministic index → keypair derivation
//! - [`coin_selection`] — streaming greedy covering-subset selection
//! - [`actor`] — wallet identity and signed bundle construction
//! - [`combine`] — announcement-coupled atomic merge of multiple coins
//! - [`error`] — `WalletError`
//!
//! Actors are pure with respect to the ledger: they build and sign bundles
//! but never submit them. Submission, time, and coin-set refresh belong to
//! the session driver in `kelp-sim`.

pub mod actor;
pub mod coin_selection;
pub mod combine;
pub mod error;
pub mod keys;

pub use actor::Actor;
pub use coin_selection::{CoinSelection, select_coins};
pub use combine::{combine_bundle, predict_merged_coin};
pub use error::WalletError;
pub use keys::{KeyStore, Seed};
