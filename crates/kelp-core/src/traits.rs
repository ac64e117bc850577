//! Trait interfaces between the Kelp crates.
//!
//! [`LedgerService`] is the boundary to the external ledger: it validates
//! and commits spend bundles, answers point queries, and advances simulated
//! time. `kelp-sim` provides the in-memory implementation; wallets never
//! talk to it directly — the session does.

use crate::error::RejectReason;
use crate::types::{Coin, Hash256, SpendBundle};

/// Coins created and destroyed by one committed production step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepEffects {
    /// Coins created by the step (transaction outputs plus issuance).
    pub created: Vec<Coin>,
    /// Coins consumed by the step.
    pub destroyed: Vec<Coin>,
}

/// The ledger boundary consumed by the session driver.
///
/// One bundle may be staged at a time: [`submit`](Self::submit) validates
/// and stages, [`advance_step`](Self::advance_step) commits the staged
/// bundle (if any) and mints the step's issuance.
pub trait LedgerService: Send + Sync {
    /// Validate a spend bundle and stage it for the next step.
    ///
    /// Rejection leaves the ledger untouched; no coins are considered
    /// consumed or created.
    fn submit(&mut self, bundle: &SpendBundle) -> Result<(), RejectReason>;

    /// Commit the staged bundle (if any), mint the step reward to
    /// `reward_puzzle_hash`, and advance one step.
    fn advance_step(&mut self, reward_puzzle_hash: Hash256) -> StepEffects;

    /// All currently-unspent coins locked by `puzzle_hash`, in coin-id
    /// order.
    fn unspent_by_puzzle_hash(&self, puzzle_hash: &Hash256) -> Vec<Coin>;

    /// Number of committed steps.
    fn height(&self) -> u64;

    /// Release ledger resources. Idempotent.
    fn close(&mut self);
}
