//! In-memory coin-set ledger.
//!
//! The simulator behind the [`LedgerService`] boundary: a coin-record table
//! with no persistence. [`Ledger::submit`] validates a bundle against the
//! current unspent set and stages it; [`Ledger::advance_step`] commits the
//! staged bundle (spending its inputs, creating its outputs) and mints one
//! reward coin per step.
//!
//! Programs are opaque: the only evaluation rule is that a pay-to-public-key
//! reveal must carry a valid spend signature. For any other program shape
//! the emitted conditions are taken as given.

use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use kelp_core::crypto::verify_spend;
use kelp_core::error::RejectReason;
use kelp_core::traits::{LedgerService, StepEffects};
use kelp_core::types::{Coin, Condition, Hash256, SpendBundle, announcement_id};

use crate::config::SimConfig;

/// A coin's lifecycle on the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinRecord {
    /// The coin itself.
    pub coin: Coin,
    /// Step at which the coin was created.
    pub created_height: u64,
    /// Step at which the coin was spent, if it has been.
    pub spent_height: Option<u64>,
    /// Whether the coin is step issuance rather than a spend output.
    pub coinbase: bool,
}

impl CoinRecord {
    fn is_unspent(&self) -> bool {
        self.spent_height.is_none()
    }
}

/// In-memory ledger state: every coin ever created, keyed by coin id.
pub struct Ledger {
    config: SimConfig,
    records: HashMap<Hash256, CoinRecord>,
    pending: Option<SpendBundle>,
    height: u64,
}

impl Ledger {
    /// Create an empty ledger at height 0.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            pending: None,
            height: 0,
        }
    }

    /// Look up the full record for a coin id.
    pub fn coin_record(&self, coin_id: &Hash256) -> Option<&CoinRecord> {
        self.records.get(coin_id)
    }

    /// Number of coins ever created.
    pub fn coin_count(&self) -> usize {
        self.records.len()
    }

    /// Validate a bundle against the current unspent set.
    ///
    /// Ordering mirrors cheapest-check-first: structure, existence,
    /// reveals, signatures, announcements, then value accounting. The first
    /// failure rejects the whole bundle.
    fn validate(&self, bundle: &SpendBundle) -> Result<(), RejectReason> {
        if bundle.coin_spends.is_empty() {
            return Err(RejectReason::EmptyBundle);
        }
        if bundle.aggregated_signature.len() != bundle.coin_spends.len() {
            return Err(RejectReason::SignatureCountMismatch {
                got: bundle.aggregated_signature.len(),
                expected: bundle.coin_spends.len(),
            });
        }

        let mut spent_ids: HashSet<Hash256> = HashSet::new();
        for spend in &bundle.coin_spends {
            let coin_id = spend.coin.coin_id();
            if !spent_ids.insert(coin_id) {
                return Err(RejectReason::DuplicateSpend(coin_id));
            }
            match self.records.get(&coin_id) {
                None => return Err(RejectReason::UnknownCoin(coin_id)),
                Some(record) if !record.is_unspent() => {
                    return Err(RejectReason::AlreadySpent(coin_id));
                }
                Some(_) => {}
            }
            if spend.puzzle.puzzle_hash() != spend.coin.puzzle_hash {
                return Err(RejectReason::PuzzleMismatch(coin_id));
            }
        }

        for (i, spend) in bundle.coin_spends.iter().enumerate() {
            // Pay-to-public-key reveals must be signed by the embedded key.
            // Other programs are opaque; their conditions pass through.
            let Some(key) = spend.puzzle.public_key() else {
                continue;
            };
            let signature = bundle
                .aggregated_signature
                .get(i)
                .expect("arity checked above");
            if verify_spend(&key, &self.config.genesis_challenge, spend, signature).is_err() {
                return Err(RejectReason::InvalidSignature(spend.coin.coin_id()));
            }
        }

        let mut announced: HashSet<Hash256> = HashSet::new();
        for spend in &bundle.coin_spends {
            let coin_id = spend.coin.coin_id();
            for condition in &spend.solution {
                if let Condition::CreateAnnouncement { message } = condition {
                    announced.insert(announcement_id(&coin_id, message));
                }
            }
        }
        for spend in &bundle.coin_spends {
            for condition in &spend.solution {
                if let Condition::AssertAnnouncement { announcement_id } = condition {
                    if !announced.contains(announcement_id) {
                        return Err(RejectReason::MissingAnnouncement(*announcement_id));
                    }
                }
            }
        }

        let mut created_ids: HashSet<Hash256> = HashSet::new();
        for coin in bundle.additions() {
            let id = coin.coin_id();
            if !created_ids.insert(id) || self.records.contains_key(&id) {
                return Err(RejectReason::DuplicateCreation(id));
            }
        }

        let spent = bundle
            .total_input_value()
            .ok_or(RejectReason::ValueOverflow)?;
        let created = bundle
            .total_output_value()
            .ok_or(RejectReason::ValueOverflow)?;
        // Conservation: a bundle can never mint. Any shortfall is an
        // implicit fee absorbed by step issuance.
        if created > spent {
            return Err(RejectReason::ValueExceeded { created, spent });
        }

        Ok(())
    }
}

impl LedgerService for Ledger {
    fn submit(&mut self, bundle: &SpendBundle) -> Result<(), RejectReason> {
        if self.pending.is_some() {
            return Err(RejectReason::TxPending);
        }
        self.validate(bundle)?;
        debug!(
            spends = bundle.coin_spends.len(),
            "spend bundle validated and staged"
        );
        self.pending = Some(bundle.clone());
        Ok(())
    }

    fn advance_step(&mut self, reward_puzzle_hash: Hash256) -> StepEffects {
        self.height += 1;
        let mut effects = StepEffects::default();

        if let Some(bundle) = self.pending.take() {
            for spend in &bundle.coin_spends {
                let coin_id = spend.coin.coin_id();
                match self.records.get_mut(&coin_id) {
                    Some(record) => {
                        record.spent_height = Some(self.height);
                        effects.destroyed.push(record.coin.clone());
                    }
                    // Unreachable for a validated bundle; nothing changed
                    // between staging and commit on this single thread.
                    None => warn!(%coin_id, "staged spend references unknown coin"),
                }
                for coin in spend.additions() {
                    self.records.insert(
                        coin.coin_id(),
                        CoinRecord {
                            coin: coin.clone(),
                            created_height: self.height,
                            spent_height: None,
                            coinbase: false,
                        },
                    );
                    effects.created.push(coin);
                }
            }
        }

        let reward = Coin::new(
            reward_parent_id(self.height, &self.config.genesis_challenge),
            reward_puzzle_hash,
            self.config.block_reward,
        );
        self.records.insert(
            reward.coin_id(),
            CoinRecord {
                coin: reward.clone(),
                created_height: self.height,
                spent_height: None,
                coinbase: true,
            },
        );
        effects.created.push(reward);

        debug!(
            height = self.height,
            created = effects.created.len(),
            destroyed = effects.destroyed.len(),
            "step committed"
        );
        effects
    }

    fn unspent_by_puzzle_hash(&self, puzzle_hash: &Hash256) -> Vec<Coin> {
        let mut coins: Vec<Coin> = self
            .records
            .values()
            .filter(|r| r.is_unspent() && r.coin.puzzle_hash == *puzzle_hash)
            .map(|r| r.coin.clone())
            .collect();
        coins.sort_by_key(Coin::coin_id);
        coins
    }

    fn height(&self) -> u64 {
        self.height
    }

    fn close(&mut self) {
        self.records.clear();
        self.pending = None;
        debug!("ledger closed");
    }
}

/// Parent id for step issuance: `SHA-256(height_le ‖ genesis_challenge)`.
///
/// Deterministic per step, so reward coins at different heights never
/// collide even when paid to the same puzzle hash with the same amount.
fn reward_parent_id(height: u64, challenge: &Hash256) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(height.to_le_bytes());
    hasher.update(challenge.as_bytes());
    Hash256(hasher.finalize().into())
}
