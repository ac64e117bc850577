//! Actor (wallet) identity and spend construction.
//!
//! An [`Actor`] owns a fixed keypair, the pay-to-public-key program derived
//! from it, and the set of unspent coins currently locked to that program.
//! The coin set is replaced wholesale after every committed ledger step —
//! never patched incrementally — so it can't silently diverge from ledger
//! truth. Actors build and sign bundles; they never talk to the ledger
//! themselves (the session does).

use std::collections::BTreeMap;

use kelp_core::crypto::{self, KeyPair, PublicKey};
use kelp_core::types::{
    AggregateSignature, Coin, CoinSpend, Condition, Hash256, Program, SpendBundle,
};

use crate::coin_selection::{CoinSelection, select_coins};
use crate::error::WalletError;

/// An identity tracking its own unspent coins and a key pair.
pub struct Actor {
    name: String,
    keypair: KeyPair,
    puzzle: Program,
    puzzle_hash: Hash256,
    /// Unspent coins locked to `puzzle_hash`, keyed by coin id. A `BTreeMap`
    /// so iteration (and therefore coin selection) is deterministic.
    coins: BTreeMap<Hash256, Coin>,
}

impl Actor {
    /// Create an actor from a name (used in logs) and its signing keypair.
    pub fn new(name: impl Into<String>, keypair: KeyPair) -> Self {
        let puzzle = Program::pay_to_public_key(&keypair.public_key());
        let puzzle_hash = puzzle.puzzle_hash();
        Self {
            name: name.into(),
            keypair,
            puzzle,
            puzzle_hash,
            coins: BTreeMap::new(),
        }
    }

    /// The actor's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The actor's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// The actor's locking program.
    pub fn puzzle(&self) -> &Program {
        &self.puzzle
    }

    /// Hash of the actor's locking program.
    pub fn puzzle_hash(&self) -> Hash256 {
        self.puzzle_hash
    }

    /// Sum of the actor's unspent coin values, in motes.
    pub fn balance(&self) -> u64 {
        self.coins.values().map(|c| c.amount).sum()
    }

    /// Number of unspent coins.
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Iterate the actor's unspent coins in coin-id order.
    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.values()
    }

    /// Look up an unspent coin by id.
    pub fn coin(&self, id: &Hash256) -> Option<&Coin> {
        self.coins.get(id)
    }

    /// Replace the coin set wholesale with the ledger's current view.
    pub fn replace_coins(&mut self, coins: Vec<Coin>) {
        debug_assert!(
            coins.iter().all(|c| c.puzzle_hash == self.puzzle_hash),
            "refresh handed a coin not locked to this actor"
        );
        self.coins = coins.into_iter().map(|c| (c.coin_id(), c)).collect();
    }

    /// Select unspent coins covering `target` motes.
    pub fn select_coins(&self, target: u64) -> Result<CoinSelection, WalletError> {
        select_coins(self.coins.values(), target)
    }

    /// Sign one spend record with the actor's key.
    pub fn sign_spend(
        &self,
        spend: &CoinSpend,
        challenge: &Hash256,
    ) -> Result<[u8; 64], WalletError> {
        Ok(crypto::sign_spend(&self.keypair, challenge, spend)?)
    }

    /// Build a signed single-spend bundle emitting the given conditions.
    ///
    /// The escape hatch for non-standard interactions: the conditions are
    /// passed through verbatim.
    pub fn spend_with_solution(
        &self,
        coin: &Coin,
        solution: Vec<Condition>,
        challenge: &Hash256,
    ) -> Result<SpendBundle, WalletError> {
        let spend = CoinSpend {
            coin: coin.clone(),
            puzzle: self.puzzle.clone(),
            solution,
        };
        let signature = self.sign_spend(&spend, challenge)?;
        Ok(SpendBundle::new(
            vec![spend],
            AggregateSignature::aggregate([signature]),
        ))
    }

    /// Build a signed single-spend bundle paying `(puzzle_hash, amount)`
    /// outputs from `coin`.
    pub fn pay_spend(
        &self,
        coin: &Coin,
        payments: &[(Hash256, u64)],
        challenge: &Hash256,
    ) -> Result<SpendBundle, WalletError> {
        let solution = payments
            .iter()
            .map(|&(puzzle_hash, amount)| Condition::CreateCoin {
                puzzle_hash,
                amount,
            })
            .collect();
        self.spend_with_solution(coin, solution, challenge)
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("puzzle_hash", &self.puzzle_hash)
            .field("coins", &self.coins.len())
            .field("balance", &self.balance())
            .finish()
    }
}
