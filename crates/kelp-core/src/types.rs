//! Core coin-set types: coins, programs, conditions, spends, bundles.
//!
//! Value lives in [`Coin`]s — discrete, content-addressed units locked by
//! the hash of an opaque [`Program`]. A [`CoinSpend`] unlocks exactly one
//! coin and emits [`Condition`]s; a [`SpendBundle`] groups spends with one
//! aggregate signature and commits or fails as a unit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::PublicKey;
use crate::error::CryptoError;

/// A 32-byte hash value.
///
/// Used for coin ids, puzzle hashes, and announcement ids (all BLAKE3),
/// and for step/reward parent ids (SHA-256).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a Hash256 from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a Hash256 from a 64-character hex string (optionally 0x-prefixed).
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CryptoError::Serialization(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::Serialization("expected 32 bytes".into()))?;
        Ok(Self(bytes))
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A discrete, all-or-nothing-spendable unit of ledger value.
///
/// A coin's identity is the triple `(parent_coin_id, puzzle_hash, amount)`;
/// its id is a deterministic hash of those three fields (content-addressed,
/// never assigned). Immutable once created; consumed exactly once or never.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub struct Coin {
    /// Id of the coin whose spend created this one.
    pub parent_coin_id: Hash256,
    /// Hash of the program that locks this coin.
    pub puzzle_hash: Hash256,
    /// Value in motes.
    pub amount: u64,
}

impl Coin {
    /// Create a coin record from its identity triple.
    pub fn new(parent_coin_id: Hash256, puzzle_hash: Hash256, amount: u64) -> Self {
        Self {
            parent_coin_id,
            puzzle_hash,
            amount,
        }
    }

    /// Compute the coin id: BLAKE3 over `parent ‖ puzzle_hash ‖ amount_le`.
    pub fn coin_id(&self) -> Hash256 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.parent_coin_id.as_bytes());
        hasher.update(self.puzzle_hash.as_bytes());
        hasher.update(&self.amount.to_le_bytes());
        Hash256(hasher.finalize().into())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} motes)", self.coin_id(), self.amount)
    }
}

/// Tag byte marking a pay-to-public-key program.
const PAY_TO_PUBLIC_KEY_TAG: u8 = 0x01;

/// An opaque locking script, identified by the BLAKE3 hash of its bytes.
///
/// The engine never interprets program bytes; the only structure it knows
/// about is the pay-to-public-key form produced by
/// [`Program::pay_to_public_key`], whose embedded key the ledger uses to
/// check spend signatures.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub struct Program(Vec<u8>);

impl Program {
    /// Wrap arbitrary script bytes.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The standard actor locking program: a tagged Ed25519 public key.
    pub fn pay_to_public_key(key: &PublicKey) -> Self {
        let mut bytes = Vec::with_capacity(33);
        bytes.push(PAY_TO_PUBLIC_KEY_TAG);
        bytes.extend_from_slice(&key.to_bytes());
        Self(bytes)
    }

    /// Hash identifying this program (the coin-locking puzzle hash).
    pub fn puzzle_hash(&self) -> Hash256 {
        Hash256(blake3::hash(&self.0).into())
    }

    /// Extract the embedded public key from a pay-to-public-key program.
    ///
    /// Returns `None` for any other program shape, including byte strings
    /// that happen to start with the tag but do not carry a valid key.
    pub fn public_key(&self) -> Option<PublicKey> {
        if self.0.len() != 33 || self.0[0] != PAY_TO_PUBLIC_KEY_TAG {
            return None;
        }
        let bytes: [u8; 32] = self.0[1..].try_into().ok()?;
        PublicKey::from_bytes(&bytes).ok()
    }

    /// The raw script bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A non-actor locking script plus the domain parameter it was compiled
/// against. Not itself spendable; used to compute the puzzle hash for coins
/// it owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contract {
    program: Program,
    genesis_challenge: Hash256,
}

impl Contract {
    /// Create a contract from a compiled program and its domain parameter.
    pub fn new(program: Program, genesis_challenge: Hash256) -> Self {
        Self {
            program,
            genesis_challenge,
        }
    }

    /// The contract's locking-script hash.
    pub fn puzzle_hash(&self) -> Hash256 {
        self.program.puzzle_hash()
    }

    /// The compiled locking program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The domain parameter the program was compiled against.
    pub fn genesis_challenge(&self) -> Hash256 {
        self.genesis_challenge
    }

    /// The coin that spending `parent` for `amount` to this contract would
    /// create. A prediction, not a ledger fact, until the spend commits.
    pub fn predict_coin(&self, parent_coin_id: Hash256, amount: u64) -> Coin {
        Coin::new(parent_coin_id, self.puzzle_hash(), amount)
    }
}

/// One instruction emitted by a spend.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub enum Condition {
    /// Create a new coin locked to `puzzle_hash`, parented by the spent coin.
    CreateCoin { puzzle_hash: Hash256, amount: u64 },
    /// Publish an announcement other spends in the same bundle can assert.
    CreateAnnouncement { message: Vec<u8> },
    /// Require that an announcement with this id is created in the same
    /// bundle. The synchronization primitive behind atomic merges.
    AssertAnnouncement { announcement_id: Hash256 },
}

/// Id of an announcement published by `coin_id` with `message`.
pub fn announcement_id(coin_id: &Hash256, message: &[u8]) -> Hash256 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(coin_id.as_bytes());
    hasher.update(message);
    Hash256(hasher.finalize().into())
}

/// One spend record: the coin being consumed, the program that locks it,
/// and the conditions its evaluation produced.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct CoinSpend {
    /// The coin being consumed.
    pub coin: Coin,
    /// Reveal of the program whose hash locks the coin.
    pub puzzle: Program,
    /// Conditions this spend emits.
    pub solution: Vec<Condition>,
}

impl CoinSpend {
    /// Coins this spend creates, parented by the spent coin.
    pub fn additions(&self) -> Vec<Coin> {
        let parent = self.coin.coin_id();
        self.solution
            .iter()
            .filter_map(|c| match c {
                Condition::CreateCoin {
                    puzzle_hash,
                    amount,
                } => Some(Coin::new(parent, *puzzle_hash, *amount)),
                _ => None,
            })
            .collect()
    }
}

/// One Ed25519 signature per spend, in spend order.
///
/// Aggregation is concatenation: the ledger verifies signature `i` against
/// spend `i`. Kept opaque so a pairing-based scheme could replace it without
/// touching callers.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct AggregateSignature {
    signatures: Vec<Vec<u8>>,
}

impl AggregateSignature {
    /// Aggregate individual spend signatures, preserving order.
    pub fn aggregate<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = [u8; 64]>,
    {
        Self {
            signatures: parts.into_iter().map(|s| s.to_vec()).collect(),
        }
    }

    /// Number of aggregated signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no signatures have been aggregated.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// The signature covering spend `index`, if present.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.signatures.get(index).map(Vec::as_slice)
    }
}

/// An atomically-committed group of spend records plus one aggregate
/// signature. The ledger commits every spend or none.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct SpendBundle {
    /// Ordered spend records.
    pub coin_spends: Vec<CoinSpend>,
    /// One signature per spend, aggregated in spend order.
    pub aggregated_signature: AggregateSignature,
}

impl SpendBundle {
    /// Build a bundle from spends and their aggregated signature.
    pub fn new(coin_spends: Vec<CoinSpend>, aggregated_signature: AggregateSignature) -> Self {
        Self {
            coin_spends,
            aggregated_signature,
        }
    }

    /// Coins consumed by this bundle.
    pub fn removals(&self) -> Vec<Coin> {
        self.coin_spends.iter().map(|s| s.coin.clone()).collect()
    }

    /// Coins this bundle would create, across all spends.
    pub fn additions(&self) -> Vec<Coin> {
        self.coin_spends.iter().flat_map(|s| s.additions()).collect()
    }

    /// Sum of consumed coin values. `None` on overflow.
    pub fn total_input_value(&self) -> Option<u64> {
        self.coin_spends
            .iter()
            .try_fold(0u64, |acc, s| acc.checked_add(s.coin.amount))
    }

    /// Sum of created coin values. `None` on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.additions()
            .iter()
            .try_fold(0u64, |acc, c| acc.checked_add(c.amount))
    }
}
