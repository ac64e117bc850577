//! Ed25519 signing primitives and the spend signing hash.
//!
//! Every spend is signed over a **sighash** that commits to:
//! - the genesis challenge (domain parameter)
//! - the id of the coin being spent
//! - the canonical encoding of the emitted conditions
//!
//! The puzzle reveal is excluded — it is already bound through the coin's
//! puzzle hash. Aggregation is an ordered vector of per-spend signatures
//! (see [`AggregateSignature`](crate::types::AggregateSignature)); the
//! ledger verifies position `i` against spend `i`.

use ed25519_dalek::{Signer, Verifier};
use std::fmt;

use crate::error::CryptoError;
use crate::types::{CoinSpend, Condition, Hash256};

/// Ed25519 keypair for signing spends.
///
/// Wraps [`ed25519_dalek::SigningKey`]; the secret is zeroized on drop by
/// the underlying library. Use [`KeyPair::generate`] for random keys or
/// [`KeyPair::from_secret_bytes`] for deterministic derivation.
pub struct KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl KeyPair {
    /// Generate a random keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a keypair from 32-byte secret key material.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&bytes),
        }
    }

    /// Derive the public key from this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Raw secret key bytes. Handle with care.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign a message, returning the raw 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_secret_bytes(self.secret_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Ed25519 public key embedded in pay-to-public-key programs.
#[derive(Clone)]
pub struct PublicKey {
    verifying_key: ed25519_dalek::VerifyingKey,
}

impl PublicKey {
    /// Create a public key from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let vk = ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { verifying_key: vk })
    }

    /// Raw public key bytes (32 bytes).
    pub fn to_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Verify an Ed25519 signature on a message.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> Result<(), CryptoError> {
        let sig = ed25519_dalek::Signature::from_bytes(signature);
        self.verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

/// Canonical byte encoding of a condition list (bincode, standard config).
///
/// This is the encoding the sighash commits to; wallet and ledger must
/// agree on it exactly.
pub fn encode_conditions(conditions: &[Condition]) -> Result<Vec<u8>, CryptoError> {
    bincode::encode_to_vec(conditions, bincode::config::standard())
        .map_err(|e| CryptoError::Serialization(e.to_string()))
}

/// Compute the signing hash for one spend:
/// `BLAKE3(challenge ‖ coin_id ‖ encode(conditions))`.
pub fn spend_signing_hash(
    challenge: &Hash256,
    coin_id: &Hash256,
    solution_bytes: &[u8],
) -> Hash256 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(challenge.as_bytes());
    hasher.update(coin_id.as_bytes());
    hasher.update(solution_bytes);
    Hash256(hasher.finalize().into())
}

/// Sign a spend record with the given keypair.
pub fn sign_spend(
    keypair: &KeyPair,
    challenge: &Hash256,
    spend: &CoinSpend,
) -> Result<[u8; 64], CryptoError> {
    let solution_bytes = encode_conditions(&spend.solution)?;
    let sighash = spend_signing_hash(challenge, &spend.coin.coin_id(), &solution_bytes);
    Ok(keypair.sign(sighash.as_bytes()))
}

/// Verify a spend signature against the key that locks the coin.
pub fn verify_spend(
    key: &PublicKey,
    challenge: &Hash256,
    spend: &CoinSpend,
    signature: &[u8],
) -> Result<(), CryptoError> {
    let signature: [u8; 64] = signature
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let solution_bytes = encode_conditions(&spend.solution)?;
    let sighash = spend_signing_hash(challenge, &spend.coin.coin_id(), &solution_bytes);
    key.verify(sighash.as_bytes(), &signature)
}
