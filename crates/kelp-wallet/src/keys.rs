//! Master seed and deterministic key derivation.
//!
//! Child Ed25519 keypairs are derived from a 32-byte master seed with
//! BLAKE3's keyed derivation function: index → keypair, deterministic and
//! recoverable from the seed alone.

use std::collections::HashMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use kelp_core::crypto::KeyPair;

/// BLAKE3 KDF context for child key derivation.
const KDF_CONTEXT: &str = "kelp-wallet-key-derivation-v1";

/// A 32-byte master seed, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; 32],
}

impl Seed {
    /// Generate a random seed from the OS cryptographic RNG.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create a seed from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl Clone for Seed {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes }
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// Deterministic index → keypair derivation from a master seed.
///
/// This is the key-management boundary: callers treat the returned keypairs
/// as opaque signing handles.
pub struct KeyStore {
    seed: Seed,
    cache: HashMap<u32, KeyPair>,
}

impl KeyStore {
    /// Create a key store over a master seed.
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            cache: HashMap::new(),
        }
    }

    /// Derive the keypair for a child index.
    pub fn derive(&mut self, index: u32) -> &KeyPair {
        self.cache
            .entry(index)
            .or_insert_with(|| derive_child_keypair(&self.seed, index))
    }

    /// Number of keypairs derived so far.
    pub fn derived_count(&self) -> usize {
        self.cache.len()
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("derived", &self.cache.len())
            .finish()
    }
}

/// Derive a child keypair: BLAKE3-KDF over `seed ‖ index_le`.
fn derive_child_keypair(seed: &Seed, index: u32) -> KeyPair {
    let mut material = [0u8; 36];
    material[..32].copy_from_slice(seed.as_bytes());
    material[32..].copy_from_slice(&index.to_le_bytes());
    let secret = blake3::derive_key(KDF_CONTEXT, &material);
    KeyPair::from_secret_bytes(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let mut a = KeyStore::new(Seed::from_bytes([1u8; 32]));
        let mut b = KeyStore::new(Seed::from_bytes([1u8; 32]));
        assert_eq!(a.derive(0).public_key(), b.derive(0).public_key());
        assert_eq!(a.derive(7).public_key(), b.derive(7).public_key());
    }

    #[test]
    fn distinct_indexes_give_distinct_keys() {
        let mut ks = KeyStore::new(Seed::from_bytes([2u8; 32]));
        let pk0 = ks.derive(0).public_key();
        let pk1 = ks.derive(1).public_key();
        assert_ne!(pk0, pk1);
    }

    #[test]
    fn distinct_seeds_give_distinct_keys() {
        let mut a = KeyStore::new(Seed::from_bytes([3u8; 32]));
        let mut b = KeyStore::new(Seed::from_bytes([4u8; 32]));
        assert_ne!(a.derive(0).public_key(), b.derive(0).public_key());
    }

    #[test]
    fn derive_caches() {
        let mut ks = KeyStore::new(Seed::generate());
        ks.derive(0);
        ks.derive(0);
        ks.derive(1);
        assert_eq!(ks.derived_count(), 2);
    }

    #[test]
    fn seed_debug_is_redacted() {
        let seed = Seed::from_bytes([5u8; 32]);
        assert!(format!("{seed:?}").contains("REDACTED"));
    }
}
