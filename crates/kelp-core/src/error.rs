//! Error types shared across the Kelp crates.

use thiserror::Error;

use crate::types::Hash256;

/// Cryptographic failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes do not decode to a valid Ed25519 point.
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Signature bytes have the wrong shape.
    #[error("invalid signature bytes")]
    InvalidSignature,

    /// Signature does not verify against the expected key and message.
    #[error("signature verification failed")]
    VerificationFailed,

    /// Canonical encoding failure.
    #[error("serialization: {0}")]
    Serialization(String),
}

/// Address encoding and parsing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("unknown network prefix: {0}")]
    UnknownNetwork(String),
    #[error("missing separator")]
    MissingSeparator,
    #[error("mixed-case address")]
    MixedCase,
    #[error("invalid character: {0}")]
    InvalidCharacter(char),
    #[error("invalid checksum")]
    InvalidChecksum,
    #[error("invalid payload length")]
    InvalidLength,
    #[error("invalid address version: {0}")]
    InvalidVersion(u8),
    #[error("invalid padding bits")]
    InvalidPadding,
}

/// Why the ledger refused a spend bundle.
///
/// Rejections are an expected outcome of submitting a transaction (for
/// example losing a race against another spend of the same coin), so they
/// travel as data in push results rather than as `Err` values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Bundle contains no spends.
    #[error("empty spend bundle")]
    EmptyBundle,

    /// Aggregate signature arity does not match the spend count.
    #[error("signature count {got} does not match spend count {expected}")]
    SignatureCountMismatch { got: usize, expected: usize },

    /// The same coin appears in two spends of one bundle.
    #[error("duplicate spend of coin {0}")]
    DuplicateSpend(Hash256),

    /// The referenced coin was never created.
    #[error("unknown coin {0}")]
    UnknownCoin(Hash256),

    /// The referenced coin was already consumed.
    #[error("coin {0} already spent")]
    AlreadySpent(Hash256),

    /// Puzzle reveal does not hash to the coin's puzzle hash.
    #[error("puzzle reveal does not match puzzle hash of coin {0}")]
    PuzzleMismatch(Hash256),

    /// Spend signature failed verification.
    #[error("invalid signature for coin {0}")]
    InvalidSignature(Hash256),

    /// An asserted announcement is not created anywhere in the bundle.
    #[error("asserted announcement {0} not found in bundle")]
    MissingAnnouncement(Hash256),

    /// A created coin would collide with one that already exists (or with
    /// another created in the same bundle).
    #[error("duplicate creation of coin {0}")]
    DuplicateCreation(Hash256),

    /// Bundle would create more value than it consumes.
    #[error("created value {created} exceeds spent value {spent}")]
    ValueExceeded { created: u64, spent: u64 },

    /// Arithmetic overflow while totalling values.
    #[error("value overflow")]
    ValueOverflow,

    /// A bundle is already staged and not yet committed.
    #[error("a transaction is already pending")]
    TxPending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reject_reasons() {
        let r = RejectReason::AlreadySpent(Hash256([0xAA; 32]));
        assert!(r.to_string().starts_with("coin aaaa"));

        let r = RejectReason::ValueExceeded {
            created: 10,
            spent: 5,
        };
        assert_eq!(r.to_string(), "created value 10 exceeds spent value 5");

        let r = RejectReason::SignatureCountMismatch {
            got: 1,
            expected: 2,
        };
        assert_eq!(r.to_string(), "signature count 1 does not match spend count 2");
    }

    #[test]
    fn display_crypto_error() {
        assert_eq!(
            CryptoError::VerificationFailed.to_string(),
            "signature verification failed"
        );
    }

    #[test]
    fn reject_reason_clone_and_eq() {
        let r = RejectReason::EmptyBundle;
        assert_eq!(r.clone(), r);
    }
}
