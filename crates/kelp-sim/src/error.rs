//! Session error types.

use thiserror::Error;

use kelp_core::error::RejectReason;
use kelp_wallet::WalletError;

use crate::session::ActorId;

/// Errors surfaced by session operations.
///
/// These are fail-fast programmer errors plus wallet-side failures. A
/// ledger rejection of a caller-supplied bundle is *not* an error — it
/// comes back as [`PushResult::Rejected`](crate::session::PushResult) — but
/// a rejected *internal* combine aborts the operation that needed it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The actor id does not belong to this session.
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),

    /// A raw solution was combined with value-transfer options.
    #[error("conflicting spend options: raw solution alongside recipient or remainder")]
    ConflictingSpendOptions,

    /// An internally-issued combine transaction was rejected by the ledger.
    #[error("combine transaction rejected: {0}")]
    CombineRejected(RejectReason),

    /// Coin selection or spend construction failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_combine_rejected() {
        let e = SessionError::CombineRejected(RejectReason::EmptyBundle);
        assert_eq!(
            e.to_string(),
            "combine transaction rejected: empty spend bundle"
        );
    }

    #[test]
    fn wallet_error_converts() {
        let e: SessionError = WalletError::NoCoins.into();
        assert_eq!(e, SessionError::Wallet(WalletError::NoCoins));
    }
}
