//! Protocol constants. All monetary values are in motes (1 KELP = 10^12 motes).

use crate::types::Hash256;

/// Number of motes per KELP.
pub const COIN: u64 = 1_000_000_000_000;

/// Reward minted by each production step, in motes.
pub const DEFAULT_BLOCK_REWARD: u64 = 2 * COIN;

/// Seconds of simulated time that pass per production step.
pub const DEFAULT_BLOCK_TIME_SECS: u64 = 20;

/// Domain parameter every spend signature commits to.
///
/// A bundle signed against one challenge never validates against a ledger
/// configured with a different one.
pub const GENESIS_CHALLENGE: Hash256 = Hash256(*b"kelp-simulator-genesis-challenge");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_is_one_trillion_motes() {
        assert_eq!(COIN, 1_000_000_000_000);
    }

    #[test]
    fn default_reward_is_two_kelp() {
        assert_eq!(DEFAULT_BLOCK_REWARD, 2 * COIN);
    }

    #[test]
    fn genesis_challenge_is_nonzero() {
        assert!(!GENESIS_CHALLENGE.is_zero());
    }
}
