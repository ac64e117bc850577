//! Simulator configuration.

use serde::{Deserialize, Serialize};

use kelp_core::constants::{DEFAULT_BLOCK_REWARD, DEFAULT_BLOCK_TIME_SECS, GENESIS_CHALLENGE};
use kelp_core::types::Hash256;

/// Configuration for one simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Reward minted per production step, in motes.
    pub block_reward: u64,
    /// Seconds of simulated time per production step.
    pub block_time_secs: u64,
    /// Domain parameter spend signatures commit to.
    pub genesis_challenge: Hash256,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            block_reward: DEFAULT_BLOCK_REWARD,
            block_time_secs: DEFAULT_BLOCK_TIME_SECS,
            genesis_challenge: GENESIS_CHALLENGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reward_and_interval() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.block_reward, DEFAULT_BLOCK_REWARD);
        assert_eq!(cfg.block_time_secs, DEFAULT_BLOCK_TIME_SECS);
        assert_eq!(cfg.genesis_challenge, GENESIS_CHALLENGE);
    }

    #[test]
    fn json_round_trip() {
        let cfg = SimConfig {
            block_reward: 123,
            block_time_secs: 7,
            genesis_challenge: Hash256([0x42; 32]),
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.block_reward, 123);
        assert_eq!(back.block_time_secs, 7);
        assert_eq!(back.genesis_challenge, Hash256([0x42; 32]));
    }
}
