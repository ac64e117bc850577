//! Session setup and funding helpers shared by the scenario tests.

use kelp_core::types::{Coin, Hash256};
use kelp_sim::{ActorId, Session, SimConfig};

/// Step reward used by the scenario tests: small enough that balances stay
/// readable.
pub const TEST_REWARD: u64 = 1_000;

/// Config for scenario tests.
pub fn test_config() -> SimConfig {
    SimConfig {
        block_reward: TEST_REWARD,
        ..SimConfig::default()
    }
}

/// Create a session with two actors; alice starts with two step rewards.
pub fn setup() -> (Session, ActorId, ActorId) {
    let mut session = Session::new(test_config());
    let alice = session.add_actor("alice");
    let bob = session.add_actor("bob");
    session.farm_block(Some(alice)).expect("farm genesis funds");
    session.farm_block(Some(alice)).expect("farm genesis funds");
    (session, alice, bob)
}

/// Transfer each amount from `from` to `to` as its own transaction and
/// return the coins `to` received, in transfer order.
pub fn fund_coins(
    session: &mut Session,
    from: ActorId,
    to: ActorId,
    amounts: &[u64],
) -> Vec<Coin> {
    let to_puzzle_hash = session.actor(to).expect("known actor").puzzle_hash();
    amounts
        .iter()
        .map(|&amount| {
            let result = session.give_kelp(from, to, amount).expect("transfer");
            let mut received = result.additions_for(&to_puzzle_hash);
            assert_eq!(received.len(), 1, "expected exactly one coin per transfer");
            received.remove(0)
        })
        .collect()
}

/// Sum of balances across every actor including `nobody`: the value the
/// ledger has issued minus whatever has been paid to contracts or burned.
pub fn total_actor_balance(session: &Session, actors: &[ActorId]) -> u64 {
    let mut total = session
        .balance(session.nobody())
        .expect("nobody always exists");
    for &id in actors {
        total += session.balance(id).expect("known actor");
    }
    total
}

/// Shorthand for a puzzle hash nothing in the session controls.
pub fn foreign_puzzle_hash(tag: u8) -> Hash256 {
    Hash256([tag; 32])
}
