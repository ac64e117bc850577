//! End-to-end wallet operation scenarios.
//!
//! Each test drives a full session: farm funds, construct and push spends,
//! and check balances against ledger truth after the post-step refresh.

use kelp_sim::{PushResult, SpendConfig, SpendTarget};
use kelp_tests::helpers::*;

#[test]
fn give_transfers_value_and_returns_change() {
    let (mut session, alice, bob) = setup();
    assert_eq!(session.balance(alice).unwrap(), 2 * TEST_REWARD);
    assert_eq!(session.balance(bob).unwrap(), 0);

    let result = session.give_kelp(alice, bob, 10).unwrap();
    assert!(result.is_committed());

    assert_eq!(session.balance(alice).unwrap(), 2 * TEST_REWARD - 10);
    assert_eq!(session.balance(bob).unwrap(), 10);
    session.close();
}

#[test]
fn give_more_than_single_coin_merges_first() {
    let (mut session, alice, bob) = setup();
    // Alice holds two coins of TEST_REWARD each; sending more than one
    // coin's worth forces a combine before the transfer.
    let amount = TEST_REWARD + 500;
    session.give_kelp(alice, bob, amount).unwrap();

    assert_eq!(session.balance(bob).unwrap(), amount);
    assert_eq!(session.balance(alice).unwrap(), 2 * TEST_REWARD - amount);
    session.close();
}

#[test]
fn choose_coin_returns_single_covering_coin_directly() {
    let (mut session, alice, bob) = setup();
    fund_coins(&mut session, alice, bob, &[5, 40]);

    let height_before = session.height();
    let coin = session.choose_coin(bob, 10).unwrap();
    // The 40-mote coin suffices alone; no combine was pushed.
    assert_eq!(coin.amount, 40);
    assert_eq!(session.height(), height_before);
    session.close();
}

#[test]
fn choose_coin_combines_three_tens_for_twenty_five() {
    let (mut session, alice, bob) = setup();
    fund_coins(&mut session, alice, bob, &[10, 10, 10]);
    assert_eq!(session.actor(bob).unwrap().coin_count(), 3);

    let height_before = session.height();
    let coin = session.choose_coin(bob, 25).unwrap();

    // One combine transaction merged all three coins into one of 30.
    assert_eq!(coin.amount, 30);
    assert_eq!(session.height(), height_before + 1);
    assert_eq!(session.balance(bob).unwrap(), 30);
    assert_eq!(session.actor(bob).unwrap().coin_count(), 1);
    session.close();
}

#[test]
fn default_spend_pays_one_mote_to_self() {
    let (mut session, alice, bob) = setup();
    let coins = fund_coins(&mut session, alice, bob, &[50]);

    // No remainder recipient: the excess is dropped as an implicit fee.
    let result = session
        .spend_coin(bob, &coins[0], SpendConfig::default())
        .unwrap();
    assert!(result.is_committed());
    assert_eq!(session.balance(bob).unwrap(), 1);
    session.close();
}

#[test]
fn spend_with_remainder_conserves_value() {
    let (mut session, alice, bob) = setup();
    let coins = fund_coins(&mut session, alice, bob, &[50]);

    let result = session
        .spend_coin(
            bob,
            &coins[0],
            SpendConfig::value(20)
                .to(SpendTarget::Actor(alice))
                .remainder_to(SpendTarget::Actor(bob)),
        )
        .unwrap();
    assert!(result.is_committed());

    assert_eq!(session.balance(bob).unwrap(), 30);
    assert_eq!(session.balance(alice).unwrap(), 2 * TEST_REWARD - 50 + 20);
    session.close();
}

#[test]
fn double_spend_is_rejected_and_leaves_balances_alone() {
    let (mut session, alice, bob) = setup();
    let coins = fund_coins(&mut session, alice, bob, &[50]);
    let coin = coins[0].clone();

    // Build a replay bundle *before* the coin is spent.
    let challenge = session.config().genesis_challenge;
    let replay = session
        .actor(bob)
        .unwrap()
        .pay_spend(&coin, &[(foreign_puzzle_hash(0x66), 50)], &challenge)
        .unwrap();

    // First spend commits.
    let result = session
        .spend_coin(
            bob,
            &coin,
            SpendConfig::value(50).to(SpendTarget::Actor(alice)),
        )
        .unwrap();
    assert!(result.is_committed());

    let alice_before = session.balance(alice).unwrap();
    let bob_before = session.balance(bob).unwrap();
    let height_before = session.height();

    // Replay of the consumed coin is refused as data, not an error.
    let result = session.push_tx(replay);
    assert!(matches!(result, PushResult::Rejected(_)));

    assert_eq!(session.balance(alice).unwrap(), alice_before);
    assert_eq!(session.balance(bob).unwrap(), bob_before);
    assert_eq!(session.height(), height_before, "rejection must not advance time");
    session.close();
}

#[test]
fn issuance_accounting_holds_across_operations() {
    let (mut session, alice, bob) = setup();
    fund_coins(&mut session, alice, bob, &[10, 10, 10]);
    session.choose_coin(bob, 25).unwrap();
    session.give_kelp(bob, alice, 7).unwrap();
    session.farm_block(None).unwrap();

    // Every mote in actor hands was minted by a step; nothing here burns.
    let minted = session.height() * TEST_REWARD;
    assert_eq!(total_actor_balance(&session, &[alice, bob]), minted);
    session.close();
}

#[test]
fn skip_time_credits_one_beneficiary() {
    let (mut session, alice, _bob) = setup();
    let before = session.balance(alice).unwrap();
    let step_secs = session.config().block_time_secs;

    session
        .skip_time(std::time::Duration::from_secs(step_secs * 5), Some(alice))
        .unwrap();
    assert_eq!(
        session.balance(alice).unwrap(),
        before + 5 * TEST_REWARD
    );
    session.close();
}
