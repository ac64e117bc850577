//! Atomic merge of multiple coins into one.
//!
//! The ledger only evaluates spends independently — there is no native
//! multi-input transaction at the coin level. To merge N coins atomically,
//! the bundle couples them with an announcement: the last input publishes
//! an announcement keyed by the merged coin's predicted id and creates the
//! merged output; every other input's sole condition asserts that
//! announcement. A partial bundle can therefore never validate: the
//! asserting spends are worthless without the announcing spend, and the
//! bundle itself commits all-or-nothing.

use tracing::debug;

use kelp_core::types::{
    AggregateSignature, Coin, CoinSpend, Condition, Hash256, SpendBundle, announcement_id,
};

use crate::actor::Actor;
use crate::error::WalletError;

/// The coin that merging `coins` back to `actor` would create: parented by
/// the last input, locked to the actor, worth the summed value.
///
/// A prediction, not a ledger fact, until the bundle commits.
pub fn predict_merged_coin(actor: &Actor, coins: &[Coin]) -> Result<Coin, WalletError> {
    if coins.len() < 2 {
        return Err(WalletError::CombineTooFew(coins.len()));
    }
    let total = coins
        .iter()
        .try_fold(0u64, |acc, c| acc.checked_add(c.amount))
        .ok_or(WalletError::ValueOverflow)?;
    let last = coins.last().expect("len checked above");
    Ok(Coin::new(last.coin_id(), actor.puzzle_hash(), total))
}

/// Build the signed all-or-nothing merge bundle for `coins`.
///
/// Each spend is signed individually with the actor's key and the
/// signatures aggregated in spend order. The caller's invariant after a
/// committed push: balance unchanged, coin count down by `coins.len() − 1`.
pub fn combine_bundle(
    actor: &Actor,
    coins: &[Coin],
    challenge: &Hash256,
) -> Result<SpendBundle, WalletError> {
    let merged = predict_merged_coin(actor, coins)?;
    let last = coins.last().expect("len checked by prediction");
    let announcement = announcement_id(&last.coin_id(), merged.coin_id().as_bytes());

    let mut spends = Vec::with_capacity(coins.len());
    let mut signatures = Vec::with_capacity(coins.len());

    for coin in &coins[..coins.len() - 1] {
        let spend = CoinSpend {
            coin: coin.clone(),
            puzzle: actor.puzzle().clone(),
            solution: vec![Condition::AssertAnnouncement {
                announcement_id: announcement,
            }],
        };
        signatures.push(actor.sign_spend(&spend, challenge)?);
        spends.push(spend);
    }

    let last_spend = CoinSpend {
        coin: last.clone(),
        puzzle: actor.puzzle().clone(),
        solution: vec![
            Condition::CreateAnnouncement {
                message: merged.coin_id().as_bytes().to_vec(),
            },
            Condition::CreateCoin {
                puzzle_hash: merged.puzzle_hash,
                amount: merged.amount,
            },
        ],
    };
    signatures.push(actor.sign_spend(&last_spend, challenge)?);
    spends.push(last_spend);

    debug!(
        actor = actor.name(),
        inputs = coins.len(),
        merged = %merged.coin_id(),
        amount = merged.amount,
        "built combine bundle"
    );

    Ok(SpendBundle::new(
        spends,
        AggregateSignature::aggregate(signatures),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelp_core::crypto::{KeyPair, verify_spend};

    fn test_actor() -> Actor {
        Actor::new("alice", KeyPair::from_secret_bytes([1u8; 32]))
    }

    fn coins_for(actor: &Actor, amounts: &[u64]) -> Vec<Coin> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| Coin::new(Hash256([i as u8 + 1; 32]), actor.puzzle_hash(), a))
            .collect()
    }

    #[test]
    fn prediction_sums_and_parents_on_last() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[10, 10, 10]);
        let merged = predict_merged_coin(&actor, &coins).unwrap();
        assert_eq!(merged.amount, 30);
        assert_eq!(merged.parent_coin_id, coins[2].coin_id());
        assert_eq!(merged.puzzle_hash, actor.puzzle_hash());
    }

    #[test]
    fn prediction_rejects_single_coin() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[10]);
        assert_eq!(
            predict_merged_coin(&actor, &coins).unwrap_err(),
            WalletError::CombineTooFew(1)
        );
    }

    #[test]
    fn prediction_rejects_overflow() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[u64::MAX, 1]);
        assert_eq!(
            predict_merged_coin(&actor, &coins).unwrap_err(),
            WalletError::ValueOverflow
        );
    }

    #[test]
    fn bundle_shape_matches_protocol() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[10, 10, 10]);
        let merged = predict_merged_coin(&actor, &coins).unwrap();
        let bundle = combine_bundle(&actor, &coins, &Hash256([0xCC; 32])).unwrap();

        assert_eq!(bundle.coin_spends.len(), 3);
        assert_eq!(bundle.aggregated_signature.len(), 3);

        let expected = announcement_id(&coins[2].coin_id(), merged.coin_id().as_bytes());
        for spend in &bundle.coin_spends[..2] {
            assert_eq!(
                spend.solution,
                vec![Condition::AssertAnnouncement {
                    announcement_id: expected
                }]
            );
            // Value contributed without an independent instruction.
            assert!(spend.additions().is_empty());
        }

        let last = &bundle.coin_spends[2];
        assert_eq!(last.solution.len(), 2);
        assert_eq!(last.additions(), vec![merged.clone()]);
        assert!(matches!(
            &last.solution[0],
            Condition::CreateAnnouncement { message } if message == merged.coin_id().as_bytes()
        ));
    }

    #[test]
    fn bundle_conserves_value() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[7, 5, 3, 9]);
        let bundle = combine_bundle(&actor, &coins, &Hash256([0xCC; 32])).unwrap();
        assert_eq!(bundle.total_input_value(), Some(24));
        assert_eq!(bundle.total_output_value(), Some(24));
    }

    #[test]
    fn every_spend_is_signed() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[10, 20]);
        let challenge = Hash256([0xCC; 32]);
        let bundle = combine_bundle(&actor, &coins, &challenge).unwrap();

        for (i, spend) in bundle.coin_spends.iter().enumerate() {
            verify_spend(
                &actor.public_key(),
                &challenge,
                spend,
                bundle.aggregated_signature.get(i).unwrap(),
            )
            .unwrap();
        }
    }

    #[test]
    fn two_coin_merge_has_one_asserter() {
        let actor = test_actor();
        let coins = coins_for(&actor, &[1, 2]);
        let bundle = combine_bundle(&actor, &coins, &Hash256([0xCC; 32])).unwrap();
        assert_eq!(bundle.coin_spends.len(), 2);
        assert_eq!(bundle.additions().len(), 1);
        assert_eq!(bundle.additions()[0].amount, 3);
    }
}
