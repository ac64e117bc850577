//! Streaming greedy coin selection.
//!
//! Picks a small-cardinality subset of candidate coins whose summed value
//! covers a target, in a single online pass: keep a list sorted by
//! descending amount, and after each insertion evict the smallest kept coin
//! for as long as the remainder still covers the target.
//!
//! The eviction policy is greedy, not globally optimal — it can retain more
//! (larger) coins than a strictly minimal covering subset would. That shape
//! is load-bearing: it decides which coins get merged downstream, so it is
//! preserved as-is.

use kelp_core::types::Coin;

use crate::error::WalletError;

/// Result of coin selection: the kept coins and their summed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    /// Selected coins, sorted by descending amount.
    pub coins: Vec<Coin>,
    /// Total value of the selected coins, in motes.
    pub total: u64,
}

/// Select coins covering `target` motes.
///
/// Candidates are consumed in iteration order; the algorithm is online, so
/// the order is observable. A single candidate whose amount already meets
/// the target short-circuits the pass and is returned alone. Among equal
/// amounts, earlier-seen coins sort closer to the front.
///
/// # Errors
///
/// [`WalletError::InsufficientFunds`] when the candidates cannot cover the
/// target; [`WalletError::ValueOverflow`] if the running total overflows.
pub fn select_coins<'a, I>(candidates: I, target: u64) -> Result<CoinSelection, WalletError>
where
    I: IntoIterator<Item = &'a Coin>,
{
    let mut kept: Vec<Coin> = Vec::new();
    let mut total: u64 = 0;

    for coin in candidates {
        if coin.amount >= target {
            return Ok(CoinSelection {
                total: coin.amount,
                coins: vec![coin.clone()],
            });
        }

        // Stable insert: equal amounts keep their arrival order.
        let at = kept.partition_point(|c| c.amount >= coin.amount);
        kept.insert(at, coin.clone());
        total = total
            .checked_add(coin.amount)
            .ok_or(WalletError::ValueOverflow)?;

        while let Some(smallest) = kept.last() {
            let without = total - smallest.amount;
            if without >= target {
                total = without;
                kept.pop();
            } else {
                break;
            }
        }
    }

    if total >= target {
        Ok(CoinSelection { coins: kept, total })
    } else {
        Err(WalletError::InsufficientFunds {
            have: total,
            need: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelp_core::types::Hash256;
    use proptest::prelude::*;

    /// Coin with a distinct parent so equal amounts still have unique ids.
    fn coin(tag: u8, amount: u64) -> Coin {
        Coin::new(Hash256([tag; 32]), Hash256([0xAA; 32]), amount)
    }

    #[test]
    fn three_tens_cover_twenty_five() {
        let coins = vec![coin(1, 10), coin(2, 10), coin(3, 10)];
        let sel = select_coins(&coins, 25).unwrap();
        // 30 − 10 = 20 < 25, so nothing can be dropped.
        assert_eq!(sel.coins.len(), 3);
        assert_eq!(sel.total, 30);
    }

    #[test]
    fn single_large_coin_short_circuits() {
        let coins = vec![coin(1, 5), coin(2, 40)];
        let sel = select_coins(&coins, 10).unwrap();
        assert_eq!(sel.coins.len(), 1);
        assert_eq!(sel.coins[0].amount, 40);
        assert_eq!(sel.total, 40);
    }

    #[test]
    fn exact_single_coin_matches_target() {
        let coins = vec![coin(1, 25)];
        let sel = select_coins(&coins, 25).unwrap();
        assert_eq!(sel.coins.len(), 1);
        assert_eq!(sel.total, 25);
    }

    #[test]
    fn evicts_small_coins_once_covered() {
        // 3 + 4 + 9 → after 9 arrives, total 16; dropping 3 leaves 13 ≥ 12,
        // dropping 4 leaves 9 < 12.
        let coins = vec![coin(1, 3), coin(2, 4), coin(3, 9)];
        let sel = select_coins(&coins, 12).unwrap();
        assert_eq!(sel.total, 13);
        let amounts: Vec<u64> = sel.coins.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![9, 4]);
    }

    #[test]
    fn insufficient_funds_reports_totals() {
        let coins = vec![coin(1, 5), coin(2, 6)];
        let err = select_coins(&coins, 50).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientFunds {
                have: 11,
                need: 50
            }
        );
    }

    #[test]
    fn empty_candidates_are_insufficient() {
        let coins: Vec<Coin> = vec![];
        let err = select_coins(&coins, 1).unwrap_err();
        assert_eq!(err, WalletError::InsufficientFunds { have: 0, need: 1 });
    }

    #[test]
    fn equal_amounts_keep_arrival_order() {
        let coins = vec![coin(1, 10), coin(2, 10), coin(3, 10), coin(4, 10)];
        let sel = select_coins(&coins, 40).unwrap();
        let tags: Vec<u8> = sel.coins.iter().map(|c| c.parent_coin_id.0[0]).collect();
        assert_eq!(tags, vec![1, 2, 3, 4]);
    }

    #[test]
    fn result_is_sorted_descending() {
        let coins = vec![coin(1, 3), coin(2, 8), coin(3, 5), coin(4, 2)];
        let sel = select_coins(&coins, 18).unwrap();
        let amounts: Vec<u64> = sel.coins.iter().map(|c| c.amount).collect();
        let mut sorted = amounts.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(amounts, sorted);
    }

    #[test]
    fn overflow_is_reported() {
        let coins = vec![coin(1, u64::MAX - 1), coin(2, u64::MAX - 1)];
        let err = select_coins(&coins, u64::MAX).unwrap_err();
        assert_eq!(err, WalletError::ValueOverflow);
    }

    proptest! {
        /// Whenever the candidate total covers the target, selection
        /// succeeds, covers the target, and is greedily minimal: dropping
        /// its smallest member takes it below the target.
        #[test]
        fn covers_and_is_greedily_minimal(
            amounts in prop::collection::vec(1u64..10_000, 1..40),
            target in 1u64..100_000,
        ) {
            let coins: Vec<Coin> = amounts
                .iter()
                .enumerate()
                .map(|(i, &a)| Coin::new(Hash256([i as u8; 32]), Hash256([0xAA; 32]), a))
                .collect();
            let available: u64 = amounts.iter().sum();

            match select_coins(&coins, target) {
                Ok(sel) => {
                    prop_assert!(sel.total >= target);
                    prop_assert_eq!(
                        sel.total,
                        sel.coins.iter().map(|c| c.amount).sum::<u64>()
                    );
                    let smallest = sel.coins.iter().map(|c| c.amount).min().unwrap();
                    prop_assert!(sel.total - smallest < target);
                }
                Err(WalletError::InsufficientFunds { have, need }) => {
                    prop_assert!(available < target);
                    prop_assert_eq!(have, available);
                    prop_assert_eq!(need, target);
                }
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }
    }
}
