//! Proportional share allocation.
//!
//! Purchase percentages are carried as integer basis points. Share counts
//! are rounded half-up with a floor of one share per participant, and the
//! rounding remainder (of either sign) is applied to the largest holder —
//! never taking any holder below one share. The one-share floor means the
//! assigned total can still differ from the nominal total when the
//! remainder cannot be absorbed; that slack is accepted.

use parcel_types::LedgerAddress;

/// A purchase's proportion of the property value in basis points
/// (`amount × 10_000 / value`, floored).
pub fn percent_bps(amount_usd: u128, value: u128) -> u32 {
    ((amount_usd * 10_000) / value) as u32
}

/// Assign whole shares to holders proportionally to their basis points.
pub fn allocate_shares(
    total_shares: u64,
    holdings: &[(LedgerAddress, u32)],
) -> Vec<(LedgerAddress, u64)> {
    let mut allocated: Vec<(LedgerAddress, u64)> = holdings
        .iter()
        .map(|(owner, bps)| {
            let raw = (total_shares as u128 * *bps as u128 + 5_000) / 10_000;
            (owner.clone(), (raw as u64).max(1))
        })
        .collect();

    let assigned: u64 = allocated.iter().map(|(_, s)| s).sum();
    if assigned != total_shares && !allocated.is_empty() {
        let largest = allocated
            .iter()
            .enumerate()
            .max_by_key(|(_, (_, shares))| *shares)
            .map(|(i, _)| i)
            .expect("non-empty");
        if assigned < total_shares {
            allocated[largest].1 += total_shares - assigned;
        } else {
            let excess = assigned - total_shares;
            let current = allocated[largest].1;
            allocated[largest].1 = current.saturating_sub(excess).max(1);
        }
    }
    allocated
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(tag: &str) -> LedgerAddress {
        LedgerAddress::new(format!("parc_{tag}"))
    }

    #[test]
    fn exact_split() {
        // 60% / 40% of 1000 shares.
        let allocated = allocate_shares(1000, &[(addr("a"), 6000), (addr("b"), 4000)]);
        assert_eq!(allocated, vec![(addr("a"), 600), (addr("b"), 400)]);
    }

    #[test]
    fn tiny_holder_gets_floor_share() {
        // 0.004% of 1000 shares rounds to zero; the floor lifts it to 1.
        let allocated = allocate_shares(1000, &[(addr("a"), 9_999), (addr("b"), 1)]);
        let small = allocated.iter().find(|(o, _)| o == &addr("b")).unwrap();
        assert_eq!(small.1, 1);
    }

    #[test]
    fn remainder_goes_to_largest_holder() {
        // Thirds of 100: each rounds to 33, remainder 1 lands on a holder.
        let allocated = allocate_shares(
            100,
            &[(addr("a"), 3334), (addr("b"), 3333), (addr("c"), 3333)],
        );
        let total: u64 = allocated.iter().map(|(_, s)| s).sum();
        assert_eq!(total, 100);
        let largest = allocated.iter().map(|(_, s)| *s).max().unwrap();
        assert_eq!(largest, 34);
    }

    #[test]
    fn percent_bps_examples() {
        assert_eq!(percent_bps(600_000, 1_000_000), 6000);
        assert_eq!(percent_bps(400_000, 1_000_000), 4000);
        assert_eq!(percent_bps(1, 3), 3333);
    }

    proptest! {
        #[test]
        fn allocation_sums_to_total_when_absorbable(
            total in 10u64..10_000,
            splits in proptest::collection::vec(1u32..5_000, 1..8),
        ) {
            // Normalize splits to exactly 10_000 bps.
            let sum: u32 = splits.iter().sum();
            let mut holdings: Vec<(LedgerAddress, u32)> = splits
                .iter()
                .enumerate()
                .map(|(i, s)| (addr(&format!("h{i}")), s * 10_000 / sum))
                .collect();
            let assigned_bps: u32 = holdings.iter().map(|(_, b)| b).sum();
            holdings[0].1 += 10_000 - assigned_bps;

            // The largest holder can only absorb the rounding remainder when
            // the total dwarfs the holder count.
            prop_assume!(total >= (holdings.len() as u64).pow(2) * 2);
            let allocated = allocate_shares(total, &holdings);

            let total_assigned: u64 = allocated.iter().map(|(_, s)| s).sum();
            prop_assert_eq!(total_assigned, total);
            prop_assert!(allocated.iter().all(|(_, s)| *s >= 1));
        }
    }
}
