//! Random partitions of an integer total into positive parts.

use rand::Rng;

/// Partition `total` into `parts` positive integers summing exactly to
/// `total`, each at least 1.
///
/// Uniform over compositions: `parts - 1` distinct cut points are drawn
/// from the `total - 1` interior positions and the gaps between them become
/// the parts.
///
/// # Panics
/// Panics if `parts == 0` or `total < parts` (no composition exists).
pub fn partition<R: Rng + ?Sized>(rng: &mut R, total: u64, parts: usize) -> Vec<u64> {
    assert!(parts >= 1, "cannot partition into zero parts");
    assert!(
        total >= parts as u64,
        "cannot give {parts} parts at least 1 from {total}"
    );

    let mut cuts: Vec<u64> = rand::seq::index::sample(rng, (total - 1) as usize, parts - 1)
        .into_iter()
        .map(|i| i as u64 + 1)
        .collect();
    cuts.sort_unstable();

    let mut result = Vec::with_capacity(parts);
    let mut previous = 0u64;
    for cut in cuts {
        result.push(cut - previous);
        previous = cut;
    }
    result.push(total - previous);
    result
}

/// Partition 100 percent into `parts` positive integer percentages
/// (owner splits for a new registration).
pub fn partition_percent<R: Rng + ?Sized>(rng: &mut R, parts: usize) -> Vec<u64> {
    partition(rng, 100, parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_part_takes_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(partition(&mut rng, 42, 1), vec![42]);
    }

    #[test]
    fn full_split_gives_all_ones() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(partition(&mut rng, 5, 5), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn same_seed_same_partition() {
        let a = partition(&mut StdRng::seed_from_u64(7), 100, 4);
        let b = partition(&mut StdRng::seed_from_u64(7), 100, 4);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "cannot give")]
    fn too_many_parts_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        partition(&mut rng, 3, 4);
    }

    proptest! {
        #[test]
        fn partitions_are_exact(seed in any::<u64>(), total in 1u64..10_000, parts in 1usize..32) {
            prop_assume!(total >= parts as u64);
            let mut rng = StdRng::seed_from_u64(seed);
            let result = partition(&mut rng, total, parts);

            prop_assert_eq!(result.len(), parts);
            prop_assert!(result.iter().all(|&p| p >= 1));
            prop_assert_eq!(result.iter().sum::<u64>(), total);
        }

        #[test]
        fn percent_partitions_are_exact(seed in any::<u64>(), parts in 1usize..20) {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = partition_percent(&mut rng, parts);
            prop_assert_eq!(result.iter().sum::<u64>(), 100);
            prop_assert!(result.iter().all(|&p| p >= 1));
        }
    }
}
