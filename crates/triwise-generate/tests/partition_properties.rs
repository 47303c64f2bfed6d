use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use triwise_core::PartitionPolicy;
use triwise_generate::{partition, shuffled};

const CUISINES: [&str; 3] = ["Malay", "Chinese", "Indian"];

fn policies() -> [PartitionPolicy; 3] {
    [
        PartitionPolicy::category_default(),
        PartitionPolicy::ProportionalOfTotal {
            min: 0.15,
            max: 0.6,
        },
        PartitionPolicy::sub_category_default(),
    ]
}

#[test]
fn feasible_totals_are_split_exactly() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for policy in policies() {
        for total in [3_u64, 4, 7, 50, 80, 120, 1_000] {
            let allocation = partition(total, &CUISINES, &policy, &mut rng);
            assert_eq!(allocation.len(), CUISINES.len());
            assert_eq!(allocation.sum(), total, "{} over {total}", policy.name());
            assert!(!allocation.is_over_allocated());
            assert!(allocation.iter().all(|bucket| bucket.count >= 1));
        }
    }
}

#[test]
fn infeasible_totals_give_every_bucket_one_unit() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    for policy in policies() {
        let allocation = partition(2, &CUISINES, &policy, &mut rng);
        assert!(allocation.iter().all(|bucket| bucket.count >= 1));
        assert!(allocation.sum() > 2);
        assert!(allocation.is_over_allocated());
    }
}

#[test]
fn no_label_position_is_favoured() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let trials = 3_000_u64;
    for policy in policies() {
        let mut sums = [0_u64; 3];
        for _ in 0..trials {
            let allocation = partition(100, &CUISINES, &policy, &mut rng);
            for (idx, bucket) in allocation.iter().enumerate() {
                sums[idx] += bucket.count;
            }
        }
        for (idx, sum) in sums.iter().enumerate() {
            let mean = *sum as f64 / trials as f64;
            assert!(
                (25.0..=42.0).contains(&mean),
                "{} label {idx} mean {mean}",
                policy.name()
            );
        }
    }
}

#[test]
fn each_label_holds_the_maximum_equally_often() {
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let trials = 6_000_u64;
    for policy in policies() {
        let mut wins = [0_u64; 3];
        let mut decided = 0_u64;
        for _ in 0..trials {
            let allocation = partition(100, &CUISINES, &policy, &mut rng);
            let counts: Vec<u64> = allocation.iter().map(|bucket| bucket.count).collect();
            let max = counts.iter().copied().max().unwrap_or_default();
            let leaders: Vec<usize> = (0..counts.len()).filter(|idx| counts[*idx] == max).collect();
            if let [leader] = leaders.as_slice() {
                wins[*leader] += 1;
                decided += 1;
            }
        }

        assert!(decided > trials / 2, "{} had {decided} untied trials", policy.name());
        let expected = decided as f64 / CUISINES.len() as f64;
        for (idx, won) in wins.iter().enumerate() {
            let ratio = *won as f64 / expected;
            assert!(
                (0.9..=1.1).contains(&ratio),
                "{} label {idx} held the maximum {won} times, expected about {expected:.0}",
                policy.name()
            );
        }
    }
}

#[test]
fn same_seed_same_allocation() {
    let policy = PartitionPolicy::sub_category_default();
    let a = partition(120, &CUISINES, &policy, &mut ChaCha8Rng::seed_from_u64(99));
    let b = partition(120, &CUISINES, &policy, &mut ChaCha8Rng::seed_from_u64(99));
    assert_eq!(a, b);
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = ChaCha8Rng::seed_from_u64(14);
    let mut out = shuffled(1..=20, &mut rng);
    out.sort_unstable();
    assert_eq!(out, (1..=20).collect::<Vec<_>>());
}
