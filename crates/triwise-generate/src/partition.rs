use rand::Rng;

use triwise_core::{Allocation, Bucket, PartitionPolicy};

use crate::shuffle::shuffled;

/// Split `total` across `labels` under `policy`.
///
/// Values are computed in bucket order, permuted, then zipped with the labels
/// in declaration order, so no label position is favoured. Every bucket gets
/// at least one unit: when `total < labels.len()` the sum exceeds `total`
/// and `Allocation::is_over_allocated` reports it. `total` is not validated
/// here; callers reject non-positive quantities.
pub fn partition<S: AsRef<str>>(
    total: u64,
    labels: &[S],
    policy: &PartitionPolicy,
    rng: &mut impl Rng,
) -> Allocation {
    if labels.is_empty() {
        return Allocation::new(total, Vec::new());
    }

    let counts = match *policy {
        PartitionPolicy::FairBounded { spread } => {
            fair_bounded_counts(total, labels.len(), spread, rng)
        }
        PartitionPolicy::ProportionalOfTotal { min, max } => {
            proportional_counts(total, labels.len(), rng, |remaining, rng| {
                share_of_total(total, remaining, min, max, rng)
            })
        }
        PartitionPolicy::ProportionalOfRemaining { min, max } => {
            proportional_counts(total, labels.len(), rng, |remaining, rng| {
                share_of_remaining(remaining, min, max, rng)
            })
        }
    };

    let buckets = labels
        .iter()
        .zip(shuffled(counts, rng))
        .map(|(label, count)| Bucket {
            label: label.as_ref().to_string(),
            count,
        })
        .collect();

    Allocation::new(total, buckets)
}

/// Start every bucket at one, then hand out the remainder one unit at a time
/// to a random bucket within `spread` of the current maximum.
///
/// A bucket that falls more than `spread` behind is never picked again, so
/// the final spread can exceed the threshold.
fn fair_bounded_counts(total: u64, buckets: usize, spread: u64, rng: &mut impl Rng) -> Vec<u64> {
    let mut counts = vec![1u64; buckets];
    let mut remainder = total.saturating_sub(buckets as u64);
    let mut candidates = Vec::with_capacity(buckets);

    while remainder > 0 {
        let max = counts.iter().copied().max().unwrap_or(1);
        candidates.clear();
        candidates.extend(
            counts
                .iter()
                .enumerate()
                .filter(|(_, count)| max - **count <= spread)
                .map(|(idx, _)| idx),
        );
        let pick = candidates[rng.random_range(0..candidates.len())];
        counts[pick] += 1;
        remainder -= 1;
    }

    counts
}

/// Draw every bucket but the last, keeping one unit back for each bucket
/// still to fill; the last bucket takes what remains.
fn proportional_counts<R, F>(total: u64, buckets: usize, rng: &mut R, mut draw: F) -> Vec<u64>
where
    R: Rng,
    F: FnMut(u64, &mut R) -> u64,
{
    let mut counts = Vec::with_capacity(buckets);
    let mut remaining = total;

    for idx in 0..buckets - 1 {
        let still_to_fill = (buckets - idx - 1) as u64;
        let drawn = draw(remaining, rng);
        let count = drawn.min(remaining.saturating_sub(still_to_fill)).max(1);
        counts.push(count);
        remaining = remaining.saturating_sub(count);
    }
    counts.push(remaining.max(1));

    counts
}

/// `floor(total * p)` with `p` uniform between `min` and
/// `min(max, remaining / total)`.
fn share_of_total(total: u64, remaining: u64, min: f64, max: f64, rng: &mut impl Rng) -> u64 {
    let ceiling = max.min(remaining as f64 / total as f64);
    let share = rng.random::<f64>() * (ceiling - min) + min;
    (total as f64 * share).floor() as u64
}

/// Integer uniform in `[max(1, floor(remaining * min)), max(1, floor(remaining * max))]`.
fn share_of_remaining(remaining: u64, min: f64, max: f64, rng: &mut impl Rng) -> u64 {
    let low = ((remaining as f64 * min).floor() as u64).max(1);
    let high = ((remaining as f64 * max).floor() as u64).max(1);
    rng.random_range(low..=high.max(low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const LABELS: [&str; 3] = ["Malay", "Chinese", "Indian"];

    #[test]
    fn empty_labels_yield_empty_allocation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let labels: [&str; 0] = [];
        let allocation = partition(10, &labels, &PartitionPolicy::category_default(), &mut rng);
        assert!(allocation.is_empty());
        assert_eq!(allocation.total, 10);
    }

    #[test]
    fn single_bucket_takes_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for policy in [
            PartitionPolicy::category_default(),
            PartitionPolicy::sub_category_default(),
            PartitionPolicy::ProportionalOfTotal {
                min: 0.15,
                max: 0.6,
            },
        ] {
            let allocation = partition(37, &["only"], &policy, &mut rng);
            assert_eq!(allocation.get("only"), Some(37));
        }
    }

    #[test]
    fn labels_keep_declaration_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let allocation = partition(50, &LABELS, &PartitionPolicy::category_default(), &mut rng);
        let labels: Vec<&str> = allocation.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(labels, LABELS);
    }

    #[test]
    fn fair_bounded_hands_out_exact_total() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let counts = fair_bounded_counts(300, 4, 10, &mut rng);
        assert_eq!(counts.iter().sum::<u64>(), 300);
        assert!(counts.iter().all(|count| *count >= 1), "{counts:?}");
    }

    #[test]
    fn fair_bounded_keeps_minimum_when_infeasible() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(fair_bounded_counts(2, 5, 10, &mut rng), vec![1; 5]);
    }

    #[test]
    fn zero_spread_feeds_a_single_bucket() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut counts = fair_bounded_counts(20, 3, 0, &mut rng);
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 1, 18]);
    }

    #[test]
    fn share_of_remaining_respects_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..500 {
            let drawn = share_of_remaining(40, 0.1, 0.7, &mut rng);
            assert!((4..=28).contains(&drawn), "{drawn}");
        }
    }

    #[test]
    fn proportional_counts_reserve_units_for_later_buckets() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let counts = proportional_counts(5, 5, &mut rng, |remaining, _| remaining);
        assert_eq!(counts, vec![1, 1, 1, 1, 1]);
    }
}
