use rand::Rng;

/// Return the values in a uniformly random order (Fisher-Yates).
///
/// Every permutation is equally likely for a uniform `rng`; the caller's
/// sequence is consumed and a new one returned.
pub fn shuffled<T>(values: impl IntoIterator<Item = T>, rng: &mut impl Rng) -> Vec<T> {
    let mut values: Vec<T> = values.into_iter().collect();
    for idx in (1..values.len()).rev() {
        let swap_with = rng.random_range(0..=idx);
        values.swap(idx, swap_with);
    }
    values
}
