use rand::RngCore;

const U32_RANGE: f64 = 4294967296.0;

/// Uniform float in [0, 1) built from a single 32 bit draw so seeded
/// generators produce the same sequence on every platform.
#[inline]
pub fn unit_float(rng: &mut impl RngCore) -> f64 {
    rng.next_u32() as f64 / U32_RANGE
}

/// Uniformly chosen index in [0, len). `len` must be non-zero.
#[inline]
pub fn random_index(len: usize, rng: &mut impl RngCore) -> usize {
    debug_assert!(len > 0);
    let index = (unit_float(rng) * len as f64).floor() as usize;
    // guards against float rounding at the top of the range
    index.min(len - 1)
}

/// Fisher-Yates shuffle: for i from len-1 down to 1 swap element i with
/// a uniformly chosen element in [0, i].
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut impl RngCore) {
    for i in (1..items.len()).rev() {
        let j = random_index(i + 1, rng);
        items.swap(i, j);
    }
}

/// Pick a random element index among those matching `matcher`.
/// Used when dealing needs "any card of side X" from a hand.
pub fn random_matching_index<T>(
    items: &[T],
    matcher: impl Fn(&T) -> bool,
    rng: &mut impl RngCore,
) -> Option<usize> {
    let candidates: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matcher(item))
        .map(|(index, _)| index)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[random_index(candidates.len(), rng)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::oldmaid::rng::Mulberry32;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_shuffle_keeps_every_item() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items: Vec<i32> = (0..52).collect();
        shuffle_in_place(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..52).collect::<Vec<i32>>());
    }

    #[test]
    fn test_shuffle_is_reproducible_with_seed() {
        let mut first: Vec<i32> = (0..20).collect();
        let mut second = first.clone();
        shuffle_in_place(&mut first, &mut Mulberry32::from_seed_str("abc"));
        shuffle_in_place(&mut second, &mut Mulberry32::from_seed_str("abc"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_shuffle_short_slices() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<i32> = vec![];
        shuffle_in_place(&mut empty, &mut rng);
        assert!(empty.is_empty());
        let mut one = vec![7];
        shuffle_in_place(&mut one, &mut rng);
        assert_eq!(one, vec![7]);
    }

    #[test]
    fn test_random_index_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for len in 1..30 {
            for _ in 0..50 {
                assert!(random_index(len, &mut rng) < len);
            }
        }
    }

    #[test]
    fn test_random_matching_index() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = vec![1, 2, 3, 4, 5, 6];
        for _ in 0..20 {
            let index = random_matching_index(&items, |x| x % 2 == 0, &mut rng)
                .expect("there are even numbers");
            assert_eq!(items[index] % 2, 0);
        }
        assert_eq!(random_matching_index(&items, |x| *x > 10, &mut rng), None);
    }
}
