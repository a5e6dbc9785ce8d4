//! Inversion counting, parity and random permutations of `1..=len`.

use rand::{seq::SliceRandom, Rng};

/// Number of pairs `(i, j)` with `i < j` and `perm[i] > perm[j]`.
///
/// Quadratic, which is fine at puzzle sizes.
pub fn count_inversions<T: PartialOrd>(perm: &[T]) -> usize {
    perm.iter()
        .enumerate()
        .map(|(i, val)| perm[i + 1..].iter().filter(|&next| next < val).count())
        .sum()
}

pub fn is_even_permutation<T: PartialOrd>(perm: &[T]) -> bool {
    count_inversions(perm) % 2 == 0
}

/// Uniformly random arrangement of `1..=len`. No parity constraint.
pub fn random_permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<u32> {
    let mut values: Vec<u32> = (1..=len as u32).collect();
    values.shuffle(rng);
    values
}

/// Uniformly random even permutation of `1..=len`.
///
/// A uniform shuffle followed by one fixed transposition whenever the draw
/// is odd maps the odd half bijectively onto the even half, so the result
/// stays uniform over the alternating group.
pub fn random_even_permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<u32> {
    let mut values = random_permutation(len, rng);
    if len >= 2 && !is_even_permutation(&values) {
        values.swap(0, 1);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn counts_inversions() {
        assert_eq!(count_inversions::<u32>(&[]), 0);
        assert_eq!(count_inversions(&[1, 2, 3, 4]), 0);
        assert_eq!(count_inversions(&[2, 1, 3]), 1);
        assert_eq!(count_inversions(&[4, 3, 2, 1]), 6);
        assert_eq!(count_inversions(&[3, 1, 2]), 2);
    }

    #[test]
    fn parity_of_known_permutations() {
        assert!(is_even_permutation(&[1, 2, 3, 4]));
        assert!(is_even_permutation(&[1, 2, 3, 4, 5, 6, 7, 8]));
        assert!(!is_even_permutation(&[2, 1, 3, 4, 5, 6, 7, 8]));
        assert!(!is_even_permutation(&[
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 16
        ]));
    }

    #[test]
    fn parity_works_for_arbitrary_distinct_values() {
        assert!(is_even_permutation(&[10, 30, 20, 5]));
        assert!(!is_even_permutation(&[100, 7]));
    }

    #[test]
    fn two_transpositions_preserve_parity() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 2..=16 {
            for _ in 0..50 {
                let mut perm = random_permutation(len, &mut rng);
                let before = is_even_permutation(&perm);
                for _ in 0..2 {
                    let i = rng.gen_range(0..len);
                    let mut j = rng.gen_range(0..len);
                    while j == i {
                        j = rng.gen_range(0..len);
                    }
                    perm.swap(i, j);
                }
                assert_eq!(before, is_even_permutation(&perm), "len {len}: {perm:?}");
            }
        }
    }

    #[test]
    fn random_permutation_covers_every_value_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut perm = random_permutation(25, &mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (1..=25).collect::<Vec<u32>>());
    }

    #[test]
    fn random_even_permutations_are_even() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            assert!(is_even_permutation(&random_even_permutation(12, &mut rng)));
        }
        assert_eq!(random_even_permutation(1, &mut rng), vec![1]);
        assert!(random_even_permutation(0, &mut rng).is_empty());
    }
}
