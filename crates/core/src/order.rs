//! Order strategy: sequential traversal is identity order; random traversal
//! applies a precomputed shuffled permutation.
//!
//! The permutation is defined over the *unfiltered* question count and is
//! only rebuilt on topic load or an explicit reshuffle, never on a filter
//! change. Applying it to a narrowed list drops entries that fall outside
//! the list's current bounds, so the surviving order is a subsequence of the
//! permutation and stays stable while the user adjusts filters.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShuffleError {
    #[error("index {index} out of range for permutation of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("index {index} appears more than once")]
    DuplicateIndex { index: usize },
}

/// A validated permutation of `[0, len)` used for random traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePlan {
    permutation: Vec<usize>,
}

impl ShufflePlan {
    /// Build a plan from a candidate permutation.
    ///
    /// An empty permutation is valid and corresponds to an empty topic.
    ///
    /// # Errors
    ///
    /// Returns `ShuffleError` if any index is out of range or duplicated.
    pub fn new(permutation: Vec<usize>) -> Result<Self, ShuffleError> {
        let len = permutation.len();
        let mut seen = vec![false; len];
        for &index in &permutation {
            if index >= len {
                return Err(ShuffleError::IndexOutOfRange { index, len });
            }
            if seen[index] {
                return Err(ShuffleError::DuplicateIndex { index });
            }
            seen[index] = true;
        }
        Ok(Self { permutation })
    }

    /// Number of unfiltered positions this plan was computed against.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    #[must_use]
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Map the permutation over a filtered list by index, dropping entries
    /// that no longer resolve ("index remap with drop").
    #[must_use]
    pub fn apply<T: Copy>(&self, filtered: &[T]) -> Vec<T> {
        self.permutation
            .iter()
            .filter_map(|&index| filtered.get(index).copied())
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_permutation_is_valid() {
        let plan = ShufflePlan::new(Vec::new()).unwrap();
        assert!(plan.is_empty());
        assert!(plan.apply(&[] as &[u32]).is_empty());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = ShufflePlan::new(vec![0, 3, 1]).unwrap_err();
        assert_eq!(err, ShuffleError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn rejects_duplicate_index() {
        let err = ShufflePlan::new(vec![0, 1, 1]).unwrap_err();
        assert_eq!(err, ShuffleError::DuplicateIndex { index: 1 });
    }

    #[test]
    fn apply_reorders_a_full_list() {
        let plan = ShufflePlan::new(vec![2, 0, 1]).unwrap();
        assert_eq!(plan.apply(&["a", "b", "c"]), vec!["c", "a", "b"]);
    }

    #[test]
    fn apply_drops_indices_beyond_the_filtered_bounds() {
        // Plan computed against 6 unfiltered positions; the filter kept 3.
        let plan = ShufflePlan::new(vec![4, 1, 5, 0, 2, 3]).unwrap();
        assert_eq!(plan.apply(&[10, 11, 12]), vec![11, 10, 12]);
    }

    #[test]
    fn narrowed_order_is_a_subsequence_of_the_permutation() {
        let plan = ShufflePlan::new(vec![7, 2, 9, 0, 5, 1, 8, 3, 6, 4]).unwrap();
        let filtered: Vec<usize> = (0..4).collect();

        let narrowed = plan.apply(&filtered);

        // Same indices in the same relative order as the permutation.
        let expected: Vec<usize> = plan
            .permutation()
            .iter()
            .copied()
            .filter(|&i| i < filtered.len())
            .collect();
        assert_eq!(narrowed, expected);
    }
}
