use crate::coding::traits::{FecError, Result};

/// Validated set of erased shard indices for a group of `total` shards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErasureSet {
    /// Sorted, unique indices
    indices: Vec<usize>,
    total: usize,
}

impl ErasureSet {
    /// Validate `indices` against a group of `total` shards.
    ///
    /// Fails with [`FecError::InvalidIndex`] for an index outside `0..total`
    /// and [`FecError::DuplicateIndex`] for a repeated one.
    pub fn new(indices: &[usize], total: usize) -> Result<Self> {
        let mut seen = vec![false; total];
        for &index in indices {
            if index >= total {
                return Err(FecError::InvalidIndex { index, total });
            }
            if seen[index] {
                return Err(FecError::DuplicateIndex { index });
            }
            seen[index] = true;
        }

        let indices = seen
            .iter()
            .enumerate()
            .filter_map(|(i, erased)| erased.then_some(i))
            .collect();
        Ok(Self { indices, total })
    }

    /// Erasures derived from per-slot presence flags
    pub fn from_present(present: &[bool]) -> Self {
        Self {
            indices: present
                .iter()
                .enumerate()
                .filter_map(|(i, p)| (!p).then_some(i))
                .collect(),
            total: present.len(),
        }
    }

    /// Number of erased shards
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is erased
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Group size these indices were validated against
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether shard `index` is erased
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Erased indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Erased indices as a sorted slice
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// The `count` smallest surviving indices, or `None` if fewer survive
    pub fn survivors(&self, count: usize) -> Option<Vec<usize>> {
        let survivors: Vec<usize> = (0..self.total)
            .filter(|i| !self.contains(*i))
            .take(count)
            .collect();
        (survivors.len() == count).then_some(survivors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erasures_sorted() {
        let set = ErasureSet::new(&[5, 1, 3], 7).unwrap();
        assert_eq!(set.as_slice(), &[1, 3, 5]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(3));
        assert!(!set.contains(2));
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(
            ErasureSet::new(&[0, 9], 9),
            Err(FecError::InvalidIndex { index: 9, total: 9 })
        );
    }

    #[test]
    fn test_duplicate_index() {
        assert_eq!(
            ErasureSet::new(&[2, 4, 2], 9),
            Err(FecError::DuplicateIndex { index: 2 })
        );
    }

    #[test]
    fn test_survivors_are_smallest_non_erased() {
        let set = ErasureSet::new(&[1, 2], 9).unwrap();
        assert_eq!(set.survivors(7), Some(vec![0, 3, 4, 5, 6, 7, 8]));

        let set = ErasureSet::new(&[0, 1, 2], 4).unwrap();
        assert_eq!(set.survivors(2), None);
    }

    #[test]
    fn test_from_present() {
        let set = ErasureSet::from_present(&[true, false, true, false]);
        assert_eq!(set.as_slice(), &[1, 3]);
        assert_eq!(set.total(), 4);
    }

    #[test]
    fn test_empty_set() {
        let set = ErasureSet::new(&[], 3).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.survivors(3), Some(vec![0, 1, 2]));
    }
}
