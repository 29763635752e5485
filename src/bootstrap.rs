//! Bootstrap resampling.
use rand::Rng;

/// One ensemble member's bootstrap resample of the training rows.
///
/// A bag of a dataset with `N` rows always holds exactly `N` indices in
/// `0..N`, drawn with replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    indices: Vec<usize>,
    in_bag: Vec<bool>,
}

impl Bag {
    /// Draws `dataset_size` indices uniformly from `0..dataset_size` with replacement.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, dataset_size: usize) -> Self {
        let indices = (0..dataset_size)
            .map(|_| rng.gen_range(0..dataset_size))
            .collect();
        Self::from_indices(dataset_size, indices)
    }

    pub(crate) fn from_indices(dataset_size: usize, indices: Vec<usize>) -> Self {
        let mut in_bag = vec![false; dataset_size];
        for &i in &indices {
            in_bag[i] = true;
        }
        Self { indices, in_bag }
    }

    /// The drawn indices, in draw order and with duplicates.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Size of the dataset this bag was drawn from.
    pub fn dataset_size(&self) -> usize {
        self.in_bag.len()
    }

    /// Returns `true` if row `i` was drawn at least once.
    pub fn contains(&self, i: usize) -> bool {
        self.in_bag.get(i).copied().unwrap_or(false)
    }

    /// Number of distinct rows in the bag.
    pub fn in_bag_len(&self) -> usize {
        self.in_bag.iter().filter(|&&b| b).count()
    }

    /// Rows never drawn into this bag, in ascending order.
    pub fn out_of_bag(&self) -> impl '_ + Iterator<Item = usize> {
        self.in_bag
            .iter()
            .enumerate()
            .filter(|(_, b)| !**b)
            .map(|(i, _)| i)
    }
}

/// Draws `num_bags` independent bootstrap resamples of a dataset with `dataset_size` rows.
///
/// Bags are drawn one after another from `rng`, so a seeded generator always
/// yields the same bags.
pub fn generate_splits<R: Rng + ?Sized>(
    rng: &mut R,
    dataset_size: usize,
    num_bags: usize,
) -> Vec<Bag> {
    (0..num_bags)
        .map(|_| Bag::sample(rng, dataset_size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn out_of_bag_is_complement() {
        let bag = Bag::from_indices(5, vec![0, 0, 3, 1, 3]);
        assert_eq!(bag.len(), 5);
        assert_eq!(bag.in_bag_len(), 3);
        assert!(bag.contains(3));
        assert!(!bag.contains(2));
        assert!(!bag.contains(10));
        assert_eq!(bag.out_of_bag().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn same_seed_same_bags() {
        let a = generate_splits(&mut StdRng::seed_from_u64(7), 50, 4);
        let b = generate_splits(&mut StdRng::seed_from_u64(7), 50, 4);
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn distinct_fraction_approaches_one_minus_inverse_e() {
        let n = 200;
        let mut rng = StdRng::seed_from_u64(0);
        let bags = generate_splits(&mut rng, n, 500);
        let observed = bags.iter().map(|b| b.in_bag_len()).sum::<usize>() as f64
            / (bags.len() * n) as f64;
        let expected = 1.0 - (1.0 - 1.0 / n as f64).powi(n as i32);
        assert!((observed - expected).abs() < 0.01, "observed={}", observed);
    }

    proptest! {
        #[test]
        fn every_bag_has_dataset_size_indices(n in 1usize..200, num_bags in 1usize..20, seed: u64) {
            let bags = generate_splits(&mut StdRng::seed_from_u64(seed), n, num_bags);
            prop_assert_eq!(bags.len(), num_bags);
            for bag in &bags {
                prop_assert_eq!(bag.len(), n);
                prop_assert_eq!(bag.dataset_size(), n);
                prop_assert!(bag.indices().iter().all(|&i| i < n));
                prop_assert_eq!(bag.in_bag_len() + bag.out_of_bag().count(), n);
            }
        }
    }
}
