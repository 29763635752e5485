use crate::bootstrap::Bag;
use crate::output::Output;
use thiserror::Error;

/// Row-major training data paired index-for-index with its targets.
#[derive(Debug, Clone)]
pub struct Dataset<'a, T> {
    rows: Vec<&'a [f64]>,
    target: &'a [T],
}

impl<'a, T: Output> Dataset<'a, T> {
    pub fn new<R: AsRef<[f64]>>(data: &'a [R], target: &'a [T]) -> Result<Self, DatasetError> {
        if data.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }

        if data.len() != target.len() {
            return Err(DatasetError::RowSizeMismatch {
                rows: data.len(),
                targets: target.len(),
            });
        }

        let rows = data.iter().map(|r| r.as_ref()).collect::<Vec<_>>();
        let features_len = rows[0].len();
        if let Some(row) = rows.iter().position(|r| r.len() != features_len) {
            return Err(DatasetError::FeatureSizeMismatch {
                row,
                expected: features_len,
                actual: rows[row].len(),
            });
        }

        let target_width = target[0].width();
        if let Some(row) = target.iter().position(|t| t.width() != target_width) {
            return Err(DatasetError::TargetSizeMismatch {
                row,
                expected: target_width,
                actual: target[row].width(),
            });
        }

        Ok(Self { rows, target })
    }

    pub fn rows_len(&self) -> usize {
        self.rows.len()
    }

    pub fn features_len(&self) -> usize {
        self.rows[0].len()
    }

    /// The bootstrap subset selected by `bag`, duplicates included.
    pub fn select(&self, bag: &Bag) -> (Vec<&'a [f64]>, Vec<T>) {
        bag.indices()
            .iter()
            .map(|&i| (self.rows[i], self.target[i].clone()))
            .unzip()
    }

    pub fn to_training_set(&self) -> TrainingSet<T> {
        TrainingSet {
            rows: self.rows.iter().map(|r| r.to_vec()).collect(),
            target: self.target.to_vec(),
        }
    }
}

/// Owned copy of the training data kept for out-of-bag evaluation.
#[derive(Debug, Clone)]
pub struct TrainingSet<T> {
    rows: Vec<Vec<f64>>,
    target: Vec<T>,
}

impl<T> TrainingSet<T> {
    pub fn rows_len(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    pub fn target(&self) -> &[T] {
        &self.target
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("dataset must have at least one row")]
    EmptyDataset,

    #[error("data has {rows} rows but target has {targets} values")]
    RowSizeMismatch { rows: usize, targets: usize },

    #[error("row {row} has {actual} features (expected {expected})")]
    FeatureSizeMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("target {row} has {actual} components (expected {expected})")]
    TargetSizeMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_input() {
        let empty: [Vec<f64>; 0] = [];
        assert_eq!(
            Dataset::<f64>::new(&empty, &[]).unwrap_err(),
            DatasetError::EmptyDataset
        );
        assert_eq!(
            Dataset::new(&[[1.0], [2.0]], &[1.0]).unwrap_err(),
            DatasetError::RowSizeMismatch {
                rows: 2,
                targets: 1
            }
        );
        assert_eq!(
            Dataset::new(&[vec![1.0], vec![2.0, 3.0]], &[1.0, 2.0]).unwrap_err(),
            DatasetError::FeatureSizeMismatch {
                row: 1,
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_ragged_vector_targets() {
        let data = [[0.0], [1.0], [2.0]];
        let target = [vec![1.0], vec![1.0, 2.0], vec![3.0, 4.0, 5.0]];
        assert_eq!(
            Dataset::new(&data, &target).unwrap_err(),
            DatasetError::TargetSizeMismatch {
                row: 1,
                expected: 1,
                actual: 2
            }
        );

        let target = [vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        assert!(Dataset::new(&data, &target).is_ok());
    }

    #[test]
    fn select_keeps_duplicates() -> Result<(), anyhow::Error> {
        let data = [[0.0], [1.0], [2.0]];
        let target = [10.0, 11.0, 12.0];
        let dataset = Dataset::new(&data, &target)?;
        let bag = Bag::from_indices(3, vec![2, 2, 0]);
        let (rows, ys) = dataset.select(&bag);
        assert_eq!(rows, vec![&[2.0][..], &[2.0][..], &[0.0][..]]);
        assert_eq!(ys, vec![12.0, 12.0, 10.0]);
        Ok(())
    }
}
