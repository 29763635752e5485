//! Out-of-bag (OOB) bookkeeping and scoring.
use crate::bootstrap::Bag;
use crate::dataset::TrainingSet;
use crate::functions;
use crate::model::Predictor;
use crate::output::Output;
use thiserror::Error;

/// Predictions each training row received from the models that never saw it.
#[derive(Debug, Clone)]
pub struct OobPredictions<T> {
    lists: Vec<Vec<T>>,
}

impl<T: Output> OobPredictions<T> {
    pub(crate) fn collect<'a, P, I>(members: I, training: &TrainingSet<T>) -> Self
    where
        P: 'a + Predictor<Target = T>,
        I: IntoIterator<Item = (&'a Bag, &'a P)>,
    {
        let mut lists = vec![Vec::new(); training.rows_len()];
        for (bag, model) in members {
            let oob = bag.out_of_bag().collect::<Vec<_>>();
            if oob.is_empty() {
                continue;
            }

            let rows = oob.iter().map(|&i| training.row(i)).collect::<Vec<_>>();
            let predictions = model.predict(&rows);
            debug_assert_eq!(predictions.len(), rows.len());
            for (i, prediction) in oob.into_iter().zip(predictions) {
                lists[i].push(prediction);
            }
        }
        Self { lists }
    }

    /// OOB predictions for training row `i`, in bag order.
    pub fn get(&self, i: usize) -> &[T] {
        &self.lists[i]
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn iter(&self) -> impl '_ + Iterator<Item = &[T]> {
        self.lists.iter().map(|l| &l[..])
    }

    /// Mean OOB prediction per row; `None` for rows that were drawn into every bag.
    pub fn averaged(&self) -> Vec<Option<T>> {
        self.lists.iter().map(|l| functions::mean(l)).collect()
    }
}

/// Result of [`BaggingRegressor::oob_score`](crate::BaggingRegressor::oob_score).
#[derive(Debug, Clone, PartialEq)]
pub struct OobScore<T> {
    /// Componentwise mean squared error over the scored rows, `None` if no row qualified.
    pub mean_squared_error: Option<T>,

    /// Rows that contributed to `mean_squared_error`.
    pub scored: usize,

    /// Rows without any OOB prediction.
    pub uncovered: usize,

    /// Rows dropped because their squared error contained NaN.
    pub degenerate: usize,
}

impl<T: Output> OobScore<T> {
    pub(crate) fn compute(averaged: &[Option<T>], target: &[T]) -> Self {
        debug_assert_eq!(averaged.len(), target.len());

        let mut uncovered = 0;
        let mut degenerate = 0;
        let mut squared_errors = Vec::new();
        for (i, (prediction, truth)) in averaged.iter().zip(target.iter()).enumerate() {
            let prediction = match prediction {
                Some(p) => p,
                None => {
                    uncovered += 1;
                    continue;
                }
            };

            let squared_error = prediction.squared_error(truth);
            if squared_error.has_nan() {
                log::debug!("row {} has a NaN squared error; excluded from OOB score", i);
                degenerate += 1;
                continue;
            }
            squared_errors.push(squared_error);
        }

        Self {
            mean_squared_error: functions::mean(&squared_errors),
            scored: squared_errors.len(),
            uncovered,
            degenerate,
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OobError {
    #[error("out-of-bag evaluation is disabled for this ensemble (fit with `oob(true)`)")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_skips_uncovered_and_nan_rows() {
        let averaged = vec![Some(1.0), None, Some(f64::NAN), Some(4.0)];
        let target = [2.0, 0.0, 1.0, 1.0];
        let score = OobScore::compute(&averaged, &target);
        assert_eq!(score.mean_squared_error, Some(5.0));
        assert_eq!(score.scored, 2);
        assert_eq!(score.uncovered, 1);
        assert_eq!(score.degenerate, 1);
    }

    #[test]
    fn score_is_absent_when_nothing_qualifies() {
        let score = OobScore::<f64>::compute(&[None, None], &[1.0, 2.0]);
        assert_eq!(score.mean_squared_error, None);
        assert_eq!(score.scored, 0);
        assert_eq!(score.uncovered, 2);
    }

    #[test]
    fn vector_targets_are_scored_componentwise() {
        let averaged = vec![Some(vec![1.0, 0.0]), Some(vec![3.0, 2.0])];
        let target = [vec![0.0, 0.0], vec![0.0, 0.0]];
        let score = OobScore::compute(&averaged, &target);
        assert_eq!(score.mean_squared_error, Some(vec![5.0, 2.0]));
    }
}
