//! Base model capability consumed by the ensemble.
use crate::functions;
use crate::output::Output;
use std::marker::PhantomData;
use thiserror::Error;

/// An untrained regression model.
///
/// The ensemble calls a zero-argument constructor once per bag to obtain a
/// fresh `Regressor`, then consumes it with [`Regressor::fit`].
pub trait Regressor {
    type Target: Output;
    type Fitted: Predictor<Target = Self::Target>;
    type Error: std::error::Error + Send + Sync + 'static;

    fn fit(self, data: &[&[f64]], target: &[Self::Target]) -> Result<Self::Fitted, Self::Error>;
}

/// A trained regression model.
pub trait Predictor {
    type Target: Output;

    /// Returns one prediction per row of `data`, in order.
    fn predict(&self, data: &[&[f64]]) -> Vec<Self::Target>;
}

/// Baseline model that ignores the features and predicts the mean of its training targets.
#[derive(Debug)]
pub struct MeanRegressor<T>(PhantomData<fn() -> T>);

impl<T> MeanRegressor<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for MeanRegressor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Output> Regressor for MeanRegressor<T> {
    type Target = T;
    type Fitted = ConstantPredictor<T>;
    type Error = TrainError;

    fn fit(self, data: &[&[f64]], target: &[T]) -> Result<Self::Fitted, Self::Error> {
        if data.len() != target.len() {
            return Err(TrainError::SampleSizeMismatch);
        }
        let value = functions::mean(target).ok_or(TrainError::EmptyTarget)?;
        Ok(ConstantPredictor { value })
    }
}

#[derive(Debug, Clone)]
pub struct ConstantPredictor<T> {
    value: T,
}

impl<T> ConstantPredictor<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Output> Predictor for ConstantPredictor<T> {
    type Target = T;

    fn predict(&self, data: &[&[f64]]) -> Vec<T> {
        vec![self.value.clone(); data.len()]
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainError {
    #[error("target data is empty")]
    EmptyTarget,

    #[error("the sample counts of features and target are mismatched")]
    SampleSizeMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_regressor_predicts_training_mean() -> Result<(), anyhow::Error> {
        let rows = [&[0.0][..], &[1.0][..], &[2.0][..]];
        let model = MeanRegressor::new().fit(&rows, &[1.0, 2.0, 6.0])?;
        assert_eq!(model.predict(&rows[..2]), vec![3.0, 3.0]);

        let model = MeanRegressor::new().fit(&rows[..2], &[vec![0.0, 2.0], vec![2.0, 4.0]])?;
        assert_eq!(model.value(), &vec![1.0, 3.0]);
        Ok(())
    }

    #[test]
    fn mean_regressor_rejects_bad_input() {
        assert_eq!(
            MeanRegressor::<f64>::new().fit(&[], &[]).unwrap_err(),
            TrainError::EmptyTarget
        );
        assert_eq!(
            MeanRegressor::new().fit(&[&[0.0][..]], &[1.0, 2.0]).unwrap_err(),
            TrainError::SampleSizeMismatch
        );
    }
}
