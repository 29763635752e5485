use crate::bootstrap::{self, Bag};
use crate::dataset::{Dataset, DatasetError, TrainingSet};
use crate::model::{Predictor, Regressor};
use crate::oob::{OobError, OobPredictions, OobScore};
use crate::output::Output;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct BaggingOptions {
    num_bags: NonZeroUsize,
    oob: bool,
    seed: Option<u64>,
}

impl BaggingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_bags(mut self, num_bags: NonZeroUsize) -> Self {
        self.num_bags = num_bags;
        self
    }

    /// Keeps a copy of the training data so that the OOB methods can be used.
    pub fn oob(mut self, enabled: bool) -> Self {
        self.oob = enabled;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fits one fresh model from `constructor` on each bootstrap bag.
    pub fn fit<M, F, R>(
        &self,
        constructor: F,
        data: &[R],
        target: &[M::Target],
    ) -> Result<BaggingRegressor<M::Fitted>, FitError>
    where
        M: Regressor,
        F: Fn() -> M,
        R: AsRef<[f64]>,
    {
        let dataset = Dataset::new(data, target)?;
        let bags = self.generate_splits(&dataset);
        let members = bags
            .into_iter()
            .enumerate()
            .map(|(i, bag)| fit_member(i, &constructor, &dataset, bag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.finish(&dataset, members))
    }

    /// Same as [`BaggingOptions::fit`] but fits the bags on the rayon thread pool.
    ///
    /// Bags are drawn before any model is fitted, so both methods produce the
    /// same bags for the same seed.
    pub fn fit_parallel<M, F, R>(
        &self,
        constructor: F,
        data: &[R],
        target: &[M::Target],
    ) -> Result<BaggingRegressor<M::Fitted>, FitError>
    where
        M: Regressor,
        M::Fitted: Send,
        F: Fn() -> M + Sync,
        R: AsRef<[f64]>,
    {
        let dataset = Dataset::new(data, target)?;
        let bags = self.generate_splits(&dataset);
        let members = bags
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(i, bag)| fit_member(i, &constructor, &dataset, bag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.finish(&dataset, members))
    }

    fn generate_splits<T: Output>(&self, dataset: &Dataset<T>) -> Vec<Bag> {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        let bags = bootstrap::generate_splits(&mut rng, dataset.rows_len(), self.num_bags.get());

        let len = bags[0].len();
        assert!(
            bags.iter().all(|b| b.len() == len),
            "all bags should be of the same length"
        );
        assert_eq!(
            len,
            dataset.rows_len(),
            "all bags should contain `len(data)` elements"
        );
        bags
    }

    fn finish<P: Predictor>(
        &self,
        dataset: &Dataset<P::Target>,
        members: Vec<Member<P>>,
    ) -> BaggingRegressor<P> {
        log::info!(
            "fitted {} bags on {} rows (oob={})",
            members.len(),
            dataset.rows_len(),
            self.oob
        );
        BaggingRegressor {
            members,
            features_len: dataset.features_len(),
            training: if self.oob {
                Some(dataset.to_training_set())
            } else {
                None
            },
        }
    }
}

impl Default for BaggingOptions {
    fn default() -> Self {
        Self {
            num_bags: NonZeroUsize::new(10).expect("never fails"),
            oob: false,
            seed: None,
        }
    }
}

fn fit_member<M, F>(
    i: usize,
    constructor: &F,
    dataset: &Dataset<M::Target>,
    bag: Bag,
) -> Result<Member<M::Fitted>, FitError>
where
    M: Regressor,
    F: Fn() -> M,
{
    let (rows, target) = dataset.select(&bag);
    let model = constructor()
        .fit(&rows, &target)
        .map_err(|e| FitError::Model {
            bag: i,
            source: Box::new(e),
        })?;
    log::debug!(
        "bag {}: fitted on {} distinct of {} rows",
        i,
        bag.in_bag_len(),
        bag.len()
    );
    Ok(Member { bag, model })
}

#[derive(Debug)]
struct Member<P> {
    bag: Bag,
    model: P,
}

/// A fitted bagging ensemble.
#[derive(Debug)]
pub struct BaggingRegressor<P: Predictor> {
    members: Vec<Member<P>>,
    features_len: usize,
    training: Option<TrainingSet<P::Target>>,
}

impl<P: Predictor> BaggingRegressor<P> {
    pub fn num_bags(&self) -> usize {
        self.members.len()
    }

    pub fn bags(&self) -> impl '_ + Iterator<Item = &Bag> {
        self.members.iter().map(|m| &m.bag)
    }

    pub fn models(&self) -> impl '_ + Iterator<Item = &P> {
        self.members.iter().map(|m| &m.model)
    }

    /// Mean of every member's prediction, one per row of `data`.
    pub fn predict<R: AsRef<[f64]>>(&self, data: &[R]) -> Result<Vec<P::Target>, PredictError> {
        let rows = data.iter().map(|r| r.as_ref()).collect::<Vec<_>>();
        if let Some(row) = rows.iter().position(|r| r.len() != self.features_len) {
            return Err(PredictError::FeatureSizeMismatch {
                row,
                expected: self.features_len,
                actual: rows[row].len(),
            });
        }

        let mut members = self.members.iter();
        let mut total = match members.next() {
            Some(m) => m.model.predict(&rows),
            None => return Ok(Vec::new()),
        };
        debug_assert_eq!(total.len(), rows.len());
        for member in members {
            let predictions = member.model.predict(&rows);
            debug_assert_eq!(predictions.len(), rows.len());
            for (t, p) in total.iter_mut().zip(predictions) {
                t.add_assign(&p);
            }
        }

        let factor = 1.0 / self.members.len() as f64;
        for t in &mut total {
            t.scale(factor);
        }
        Ok(total)
    }

    /// Per training row, the predictions of every model whose bag left that row out.
    pub fn oob_predictions(&self) -> Result<OobPredictions<P::Target>, OobError> {
        let training = self.training.as_ref().ok_or(OobError::Disabled)?;
        Ok(OobPredictions::collect(
            self.members.iter().map(|m| (&m.bag, &m.model)),
            training,
        ))
    }

    /// Per training row, the mean OOB prediction or `None` if the row was in every bag.
    pub fn oob_averaged_predictions(&self) -> Result<Vec<Option<P::Target>>, OobError> {
        Ok(self.oob_predictions()?.averaged())
    }

    /// Mean squared error of the averaged OOB predictions against the training targets.
    pub fn oob_score(&self) -> Result<OobScore<P::Target>, OobError> {
        let training = self.training.as_ref().ok_or(OobError::Disabled)?;
        let averaged = self.oob_averaged_predictions()?;
        let score = OobScore::compute(&averaged, training.target());
        if score.mean_squared_error.is_none() {
            log::warn!(
                "no training row has a usable OOB prediction ({} uncovered, {} NaN)",
                score.uncovered,
                score.degenerate
            );
        } else {
            log::info!(
                "OOB score over {} rows ({} uncovered, {} NaN): {:?}",
                score.scored,
                score.uncovered,
                score.degenerate,
                score.mean_squared_error
            );
        }
        Ok(score)
    }
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("failed to fit the model of bag {bag}")]
    Model {
        bag: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictError {
    #[error("row {row} has {actual} features (expected {expected})")]
    FeatureSizeMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
