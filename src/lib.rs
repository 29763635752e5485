//! Bootstrap aggregating (bagging) of regression models with out-of-bag scoring.
//!
//! ```
//! use bagging::{BaggingOptions, DecisionTreeOptions};
//! use std::num::NonZeroUsize;
//!
//! let data = (0..100).map(|i| [i as f64 / 10.0]).collect::<Vec<_>>();
//! let target = data.iter().map(|x| x[0].sin()).collect::<Vec<_>>();
//!
//! let regressor = BaggingOptions::new()
//!     .num_bags(NonZeroUsize::new(20).unwrap())
//!     .oob(true)
//!     .seed(0)
//!     .fit(|| DecisionTreeOptions::new().max_depth(4), &data, &target)?;
//!
//! let predictions = regressor.predict(&[[1.5], [3.0]])?;
//! assert_eq!(predictions.len(), 2);
//!
//! let score = regressor.oob_score()?;
//! assert!(score.mean_squared_error.unwrap() < 0.2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub use bootstrap::{generate_splits, Bag};
pub use dataset::DatasetError;
pub use decision_tree::{DecisionTree, DecisionTreeOptions};
pub use ensemble::{BaggingOptions, BaggingRegressor, FitError, PredictError};
pub use model::{ConstantPredictor, MeanRegressor, Predictor, Regressor, TrainError};
pub use oob::{OobError, OobPredictions, OobScore};
pub use output::Output;

pub mod bootstrap;

mod dataset;
mod decision_tree;
mod ensemble;
mod functions;
mod model;
mod oob;
mod output;
