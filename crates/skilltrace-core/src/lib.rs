//! skilltrace-core: sequential ability rating for timed, variable-difficulty items.
//!
//! Each observation (correctness, difficulty, response time) updates a
//! running rating: the prior rating and a logistic item-response likelihood
//! form a penalised negative log-posterior, and a grid search picks its
//! minimiser as the next rating.
//!
//! Data flows `params` → `response` → `loss` → `estimator` → `tracker`.

pub mod config;
pub mod error;
pub mod estimator;
pub mod loss;
pub mod model;
pub mod params;
pub mod parser;
pub mod report;
pub mod response;
pub mod statistics;
pub mod traits;
pub mod tracker;

pub use config::EstimatorConfig;
pub use error::{ConfigError, InvalidObservationError, ModelDomainError, RatingError};
pub use estimator::GridSearch;
pub use model::{Observation, RatingPoint, RatingTrace};
pub use tracker::RatingTracker;
