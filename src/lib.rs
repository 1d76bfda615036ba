pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use core::{align::OverWidthPolicy, predictor::Predictor};
pub use domain::model::{FeatureMatrix, Prediction, StudentRecord};
pub use utils::error::{PredictorError, Result};
