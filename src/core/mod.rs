pub mod align;
pub mod predictor;

pub use crate::domain::model::{FeatureMatrix, Prediction, StudentRecord};
pub use crate::domain::ports::{ConfigProvider, Model, Storage, Transformer};
pub use crate::utils::error::Result;
