use crate::core::align::OverWidthPolicy;
use crate::domain::model::{FeatureMatrix, StudentRecord};
use crate::utils::error::Result;

/// Encodes categorical records into a numeric feature matrix.
pub trait Transformer: Send + Sync {
    fn transform(&self, records: &[StudentRecord]) -> Result<FeatureMatrix>;
    fn output_width(&self) -> usize;
}

/// Maps an encoded feature matrix to one score per row.
pub trait Model: Send + Sync {
    fn n_features_in(&self) -> usize;
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn artifact_dir(&self) -> &str;
    fn preprocessor_file(&self) -> &str;
    fn model_file(&self) -> &str;
    fn over_width_policy(&self) -> OverWidthPolicy;
}
