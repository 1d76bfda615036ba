pub mod batch;
pub mod form;

use crate::adapters::artifacts::{load_model, load_transformer};
use crate::adapters::storage::LocalStorage;
use crate::core::predictor::Predictor;
use crate::core::{ConfigProvider, Result};

/// Loads both artifacts and builds the predictor. Any failure here is fatal
/// to the session; callers must not start the form without a predictor.
pub async fn load_predictor<C: ConfigProvider>(config: &C) -> Result<Predictor> {
    let storage = LocalStorage::new(config.artifact_dir());
    tracing::info!(
        "Loading artifacts from {} and {}",
        storage.resolve(config.preprocessor_file()),
        storage.resolve(config.model_file())
    );

    let transformer = load_transformer(&storage, config.preprocessor_file()).await?;
    let model = load_model(&storage, config.model_file()).await?;

    let predictor = Predictor::new(transformer, model, config.over_width_policy());
    if predictor.encoded_width() < predictor.expected_width() {
        tracing::info!(
            "Preprocessor emits {} features, model expects {}; missing columns will be zero-filled",
            predictor.encoded_width(),
            predictor.expected_width()
        );
    } else if predictor.encoded_width() > predictor.expected_width() {
        tracing::warn!(
            "Preprocessor emits {} features but model expects {}; over-width policy is '{}'",
            predictor.encoded_width(),
            predictor.expected_width(),
            predictor.policy()
        );
    }
    Ok(predictor)
}
