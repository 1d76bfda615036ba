use crate::adapters::preprocessor::ColumnEncoder;
use crate::adapters::regressor::{LinearRegressor, RandomForestRegressor};
use crate::core::{Model, Result, Storage, Transformer};
use crate::utils::error::PredictorError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const PREPROCESSOR: &str = "preprocessor";
pub const MODEL: &str = "model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreprocessorArtifact {
    ColumnEncoder(ColumnEncoder),
}

impl PreprocessorArtifact {
    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            PreprocessorArtifact::ColumnEncoder(encoder) => encoder.validate(),
        }
    }

    fn into_transformer(self) -> Arc<dyn Transformer> {
        match self {
            PreprocessorArtifact::ColumnEncoder(encoder) => Arc::new(encoder),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor),
    RandomForest(RandomForestRegressor),
}

impl ModelArtifact {
    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::RandomForest(model) => model.validate(),
        }
    }

    fn into_model(self) -> Arc<dyn Model> {
        match self {
            ModelArtifact::Linear(model) => Arc::new(model),
            ModelArtifact::RandomForest(model) => Arc::new(model),
        }
    }
}

async fn read_artifact<S: Storage, T: serde::de::DeserializeOwned>(
    storage: &S,
    artifact: &str,
    path: &str,
) -> Result<T> {
    let bytes = storage
        .read_file(path)
        .await
        .map_err(|e| PredictorError::artifact_load(artifact, path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| PredictorError::artifact_load(artifact, path, e))
}

pub async fn load_transformer<S: Storage>(storage: &S, path: &str) -> Result<Arc<dyn Transformer>> {
    tracing::debug!("Loading preprocessor from {}", path);
    let artifact: PreprocessorArtifact = read_artifact(storage, PREPROCESSOR, path).await?;
    artifact
        .validate()
        .map_err(|reason| PredictorError::artifact_load(PREPROCESSOR, path, reason))?;

    let transformer = artifact.into_transformer();
    tracing::info!(
        "Loaded preprocessor ({} output features)",
        transformer.output_width()
    );
    Ok(transformer)
}

pub async fn load_model<S: Storage>(storage: &S, path: &str) -> Result<Arc<dyn Model>> {
    tracing::debug!("Loading model from {}", path);
    let artifact: ModelArtifact = read_artifact(storage, MODEL, path).await?;
    artifact
        .validate()
        .map_err(|reason| PredictorError::artifact_load(MODEL, path, reason))?;

    let model = artifact.into_model();
    tracing::info!("Loaded model ({} input features)", model.n_features_in());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: Mutex::new(
                    files
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                        .collect(),
                ),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                PredictorError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_linear_model() {
        let storage = MockStorage::with(&[(
            "model.json",
            r#"{"kind": "linear", "n_features_in": 2, "coefficients": [1.5, -1.0], "intercept": 66.0}"#,
        )]);

        let model = load_model(&storage, "model.json").await.unwrap();
        assert_eq!(model.n_features_in(), 2);
    }

    #[tokio::test]
    async fn test_load_random_forest_model() {
        let storage = MockStorage::with(&[(
            "forest.json",
            r#"{"kind": "random_forest", "n_features_in": 1, "trees": [
                {"nodes": [{"feature": 0, "threshold": 0.5, "left": 1, "right": 2}, {"value": 60.0}, {"value": 70.0}]}
            ]}"#,
        )]);

        let model = load_model(&storage, "forest.json").await.unwrap();
        assert_eq!(model.n_features_in(), 1);
    }

    #[tokio::test]
    async fn test_load_preprocessor() {
        let storage = MockStorage::with(&[(
            "pre.json",
            r#"{"kind": "column_encoder", "encoders": [
                {"encoding": "one_hot", "column": "gender", "categories": ["female", "male"]}
            ]}"#,
        )]);

        let transformer = load_transformer(&storage, "pre.json").await.unwrap();
        assert_eq!(transformer.output_width(), 2);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_load_error() {
        let storage = MockStorage::with(&[]);

        let err = load_model(&storage, "models/model.json").await.err().unwrap();
        match err {
            PredictorError::ArtifactLoadError { artifact, path, .. } => {
                assert_eq!(artifact, "model");
                assert_eq!(path, "models/model.json");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_corrupt_artifact_is_load_error() {
        let storage = MockStorage::with(&[("pre.json", "\u{0}\u{1}not json")]);

        let err = load_transformer(&storage, "pre.json").await.err().unwrap();
        assert!(matches!(err, PredictorError::ArtifactLoadError { .. }));
    }

    #[tokio::test]
    async fn test_invalid_artifact_is_load_error() {
        let storage = MockStorage::with(&[(
            "model.json",
            r#"{"kind": "linear", "n_features_in": 3, "coefficients": [1.0], "intercept": 0.0}"#,
        )]);

        let err = load_model(&storage, "model.json").await.err().unwrap();
        assert!(err.to_string().contains("1 coefficients for 3 input features"));
    }
}
