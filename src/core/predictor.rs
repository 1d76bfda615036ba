use crate::core::align::{align_features, OverWidthPolicy};
use crate::domain::model::{Prediction, StudentRecord};
use crate::domain::ports::{Model, Transformer};
use crate::utils::error::{PredictorError, Result};
use std::sync::Arc;

/// Holds the loaded artifacts and runs transform, align, predict.
///
/// Built once at startup; the artifacts are never mutated afterwards.
#[derive(Clone)]
pub struct Predictor {
    transformer: Arc<dyn Transformer>,
    model: Arc<dyn Model>,
    policy: OverWidthPolicy,
}

impl Predictor {
    pub fn new(
        transformer: Arc<dyn Transformer>,
        model: Arc<dyn Model>,
        policy: OverWidthPolicy,
    ) -> Self {
        Self {
            transformer,
            model,
            policy,
        }
    }

    pub fn expected_width(&self) -> usize {
        self.model.n_features_in()
    }

    pub fn encoded_width(&self) -> usize {
        self.transformer.output_width()
    }

    pub fn policy(&self) -> OverWidthPolicy {
        self.policy
    }

    pub fn predict(&self, record: &StudentRecord) -> Result<Prediction> {
        let encoded = self.transformer.transform(std::slice::from_ref(record))?;
        let expected = self.expected_width();
        tracing::debug!(
            "Encoded {:?} against model width {}",
            encoded.shape(),
            expected
        );

        let aligned = align_features(&encoded, expected, self.policy)?;
        if aligned.cols() != encoded.cols() {
            tracing::debug!(
                "Aligned features from {} to {} columns",
                encoded.cols(),
                aligned.cols()
            );
        }

        let scores = self.model.predict(&aligned)?;
        let score = scores
            .first()
            .copied()
            .ok_or_else(|| PredictorError::PredictionError {
                message: "model returned no prediction".to_string(),
            })?;

        Ok(Prediction {
            score,
            encoded_width: encoded.cols(),
            model_width: expected,
        })
    }

    pub fn predict_batch(&self, records: &[StudentRecord]) -> Result<Vec<f64>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = self.transformer.transform(records)?;
        let aligned = align_features(&encoded, self.expected_width(), self.policy)?;
        let scores = self.model.predict(&aligned)?;

        if scores.len() != records.len() {
            return Err(PredictorError::PredictionError {
                message: format!(
                    "model returned {} predictions for {} records",
                    scores.len(),
                    records.len()
                ),
            });
        }
        Ok(scores)
    }
}
