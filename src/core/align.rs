use crate::domain::model::FeatureMatrix;
use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when the preprocessor emits more columns than the model takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OverWidthPolicy {
    /// Hand the wide matrix to the model unchanged.
    Passthrough,
    /// Drop the surplus right-hand columns.
    Trim,
    #[default]
    Reject,
}

impl fmt::Display for OverWidthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverWidthPolicy::Passthrough => "passthrough",
            OverWidthPolicy::Trim => "trim",
            OverWidthPolicy::Reject => "reject",
        })
    }
}

impl FromStr for OverWidthPolicy {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" => Ok(OverWidthPolicy::Passthrough),
            "trim" => Ok(OverWidthPolicy::Trim),
            "reject" => Ok(OverWidthPolicy::Reject),
            _ => Err(PredictorError::InvalidConfigValueError {
                field: "alignment.over_width".to_string(),
                value: s.to_string(),
                reason: "Valid policies: passthrough, trim, reject".to_string(),
            }),
        }
    }
}

/// Reconciles the encoded width with the width the model was fitted on.
///
/// Narrow matrices get zero columns appended on the right, so every original
/// value keeps its position. An exact match is returned as is. Wide matrices
/// are handled by `policy`.
pub fn align_features(
    features: &FeatureMatrix,
    expected_width: usize,
    policy: OverWidthPolicy,
) -> Result<FeatureMatrix> {
    let actual = features.cols();

    if expected_width > actual {
        return Ok(features.pad_columns(expected_width - actual));
    }
    if expected_width == actual {
        return Ok(features.clone());
    }

    match policy {
        OverWidthPolicy::Passthrough => Ok(features.clone()),
        OverWidthPolicy::Trim => Ok(features.truncate_columns(expected_width)),
        OverWidthPolicy::Reject => Err(PredictorError::FeatureWidthError {
            actual,
            expected: expected_width,
        }),
    }
}
