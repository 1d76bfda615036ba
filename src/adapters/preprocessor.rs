use crate::core::{FeatureMatrix, Result, StudentRecord, Transformer};
use crate::utils::error::PredictorError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Unknown categories encode as all zeros (one-hot) or -1 (ordinal).
    Ignore,
    #[default]
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum ColumnEncoding {
    OneHot {
        column: String,
        categories: Vec<String>,
        #[serde(default)]
        drop_first: bool,
    },
    Ordinal {
        column: String,
        categories: Vec<String>,
    },
}

impl ColumnEncoding {
    pub fn column(&self) -> &str {
        match self {
            ColumnEncoding::OneHot { column, .. } | ColumnEncoding::Ordinal { column, .. } => column,
        }
    }

    fn categories(&self) -> &[String] {
        match self {
            ColumnEncoding::OneHot { categories, .. }
            | ColumnEncoding::Ordinal { categories, .. } => categories,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            ColumnEncoding::OneHot {
                categories,
                drop_first,
                ..
            } => categories.len().saturating_sub(usize::from(*drop_first)),
            ColumnEncoding::Ordinal { .. } => 1,
        }
    }

    fn encode(&self, value: &str, handle_unknown: HandleUnknown, out: &mut Vec<f64>) -> Result<()> {
        let position = self.categories().iter().position(|c| c == value);
        if position.is_none() && handle_unknown == HandleUnknown::Error {
            return Err(PredictorError::TransformError {
                message: format!(
                    "found unknown category '{}' in column '{}'",
                    value,
                    self.column()
                ),
            });
        }

        match self {
            ColumnEncoding::OneHot { drop_first, .. } => {
                let skip = usize::from(*drop_first);
                let start = out.len();
                out.extend(std::iter::repeat(0.0).take(self.width()));
                if let Some(index) = position.filter(|&i| i >= skip) {
                    out[start + index - skip] = 1.0;
                }
            }
            ColumnEncoding::Ordinal { .. } => {
                out.push(position.map(|i| i as f64).unwrap_or(-1.0));
            }
        }
        Ok(())
    }
}

/// Per-column categorical encoder whose outputs are concatenated in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEncoder {
    pub encoders: Vec<ColumnEncoding>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

impl ColumnEncoder {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.encoders.is_empty() {
            return Err("preprocessor has no column encoders".to_string());
        }

        for encoder in &self.encoders {
            let column = encoder.column();
            if !StudentRecord::COLUMNS.contains(&column) {
                return Err(format!(
                    "unknown column '{}'; expected one of: {}",
                    column,
                    StudentRecord::COLUMNS.join(", ")
                ));
            }

            let categories = encoder.categories();
            if categories.is_empty() {
                return Err(format!("column '{}' has no categories", column));
            }
            let unique: HashSet<&String> = categories.iter().collect();
            if unique.len() != categories.len() {
                return Err(format!("column '{}' lists a category twice", column));
            }
        }
        Ok(())
    }
}

impl Transformer for ColumnEncoder {
    fn transform(&self, records: &[StudentRecord]) -> Result<FeatureMatrix> {
        let width = self.output_width();
        let mut data = Vec::with_capacity(records.len() * width);

        for record in records {
            for encoder in &self.encoders {
                let value = record.value_of(encoder.column()).ok_or_else(|| {
                    PredictorError::TransformError {
                        message: format!("record has no column '{}'", encoder.column()),
                    }
                })?;
                encoder.encode(value, self.handle_unknown, &mut data)?;
            }
        }

        FeatureMatrix::new(records.len(), width, data)
    }

    fn output_width(&self) -> usize {
        self.encoders.iter().map(ColumnEncoding::width).sum()
    }
}
