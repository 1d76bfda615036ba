use crate::core::{FeatureMatrix, Model, Result};
use crate::utils::error::PredictorError;
use serde::{Deserialize, Serialize};

fn check_width(features: &FeatureMatrix, expected: usize) -> Result<()> {
    if features.cols() != expected {
        return Err(PredictorError::PredictionError {
            message: format!(
                "X has {} features, but the model is expecting {} features as input",
                features.cols(),
                expected
            ),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub n_features_in: usize,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.coefficients.len() != self.n_features_in {
            return Err(format!(
                "{} coefficients for {} input features",
                self.coefficients.len(),
                self.n_features_in
            ));
        }
        Ok(())
    }
}

impl Model for LinearRegressor {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        check_width(features, self.n_features_in)?;
        Ok(features
            .iter_rows()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat regression tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, n_features_in: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= n_features_in {
                    return Err(format!(
                        "node {} splits on feature {} but the model has {} features",
                        index, feature, n_features_in
                    ));
                }
                // Children after parents rules out cycles.
                for child in [left, right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", index, child));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Averages the outputs of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    pub n_features_in: usize,
    pub trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features_in)
                .map_err(|reason| format!("tree {}: {}", index, reason))?;
        }
        Ok(())
    }
}

impl Model for RandomForestRegressor {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        check_width(features, self.n_features_in)?;
        let n_trees = self.trees.len() as f64;
        Ok(features
            .iter_rows()
            .map(|row| self.trees.iter().map(|t| t.evaluate(row)).sum::<f64>() / n_trees)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_linear_predict() {
        let model = LinearRegressor {
            n_features_in: 3,
            coefficients: vec![1.0, -2.0, 0.5],
            intercept: 60.0,
        };
        let features = FeatureMatrix::from_rows(vec![vec![1.0, 1.0, 2.0], vec![0.0, 0.0, 0.0]]).unwrap();

        assert_eq!(model.predict(&features).unwrap(), vec![60.0, 60.0]);
    }

    #[test]
    fn test_linear_rejects_wrong_width() {
        let model = LinearRegressor {
            n_features_in: 2,
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
        };
        let features = FeatureMatrix::new(1, 3, vec![1.0, 1.0, 1.0]).unwrap();

        let err = model.predict(&features).unwrap_err();
        assert!(err.to_string().contains("X has 3 features"));
    }

    #[test]
    fn test_linear_validate_checks_coefficient_count() {
        let model = LinearRegressor {
            n_features_in: 4,
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForestRegressor {
            n_features_in: 2,
            trees: vec![stump(0, 0.5, 60.0, 70.0), stump(1, 0.5, 50.0, 80.0)],
        };
        assert!(forest.validate().is_ok());

        let features = FeatureMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(forest.predict(&features).unwrap(), vec![60.0, 70.0]);
    }

    #[test]
    fn test_forest_validate_rejects_bad_trees() {
        let out_of_range = RandomForestRegressor {
            n_features_in: 1,
            trees: vec![stump(3, 0.5, 1.0, 2.0)],
        };
        assert!(out_of_range.validate().unwrap_err().contains("feature 3"));

        let cyclic = RandomForestRegressor {
            n_features_in: 1,
            trees: vec![RegressionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                }],
            }],
        };
        assert!(cyclic.validate().is_err());

        let empty = RandomForestRegressor {
            n_features_in: 1,
            trees: vec![],
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_tree_nodes_deserialize_untagged() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{"nodes": [{"feature": 0, "threshold": 0.5, "left": 1, "right": 2}, {"value": 61.5}, {"value": 72.0}]}"#,
        )
        .unwrap();
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.evaluate(&[1.0]), 72.0);
    }
}
