use crate::utils::error::{PredictorError, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a closed categorical field: variants, their display labels and
/// the column name the preprocessor knows them by.
macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const FIELD: &'static str = $field;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = PredictorError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| PredictorError::InvalidInputError {
                        field: $field.to_string(),
                        value: s.to_string(),
                    })
            }
        }

        // Serde goes through the same labels as `FromStr` so CSV rows accept
        // whatever the form and flags accept.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

categorical!(Gender, "gender", {
    Female => "female",
    Male => "male",
});

categorical!(RaceEthnicity, "race/ethnicity", {
    GroupA => "group A",
    GroupB => "group B",
    GroupC => "group C",
    GroupD => "group D",
    GroupE => "group E",
});

categorical!(
    /// Ordered from least to most education.
    ParentalEducation, "parental level of education", {
    SomeHighSchool => "some high school",
    HighSchool => "high school",
    SomeCollege => "some college",
    AssociatesDegree => "associate's degree",
    BachelorsDegree => "bachelor's degree",
    MastersDegree => "master's degree",
});

categorical!(Lunch, "lunch", {
    Standard => "standard",
    FreeReduced => "free/reduced",
});

categorical!(TestPreparation, "test preparation course", {
    None => "none",
    Completed => "completed",
});

/// One student as entered in the form or read from a batch CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub gender: Gender,
    #[serde(rename = "race/ethnicity")]
    pub race_ethnicity: RaceEthnicity,
    #[serde(rename = "parental level of education")]
    pub parental_education: ParentalEducation,
    pub lunch: Lunch,
    #[serde(rename = "test preparation course")]
    pub test_preparation: TestPreparation,
}

impl StudentRecord {
    pub const COLUMNS: [&'static str; 5] = [
        Gender::FIELD,
        RaceEthnicity::FIELD,
        ParentalEducation::FIELD,
        Lunch::FIELD,
        TestPreparation::FIELD,
    ];

    /// Label of the named column, as the preprocessor sees it.
    pub fn value_of(&self, column: &str) -> Option<&'static str> {
        match column {
            Gender::FIELD => Some(self.gender.label()),
            RaceEthnicity::FIELD => Some(self.race_ethnicity.label()),
            ParentalEducation::FIELD => Some(self.parental_education.label()),
            Lunch::FIELD => Some(self.lunch.label()),
            TestPreparation::FIELD => Some(self.test_preparation.label()),
            _ => None,
        }
    }

    /// Every combination of the five enumerations.
    pub fn all_combinations() -> impl Iterator<Item = StudentRecord> {
        Gender::ALL.iter().flat_map(|&gender| {
            RaceEthnicity::ALL.iter().flat_map(move |&race_ethnicity| {
                ParentalEducation::ALL.iter().flat_map(move |&parental_education| {
                    Lunch::ALL.iter().flat_map(move |&lunch| {
                        TestPreparation::ALL.iter().map(move |&test_preparation| StudentRecord {
                            gender,
                            race_ethnicity,
                            parental_education,
                            lunch,
                            test_preparation,
                        })
                    })
                })
            })
        })
    }
}

/// Dense row-major matrix of encoded features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(PredictorError::TransformError {
                message: format!(
                    "matrix of shape ({}, {}) needs {} values, got {}",
                    rows,
                    cols,
                    rows * cols,
                    data.len()
                ),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let n_rows = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(PredictorError::TransformError {
                message: format!("ragged rows: expected width {}, found {}", cols, bad.len()),
            });
        }
        Ok(Self {
            rows: n_rows,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Appends `extra` zero columns to the right of every row.
    pub fn pad_columns(&self, extra: usize) -> Self {
        let cols = self.cols + extra;
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in self.iter_rows() {
            data.extend_from_slice(row);
            data.extend(std::iter::repeat(0.0).take(extra));
        }
        Self {
            rows: self.rows,
            cols,
            data,
        }
    }

    /// Keeps the leftmost `cols` columns of every row.
    pub fn truncate_columns(&self, cols: usize) -> Self {
        let cols = cols.min(self.cols);
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in self.iter_rows() {
            data.extend_from_slice(&row[..cols]);
        }
        Self {
            rows: self.rows,
            cols,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub score: f64,
    pub encoded_width: usize,
    pub model_width: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("Group C".parse::<RaceEthnicity>().unwrap(), RaceEthnicity::GroupC);
        assert_eq!(
            "free/reduced".parse::<Lunch>().unwrap(),
            Lunch::FreeReduced
        );
        assert_eq!(
            " associate's degree ".parse::<ParentalEducation>().unwrap(),
            ParentalEducation::AssociatesDegree
        );
    }

    #[test]
    fn test_unknown_label_names_field() {
        let err = "group F".parse::<RaceEthnicity>().unwrap_err();
        match err {
            PredictorError::InvalidInputError { field, value } => {
                assert_eq!(field, "race/ethnicity");
                assert_eq!(value, "group F");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serde_shares_label_parsing() {
        let gender: Gender = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(gender, Gender::Female);
        let group: RaceEthnicity = serde_json::from_str("\" Group B \"").unwrap();
        assert_eq!(group, RaceEthnicity::GroupB);
        assert_eq!(
            serde_json::to_string(&ParentalEducation::AssociatesDegree).unwrap(),
            "\"associate's degree\""
        );

        let err = serde_json::from_str::<Lunch>("\"packed\"").unwrap_err();
        assert!(err.to_string().contains("Invalid value 'packed' for lunch"));
    }

    #[test]
    fn test_enumeration_sizes() {
        assert_eq!(Gender::ALL.len(), 2);
        assert_eq!(RaceEthnicity::ALL.len(), 5);
        assert_eq!(ParentalEducation::ALL.len(), 6);
        assert_eq!(Lunch::ALL.len(), 2);
        assert_eq!(TestPreparation::ALL.len(), 2);
        assert_eq!(StudentRecord::all_combinations().count(), 240);
    }

    #[test]
    fn test_value_of_known_and_unknown_columns() {
        let record = StudentRecord {
            gender: Gender::Male,
            race_ethnicity: RaceEthnicity::GroupB,
            parental_education: ParentalEducation::HighSchool,
            lunch: Lunch::Standard,
            test_preparation: TestPreparation::Completed,
        };
        assert_eq!(record.value_of("lunch"), Some("standard"));
        assert_eq!(record.value_of("test preparation course"), Some("completed"));
        assert_eq!(record.value_of("math score"), None);
    }

    #[test]
    fn test_pad_and_truncate_columns() {
        let matrix = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        let padded = matrix.pad_columns(2);
        assert_eq!(padded.shape(), (2, 4));
        assert_eq!(padded.row(0), &[1.0, 2.0, 0.0, 0.0]);
        assert_eq!(padded.row(1), &[3.0, 4.0, 0.0, 0.0]);

        let trimmed = padded.truncate_columns(1);
        assert_eq!(trimmed.shape(), (2, 1));
        assert_eq!(trimmed.row(1), &[3.0]);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(FeatureMatrix::new(1, 3, vec![1.0, 2.0]).is_err());
        assert!(FeatureMatrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
