use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load {artifact} from '{path}': {reason}")]
    ArtifactLoadError {
        artifact: String,
        path: String,
        reason: String,
    },

    #[error("Feature transformation failed: {message}")]
    TransformError { message: String },

    #[error("Prediction failed: {message}")]
    PredictionError { message: String },

    #[error("Encoded feature width {actual} does not match model input width {expected}")]
    FeatureWidthError { actual: usize, expected: usize },

    #[error("Invalid value '{value}' for {field}")]
    InvalidInputError { field: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Input,
    Prediction,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PredictorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictorError::ConfigValidationError { .. }
            | PredictorError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PredictorError::ArtifactLoadError { .. } => ErrorCategory::Artifact,
            PredictorError::InvalidInputError { .. } | PredictorError::CsvError(_) => {
                ErrorCategory::Input
            }
            PredictorError::TransformError { .. }
            | PredictorError::PredictionError { .. }
            | PredictorError::FeatureWidthError { .. } => ErrorCategory::Prediction,
            PredictorError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Artifact => ErrorSeverity::Critical,
            ErrorCategory::Input | ErrorCategory::Prediction => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Medium,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PredictorError::ArtifactLoadError { artifact, path, .. } => format!(
                "Error loading model files: the {} at '{}' could not be loaded",
                artifact, path
            ),
            PredictorError::InvalidInputError { field, value } => {
                format!("'{}' is not a valid choice for {}", value, field)
            }
            PredictorError::FeatureWidthError { actual, expected } => format!(
                "The preprocessor produced {} features but the model expects {}",
                actual, expected
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command line flags and the TOML config file",
            ErrorCategory::Artifact => {
                "Ensure the artifact directory exists and contains valid preprocessor and model files"
            }
            ErrorCategory::Input => "Use one of the listed options for every field",
            ErrorCategory::Prediction => {
                "Check that the preprocessor and model artifacts were exported together"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// Process exit code for one-shot commands.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub(crate) fn artifact_load(
        artifact: &str,
        path: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        PredictorError::ArtifactLoadError {
            artifact: artifact.to_string(),
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
