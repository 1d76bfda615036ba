use crate::core::align::OverWidthPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::{PredictorError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_ARTIFACT_DIR: &str = "models";
pub const DEFAULT_PREPROCESSOR_FILE: &str = "preprocessor.json";
pub const DEFAULT_MODEL_FILE: &str = "model.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifact_dir")]
    pub dir: String,
    #[serde(default = "default_preprocessor_file")]
    pub preprocessor: String,
    #[serde(default = "default_model_file")]
    pub model: String,
}

fn default_artifact_dir() -> String {
    DEFAULT_ARTIFACT_DIR.to_string()
}

fn default_preprocessor_file() -> String {
    DEFAULT_PREPROCESSOR_FILE.to_string()
}

fn default_model_file() -> String {
    DEFAULT_MODEL_FILE.to_string()
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            preprocessor: default_preprocessor_file(),
            model: default_model_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentConfig {
    #[serde(default)]
    pub over_width: OverWidthPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"))
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse the configuration from TOML text, expanding `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PredictorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.as_ref().map(|l| l.format).unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn artifact_dir(&self) -> &str {
        &self.artifacts.dir
    }

    fn preprocessor_file(&self) -> &str {
        &self.artifacts.preprocessor
    }

    fn model_file(&self) -> &str {
        &self.artifacts.model
    }

    fn over_width_policy(&self) -> OverWidthPolicy {
        self.alignment.over_width
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("artifacts.dir", &self.artifacts.dir)?;
        validation::validate_path("artifacts.preprocessor", &self.artifacts.preprocessor)?;
        validation::validate_path("artifacts.model", &self.artifacts.model)?;
        validation::validate_file_extension("artifacts.preprocessor", &self.artifacts.preprocessor, &["json"])?;
        validation::validate_file_extension("artifacts.model", &self.artifacts.model, &["json"])?;

        if let Some(level) = self.log_level() {
            validation::validate_non_empty_string("logging.level", level)?;
        }
        Ok(())
    }
}
