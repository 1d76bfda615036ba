use crate::config::toml_config::TomlConfig;
use crate::core::align::OverWidthPolicy;
use crate::domain::model::{
    Gender, Lunch, ParentalEducation, RaceEthnicity, StudentRecord, TestPreparation,
};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "score-predictor")]
#[command(about = "Predict a student's average score from background and preparation")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the artifact paths are resolved against
    #[arg(long)]
    pub artifact_dir: Option<String>,

    /// Preprocessor artifact (JSON)
    #[arg(long)]
    pub preprocessor: Option<String>,

    /// Model artifact (JSON)
    #[arg(long)]
    pub model: Option<String>,

    /// How to handle more encoded features than the model takes
    #[arg(long, value_enum)]
    pub over_width: Option<OverWidthPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive prediction form (default)
    Form,
    /// Predict a single record given on the command line
    Predict(PredictArgs),
    /// Predict every row of a CSV file
    Batch {
        /// Input CSV with the five attribute columns
        input: String,

        /// Output CSV; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    #[arg(long)]
    pub gender: Gender,

    #[arg(long)]
    pub race_ethnicity: RaceEthnicity,

    #[arg(long)]
    pub parental_education: ParentalEducation,

    #[arg(long)]
    pub lunch: Lunch,

    #[arg(long)]
    pub test_prep: TestPreparation,
}

impl PredictArgs {
    pub fn record(&self) -> StudentRecord {
        StudentRecord {
            gender: self.gender,
            race_ethnicity: self.race_ethnicity,
            parental_education: self.parental_education,
            lunch: self.lunch,
            test_preparation: self.test_prep,
        }
    }
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Form)
    }

    /// Loads the TOML file when one is given, then applies flag overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(dir) = &self.artifact_dir {
            config.artifacts.dir = dir.clone();
        }
        if let Some(preprocessor) = &self.preprocessor {
            config.artifacts.preprocessor = preprocessor.clone();
        }
        if let Some(model) = &self.model {
            config.artifacts.model = model.clone();
        }
        if let Some(policy) = self.over_width {
            config.alignment.over_width = policy;
        }
        if let Some(format) = self.log_format {
            config.logging.get_or_insert_with(Default::default).format = format;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_defaults_to_form() {
        let cli = CliConfig::parse_from(["score-predictor"]);
        assert!(matches!(cli.command(), Command::Form));

        let config = cli.resolve().unwrap();
        assert_eq!(config.artifact_dir(), "models");
        assert_eq!(config.over_width_policy(), OverWidthPolicy::Reject);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "score-predictor",
            "--artifact-dir",
            "/tmp/artifacts",
            "--model",
            "forest.json",
            "--over-width",
            "passthrough",
            "--log-format",
            "json",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.artifact_dir(), "/tmp/artifacts");
        assert_eq!(config.model_file(), "forest.json");
        assert_eq!(config.preprocessor_file(), "preprocessor.json");
        assert_eq!(config.over_width_policy(), OverWidthPolicy::Passthrough);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_predict_subcommand_parses_labels() {
        let cli = CliConfig::parse_from([
            "score-predictor",
            "predict",
            "--gender",
            "female",
            "--race-ethnicity",
            "group B",
            "--parental-education",
            "bachelor's degree",
            "--lunch",
            "free/reduced",
            "--test-prep",
            "completed",
        ]);

        let Command::Predict(args) = cli.command() else {
            panic!("expected predict subcommand");
        };
        let record = args.record();
        assert_eq!(record.race_ethnicity, RaceEthnicity::GroupB);
        assert_eq!(record.parental_education, ParentalEducation::BachelorsDegree);
        assert_eq!(record.lunch, Lunch::FreeReduced);
    }

    #[test]
    fn test_predict_subcommand_rejects_unknown_label() {
        let result = CliConfig::try_parse_from([
            "score-predictor",
            "predict",
            "--gender",
            "other",
            "--race-ethnicity",
            "group B",
            "--parental-education",
            "high school",
            "--lunch",
            "standard",
            "--test-prep",
            "none",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_artifact_extension_fails_validation() {
        let cli = CliConfig::parse_from(["score-predictor", "--model", "model.pkl"]);
        assert!(cli.resolve().is_err());
    }
}
