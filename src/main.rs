use clap::Parser;
use score_predictor::app::{self, batch, form::PredictionForm};
use score_predictor::config::Command;
use score_predictor::utils::logger;
use score_predictor::{CliConfig, LocalStorage, PredictorError};
use std::io;

fn report_and_exit(context: &str, e: &PredictorError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            // The logger is not up yet; fall back to defaults so the failure is recorded.
            logger::init_logger(cli.verbose, None, cli.log_format.unwrap_or_default());
            report_and_exit("Configuration validation failed", &e);
        }
    };

    logger::init_logger(cli.verbose, config.log_level(), config.log_format());
    tracing::info!("Starting score-predictor");
    if let Some(path) = &cli.config {
        tracing::debug!("Loaded configuration from {}", path);
    }
    tracing::debug!("Resolved config: {:?}", config);

    // Load once, before any interaction. No predictor, no session.
    let predictor = match app::load_predictor(&config).await {
        Ok(predictor) => predictor,
        Err(e) => report_and_exit("Artifact loading failed", &e),
    };

    match cli.command() {
        Command::Form => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut form = PredictionForm::new(&predictor, stdin.lock(), stdout.lock());
            let summary = form.run()?;
            tracing::info!(
                "Session ended after {} submissions ({} failed)",
                summary.submissions,
                summary.failures
            );
        }
        Command::Predict(args) => match predictor.predict(&args.record()) {
            Ok(prediction) => {
                println!("The predicted average score is: {:.2}", prediction.score);
            }
            Err(e) => report_and_exit("Prediction failed", &e),
        },
        Command::Batch { input, output } => {
            let storage = LocalStorage::new("");
            if let Err(e) =
                batch::run_batch(&predictor, &storage, &input, output.as_deref(), io::stdout()).await
            {
                report_and_exit("Batch prediction failed", &e);
            }
        }
    }

    Ok(())
}
