use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener::analyzer::HttpAnalyzer;
use screener::config::Config;
use screener::controller::{CancellationSource, RequestController, RequestState};
use screener::models::ResumeFile;
use screener::projection::ResultsProjector;
use screener::report::{render, Palette};
use screener::theme::{FilePreferenceStore, ThemeStore};

/// Head start the controller deadline gets over the HTTP client timeout, so a
/// slow Analyzer surfaces as a timeout rather than a transport error.
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Score a resume against a job description")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a resume PDF and a job description to the Analyzer
    Analyze {
        /// Path to the resume PDF
        #[arg(long)]
        resume: PathBuf,

        /// File containing the job description
        #[arg(long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Print the projected results as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Disable ANSI colours
        #[arg(long)]
        no_color: bool,
    },
    /// Show or flip the persisted colour theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let mut theme = ThemeStore::load(Box::new(FilePreferenceStore::new(
        &config.preferences_path,
    )));

    match cli.command {
        Command::Analyze {
            resume,
            job,
            job_text,
            json,
            no_color,
        } => {
            let job_description = match (job, job_text) {
                (Some(path), _) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read job description {:?}", path))?,
                (None, Some(text)) => text,
                (None, None) => bail!("either --job or --job-text is required"),
            };

            let palette = if no_color || json {
                Palette::plain()
            } else {
                Palette::for_theme(theme.current())
            };

            run_analysis(&config, resume, job_description, json, &palette).await
        }
        Command::Theme { action } => {
            match action {
                ThemeAction::Show => println!("{}", theme.current()),
                ThemeAction::Toggle => {
                    let next = theme.toggle().context("Failed to save theme preference")?;
                    println!("{}", next);
                }
            }
            Ok(())
        }
    }
}

async fn run_analysis(
    config: &Config,
    resume: PathBuf,
    job_description: String,
    json: bool,
    palette: &Palette,
) -> Result<()> {
    let file = ResumeFile::from_path(&resume).await?;

    let analyzer = HttpAnalyzer::new(
        config.analyzer_url.clone(),
        config.analyzer_timeout + CLIENT_TIMEOUT_SLACK,
        config.payload_shape,
    )?;
    info!(
        "Analyzer endpoint: {} (shape: {}, timeout: {:?})",
        analyzer.endpoint(),
        config.payload_shape,
        config.analyzer_timeout
    );

    let controller = RequestController::new(
        Arc::new(analyzer),
        ResultsProjector::new(config.projection()),
        config.analyzer_timeout,
    );
    controller.set_file(Some(file))?;
    controller.set_job_description(job_description)?;

    let source = CancellationSource::new();
    let token = source.token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling analysis");
            source.cancel();
        }
    });

    let state = controller.submit(&token).await?;
    interrupt.abort();

    match state {
        RequestState::Success(view) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render(&view, palette));
            }
            Ok(())
        }
        RequestState::Failed(err) => bail!(err.user_message()),
        other => bail!("Submission ended in unexpected state '{}'", other.name()),
    }
}
