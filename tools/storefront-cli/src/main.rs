use anyhow::Context;
use clap::{Parser, Subcommand};
use scenario_report::{render_text, RunDocument, RESULTS_FILE};
use scenario_world::{Profile, RunOptions, FEATURES_DIR};
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_core::{artifacts, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront CLI - OpenCart end-to-end suite")]
#[command(version = storefront_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the feature files
    Run {
        /// default, headed, dryrun or rerun
        #[arg(long, default_value = "default")]
        profile: Profile,
        #[arg(long, default_value = FEATURES_DIR)]
        features: PathBuf,
        /// Only run scenarios carrying one of these tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Create the report directories
    Prepare,
    /// Summarize a result document
    Report {
        /// Defaults to the document in the reports directory
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting {}", storefront_core::BUILD_INFO);

    let cli = Cli::parse();
    let config = Config::from_env().context("reading configuration")?;

    match cli.command {
        Commands::Run {
            profile,
            features,
            tags,
        } => handle_run(config, profile, features, tags).await,
        Commands::Prepare => handle_prepare(&config),
        Commands::Report { input } => handle_report(&config, input),
        Commands::Config => handle_config(config),
    }
}

async fn handle_run(
    config: Config,
    profile: Profile,
    features: PathBuf,
    tags: Vec<String>,
) -> anyhow::Result<ExitCode> {
    info!("Running {} with the {} profile", features.display(), profile);
    let options = RunOptions {
        profile,
        features,
        tags,
    };
    let document = scenario_world::run(config, options)
        .await
        .context("running the suite")?;
    println!("{}", render_text(&document.summary, &document.outcomes()));
    Ok(exit_code(&document))
}

fn handle_prepare(config: &Config) -> anyhow::Result<ExitCode> {
    for dir in artifacts::prepare_directories(config).context("creating report directories")? {
        println!("{}", dir.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_report(config: &Config, input: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let path = input.unwrap_or_else(|| config.reports_dir.join(RESULTS_FILE));
    let document =
        RunDocument::load(&path).with_context(|| format!("loading {}", path.display()))?;
    println!(
        "{} {} ({} to {})",
        document.suite,
        document.version,
        document.started_at.to_rfc3339(),
        document.finished_at.to_rfc3339()
    );
    println!("{}", render_text(&document.summary, &document.outcomes()));
    Ok(exit_code(&document))
}

fn handle_config(mut config: Config) -> anyhow::Result<ExitCode> {
    config.credentials.password = "********".to_string();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}

fn exit_code(document: &RunDocument) -> ExitCode {
    if document.summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_report::{ReportRecorder, ScenarioStatus};

    #[test]
    fn run_defaults_to_the_default_profile() {
        let cli = Cli::try_parse_from(["storefront", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                profile,
                features,
                tags,
            } => {
                assert_eq!(profile, Profile::Default);
                assert_eq!(features, PathBuf::from(FEATURES_DIR));
                assert!(tags.is_empty());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_accepts_profile_and_tag_list() {
        let cli = Cli::try_parse_from([
            "storefront",
            "run",
            "--profile",
            "rerun",
            "--tags",
            "smoke,@cart",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { profile, tags, .. } => {
                assert_eq!(profile, Profile::Rerun);
                assert_eq!(tags, vec!["smoke".to_string(), "@cart".to_string()]);
            }
            _ => panic!("expected run"),
        }
        assert!(Cli::try_parse_from(["storefront", "run", "--profile", "nightly"]).is_err());
    }

    #[test]
    fn report_exit_code_follows_failures() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ReportRecorder::new();
        let id = recorder.start("Checkout", "Guest checkout", Vec::new(), None, 1);
        recorder.finish(id, ScenarioStatus::Failed, None).unwrap();
        let path = dir.path().join(RESULTS_FILE);
        RunDocument::from_recorder(&recorder).write(&path).unwrap();

        let code = handle_report(&Config::default(), Some(path)).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }
}
