use clap::Parser;
use log::LevelFilter;
use repolens_lib::config::Config;
use repolens_lib::error::RunError;
use repolens_lib::github::GitHubClient;
use repolens_lib::llm::CompletionClient;
use repolens_lib::output::write_report;
use repolens_lib::pipeline::Pipeline;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Analyze a GitHub repository and write a JSON metadata/insight report.
#[derive(Debug, Parser)]
#[command(name = "repolens", version, about)]
struct Cli {
    /// Repository owner (user or organization).
    owner: String,

    /// Repository name.
    repo: String,

    /// Path the JSON report is written to.
    #[arg(short, long, default_value = "report.json")]
    output: PathBuf,

    /// Abort the whole run after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log stage progress and skipped manifests.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: &Cli) -> Result<(), RunError> {
    let config = Config::from_env()?;

    let host = GitHubClient::new(&config.github)?;
    let generator = CompletionClient::new(config.generation.clone())
        .map_err(|e| RunError::Configuration(e.to_string()))?;

    let pipeline = Pipeline::new(&host, &generator);
    let report = pipeline
        .run_with_timeout(
            &cli.owner,
            &cli.repo,
            cli.timeout_secs.map(Duration::from_secs),
        )
        .await?;

    for entry in &report.analysis_metadata.errors {
        eprintln!("warning: {entry}");
    }

    write_report(&report, &cli.output)
}
