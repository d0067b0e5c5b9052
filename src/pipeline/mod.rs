use crate::analysis::insights::parse_generation_response;
use crate::analysis::manifests::{manifest_ecosystem, parse_manifest};
use crate::analysis::metrics::compute_metrics;
use crate::config::validate_repo_slug;
use crate::error::{ExtractionError, RunError};
use crate::github::RepositoryHost;
use crate::llm::{prompts, TextGenerator};
use crate::models::dependency::DependencyRecord;
use crate::models::insight::InsightBundle;
use crate::models::metrics::CodeMetrics;
use crate::models::report::Report;
use crate::models::snapshot::RepositorySnapshot;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Forward-progressing stages of one analysis run. Recoverable errors never
/// leave this track; fatal errors abort the run from whatever stage was
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Fetched,
    Extracted,
    Synthesized,
    Assembled,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Start => Stage::Fetched,
            Stage::Fetched => Stage::Extracted,
            Stage::Extracted => Stage::Synthesized,
            Stage::Synthesized => Stage::Assembled,
            Stage::Assembled | Stage::Done => Stage::Done,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Fetched => "fetch",
            Stage::Extracted => "extract",
            Stage::Synthesized => "synthesize",
            Stage::Assembled => "assemble",
            Stage::Done => "done",
        }
    }
}

/// Linear four-stage pipeline over a repository host and a text generator.
/// Each stage consumes the previous stage's full output; the only internal
/// concurrency is the per-manifest content fetches.
pub struct Pipeline<'a> {
    host: &'a dyn RepositoryHost,
    generator: &'a dyn TextGenerator,
}

impl<'a> Pipeline<'a> {
    pub fn new(host: &'a dyn RepositoryHost, generator: &'a dyn TextGenerator) -> Self {
        Pipeline { host, generator }
    }

    /// Run the full pipeline. Recoverable errors accumulate into the report;
    /// fatal errors abort with no report.
    pub async fn run(&self, owner: &str, name: &str) -> Result<Report, RunError> {
        self.run_tracked(owner, name, &Mutex::new(Stage::Start)).await
    }

    /// Run with an overall deadline. On expiry the in-progress stage is
    /// reported as the failed one.
    pub async fn run_with_timeout(
        &self,
        owner: &str,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<Report, RunError> {
        let Some(timeout) = timeout else {
            return self.run(owner, name).await;
        };

        let progress = Arc::new(Mutex::new(Stage::Start));
        let tracked = self.run_tracked(owner, name, &progress);
        match tokio::time::timeout(timeout, tracked).await {
            Ok(result) => result,
            Err(_) => {
                let stage = progress.lock().map(|s| *s).unwrap_or(Stage::Start);
                Err(RunError::Timeout {
                    stage: stage.next().name(),
                })
            }
        }
    }

    async fn run_tracked(
        &self,
        owner: &str,
        name: &str,
        progress: &Mutex<Stage>,
    ) -> Result<Report, RunError> {
        validate_repo_slug(owner, name)?;

        let mut errors: Vec<String> = Vec::new();

        let snapshot = self.fetch_snapshot(owner, name).await?;
        advance(progress);
        info!(
            "fetched snapshot of {owner}/{name}: {} files, default branch {}",
            snapshot.files.len(),
            snapshot.default_branch
        );

        let metrics = compute_metrics(&snapshot.files);
        let dependencies = self.extract_dependencies(&snapshot, &mut errors).await;
        advance(progress);
        info!(
            "extracted {} dependency records from {owner}/{name}",
            dependencies.len()
        );

        let analysis = self
            .synthesize(&snapshot, &metrics, &dependencies, &mut errors)
            .await;
        advance(progress);

        let report = Report::assemble(
            &snapshot,
            metrics,
            dependencies,
            analysis,
            errors,
            Utc::now(),
        );
        advance(progress);
        debug!("assembled report for {owner}/{name}");

        advance(progress);
        Ok(report)
    }

    async fn fetch_snapshot(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositorySnapshot, RunError> {
        let attributes = self.host.fetch_repository(owner, name).await?;
        let files = self
            .host
            .fetch_file_listing(owner, name, &attributes.default_branch)
            .await?;
        let readme = self.host.fetch_readme(owner, name).await?;

        Ok(RepositorySnapshot {
            url: RepositorySnapshot::repo_url(&attributes.owner, &attributes.name),
            owner: attributes.owner,
            name: attributes.name,
            description: attributes.description,
            default_branch: attributes.default_branch,
            languages: attributes.languages,
            readme,
            files,
        })
    }

    /// Fetch and parse every manifest in the listing. The fetches share no
    /// state, so they run concurrently; `join_all` keeps discovery order.
    async fn extract_dependencies(
        &self,
        snapshot: &RepositorySnapshot,
        errors: &mut Vec<String>,
    ) -> Vec<DependencyRecord> {
        let manifests: Vec<_> = snapshot
            .files
            .iter()
            .filter_map(|file| manifest_ecosystem(&file.path).map(|eco| (file.path.clone(), eco)))
            .collect();

        let fetches = manifests.into_iter().map(|(path, ecosystem)| async move {
            let content = self
                .host
                .fetch_file_content(&snapshot.owner, &snapshot.name, &path)
                .await;
            (path, ecosystem, content)
        });

        let mut dependencies = Vec::new();
        for (path, ecosystem, content) in join_all(fetches).await {
            match content {
                Ok(text) => match parse_manifest(&text, ecosystem, &path) {
                    Ok(mut records) => dependencies.append(&mut records),
                    Err(e) => {
                        warn!("skipping manifest: {e}");
                        errors.push(e.to_string());
                    }
                },
                Err(source) => {
                    let e = ExtractionError::ContentFetch { path, source };
                    warn!("skipping manifest: {e}");
                    errors.push(e.to_string());
                }
            }
        }
        dependencies
    }

    /// One generation exchange. Any failure degrades to an empty bundle and
    /// an error entry rather than aborting the run.
    async fn synthesize(
        &self,
        snapshot: &RepositorySnapshot,
        metrics: &CodeMetrics,
        dependencies: &[DependencyRecord],
        errors: &mut Vec<String>,
    ) -> InsightBundle {
        let context = prompts::build_context(snapshot, metrics, dependencies);
        match self.generator.generate(&context).await {
            Ok(response) => parse_generation_response(&response),
            Err(e) => {
                warn!("insight generation degraded: {e}");
                errors.push(e.to_string());
                InsightBundle::default()
            }
        }
    }
}

fn advance(progress: &Mutex<Stage>) {
    if let Ok(mut stage) = progress.lock() {
        *stage = stage.next();
        debug!("pipeline stage -> {}", stage.name());
    }
}
