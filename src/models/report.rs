use crate::models::dependency::DependencyRecord;
use crate::models::insight::InsightBundle;
use crate::models::metrics::CodeMetrics;
use crate::models::snapshot::{FileEntry, RepositorySnapshot};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cap on file entries carried into the report; the full count stays visible
/// through the metrics section.
const MAX_FILES_IN_OUTPUT: usize = 500;

/// The fixed output schema. Every field is always present; degraded stages
/// contribute empty or default values, never missing keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub analysis_metadata: AnalysisMetadata,
    pub repository: RepositorySection,
    pub metadata: MetadataSection,
    pub analysis: InsightBundle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analyzed_at: String,
    pub analyzer_version: String,
    pub repository: RepositoryIdent,
    pub is_complete: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryIdent {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySection {
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub url: String,
    pub default_branch: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataSection {
    pub files: Vec<FileEntry>,
    pub dependencies: Vec<DependencyRecord>,
    pub code_metrics: CodeMetrics,
}

impl Report {
    /// Pure merge of the stage outputs. Apart from `analyzed_at` the result
    /// is fully determined by the inputs.
    pub fn assemble(
        snapshot: &RepositorySnapshot,
        metrics: CodeMetrics,
        dependencies: Vec<DependencyRecord>,
        analysis: InsightBundle,
        errors: Vec<String>,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        let mut files = snapshot.files.clone();
        files.truncate(MAX_FILES_IN_OUTPUT);

        Report {
            analysis_metadata: AnalysisMetadata {
                analyzed_at: analyzed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
                repository: RepositoryIdent {
                    owner: snapshot.owner.clone(),
                    name: snapshot.name.clone(),
                },
                is_complete: true,
                errors,
            },
            repository: RepositorySection {
                name: snapshot.name.clone(),
                owner: snapshot.owner.clone(),
                description: snapshot.description.clone(),
                url: snapshot.url.clone(),
                default_branch: snapshot.default_branch.clone(),
                languages: snapshot.languages.clone(),
            },
            metadata: MetadataSection {
                files,
                dependencies,
                code_metrics: metrics,
            },
            analysis,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Shape check used by the contract tests: all required keys present.
    pub fn has_required_shape(value: &Value) -> bool {
        let Some(obj) = value.as_object() else {
            return false;
        };
        let top_level = ["analysis_metadata", "repository", "metadata", "analysis"];
        if !top_level.iter().all(|key| obj.contains_key(*key)) {
            return false;
        }

        let metadata_ok = value
            .get("metadata")
            .and_then(Value::as_object)
            .map(|m| ["files", "dependencies", "code_metrics"].iter().all(|k| m.contains_key(*k)))
            .unwrap_or(false);

        let analysis_ok = value
            .get("analysis")
            .and_then(Value::as_object)
            .map(|a| ["summary", "insights", "recommendations"].iter().all(|k| a.contains_key(*k)))
            .unwrap_or(false);

        metadata_ok && analysis_ok
    }
}
