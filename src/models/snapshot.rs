use serde::{Deserialize, Serialize};

/// Point-in-time repository metadata and file listing captured by the fetch
/// stage. Immutable once built; later stages only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub default_branch: String,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    pub files: Vec<FileEntry>,
}

/// One tracked file: path is unique within a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
    pub extension: String,
    pub language: Option<String>,
}

impl RepositorySnapshot {
    pub fn repo_url(owner: &str, name: &str) -> String {
        format!("https://github.com/{owner}/{name}")
    }
}
