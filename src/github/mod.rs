use crate::analysis::language::{extension_of, language_for};
use crate::config::GitHubConfig;
use crate::error::FetchError;
use crate::models::snapshot::FileEntry;
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT_VALUE: &str = "repolens";

/// Repository attributes returned by the host, before the file listing and
/// README are merged into a snapshot.
#[derive(Debug, Clone)]
pub struct RepositoryAttributes {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub default_branch: String,
    pub languages: Vec<String>,
}

/// Source-control host capability. The pipeline only sees this trait, so
/// tests can substitute a scripted host.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn fetch_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryAttributes, FetchError>;

    async fn fetch_file_listing(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<Vec<FileEntry>, FetchError>;

    async fn fetch_file_content(
        &self,
        owner: &str,
        name: &str,
        path: &str,
    ) -> Result<String, FetchError>;

    async fn fetch_readme(&self, owner: &str, name: &str) -> Result<Option<String>, FetchError>;
}

/// GitHub REST API client. One best-effort request per endpoint; retry
/// policy is left to callers.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
}

#[derive(Deserialize)]
struct RepoResponse {
    name: String,
    owner: RepoOwner,
    description: Option<String>,
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct RepoOwner {
    login: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeNode>,
}

#[derive(Deserialize)]
struct TreeNode {
    path: String,
    #[serde(rename = "type")]
    node_type: String,
    size: Option<u64>,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: Option<String>,
    encoding: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Ok(value) = HeaderValue::from_str(&format!("token {}", config.token)) {
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        owner: &str,
        name: &str,
    ) -> Result<T, FetchError> {
        let response = self.http.get(url).send().await?;
        let response = check_status(response, owner, name)?;
        Ok(response.json::<T>().await?)
    }
}

/// Map host status codes onto the fetch error taxonomy.
fn check_status(response: Response, owner: &str, name: &str) -> Result<Response, FetchError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited {
            retry_after: retry_after_of(&response),
        }),
        status => Err(FetchError::Host {
            status: status.as_u16(),
            detail: "unexpected status from GitHub API".to_string(),
        }),
    }
}

fn retry_after_of(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn decode_base64_content(content: &str, path: &str) -> Result<String, FetchError> {
    // GitHub wraps base64 payloads with newlines.
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| FetchError::Host {
            status: 200,
            detail: format!("undecodable content payload for {path}: {e}"),
        })?;
    String::from_utf8(bytes).map_err(|e| FetchError::Host {
        status: 200,
        detail: format!("non-UTF-8 content payload for {path}: {e}"),
    })
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn fetch_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryAttributes, FetchError> {
        let repo: RepoResponse = self
            .get_json(&format!("{}/repos/{owner}/{name}", self.api_url), owner, name)
            .await?;

        // Language list ordered by bytes of code, as GitHub returns it.
        let languages: Vec<String> = self
            .get_json::<serde_json::Map<String, serde_json::Value>>(
                &format!("{}/repos/{owner}/{name}/languages", self.api_url),
                owner,
                name,
            )
            .await
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        Ok(RepositoryAttributes {
            owner: repo.owner.login,
            name: repo.name,
            description: repo.description,
            default_branch: repo.default_branch.unwrap_or_else(|| "main".to_string()),
            languages,
        })
    }

    async fn fetch_file_listing(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<Vec<FileEntry>, FetchError> {
        let tree: TreeResponse = self
            .get_json(
                &format!(
                    "{}/repos/{owner}/{name}/git/trees/{branch}?recursive=1",
                    self.api_url
                ),
                owner,
                name,
            )
            .await?;

        Ok(tree
            .tree
            .into_iter()
            .filter(|node| node.node_type == "blob")
            .map(|node| FileEntry {
                extension: extension_of(&node.path),
                language: language_for(&node.path).map(str::to_string),
                size: node.size.unwrap_or(0),
                path: node.path,
            })
            .collect())
    }

    async fn fetch_file_content(
        &self,
        owner: &str,
        name: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        let content: ContentResponse = self
            .get_json(
                &format!("{}/repos/{owner}/{name}/contents/{path}", self.api_url),
                owner,
                name,
            )
            .await?;

        match (content.encoding.as_deref(), content.content) {
            (Some("base64"), Some(payload)) => decode_base64_content(&payload, path),
            (_, Some(payload)) => Ok(payload),
            (_, None) => Err(FetchError::Host {
                status: 200,
                detail: format!("content response for {path} carried no payload"),
            }),
        }
    }

    async fn fetch_readme(&self, owner: &str, name: &str) -> Result<Option<String>, FetchError> {
        let result = self
            .get_json::<ContentResponse>(
                &format!("{}/repos/{owner}/{name}/readme", self.api_url),
                owner,
                name,
            )
            .await;

        match result {
            Ok(content) => match (content.encoding.as_deref(), content.content) {
                (Some("base64"), Some(payload)) => {
                    Ok(decode_base64_content(&payload, "README").ok())
                }
                (_, payload) => Ok(payload),
            },
            // A repository without a README is not an error.
            Err(FetchError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_payload_with_newlines_decodes() {
        // "hello world" split across wrapped base64 lines.
        let payload = "aGVsbG8g\nd29ybGQ=\n";
        let decoded = decode_base64_content(payload, "README.md").expect("decode");
        assert_eq!(decoded, "hello world");
    }

    #[test]
    fn invalid_base64_payload_is_a_host_error() {
        let result = decode_base64_content("!!!not base64!!!", "README.md");
        assert!(matches!(result, Err(FetchError::Host { .. })));
    }
}
