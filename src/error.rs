use std::time::Duration;
use thiserror::Error;

/// Fatal errors from the snapshot fetch stage. Every later stage depends on
/// the snapshot, so none of these are recoverable.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("repository {owner}/{name} not found")]
    NotFound { owner: String, name: String },

    #[error("rate limited by host (retry after: {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected host response ({status}): {detail}")]
    Host { status: u16, detail: String },
}

/// Recoverable failure of a single manifest parse. The pipeline logs it,
/// records it and keeps going.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("malformed manifest {path}: {detail}")]
    Malformed { path: String, detail: String },

    #[error("could not fetch manifest {path}: {source}")]
    ContentFetch {
        path: String,
        #[source]
        source: FetchError,
    },
}

/// Recoverable failure of the text-generation exchange. The caller degrades
/// the insight bundle to its default instead of aborting.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation quota exhausted")]
    Quota,

    #[error("generation request timed out")]
    Timeout,

    #[error("generation transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed generation response: {0}")]
    Malformed(String),
}

/// Top-level run outcome. Only fatal conditions surface here; recoverable
/// errors end up in the report's error list instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("run timed out during the {stage} stage")]
    Timeout { stage: &'static str },
}

impl RunError {
    /// Process exit code: configuration, fetch and write failures are
    /// distinguishable for callers scripting around the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Configuration(_) => 2,
            RunError::Fetch(_) | RunError::Timeout { .. } => 3,
            RunError::Write { .. } => 4,
        }
    }
}
