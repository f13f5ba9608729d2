use std::fmt;

use thiserror::Error;

/// Stage of a single request exchange at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Connect,
    Status,
    Decode,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestPhase::Connect => "connect",
            RequestPhase::Status => "status",
            RequestPhase::Decode => "decode",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl RequestError {
    /// Timeouts are reported as a connect-phase failure.
    pub fn phase(&self) -> RequestPhase {
        match self {
            RequestError::Connect(_) | RequestError::Timeout(_) => RequestPhase::Connect,
            RequestError::Status { .. } => RequestPhase::Status,
            RequestError::Decode(_) => RequestPhase::Decode,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum BenchmarkErrorKind {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Cancelled")]
    Cancelled,
}

/// A model's run aborted on its first failure.
#[derive(Error, Debug)]
#[error("Benchmark failed for model {model}: {kind}")]
pub struct BenchmarkError {
    pub model: String,
    #[source]
    pub kind: BenchmarkErrorKind,
}

impl BenchmarkError {
    pub fn request(model: impl Into<String>, source: RequestError) -> Self {
        Self {
            model: model.into(),
            kind: BenchmarkErrorKind::Request(source),
        }
    }

    pub fn cancelled(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            kind: BenchmarkErrorKind::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, BenchmarkErrorKind::Cancelled)
    }
}

/// Invalid input caught before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Prompt list is empty")]
    EmptyPrompts,

    #[error("Prompt {0} is blank")]
    BlankPrompt(usize),

    #[error("Trial count must be at least 1")]
    ZeroTrials,

    #[error("Invalid output format: {0} (expected csv, json or txt)")]
    InvalidFormat(String),

    #[error("Invalid language: {0} (expected en or tr)")]
    InvalidLanguage(String),

    #[error("No models to benchmark")]
    NoModels,

    #[error("Model name {0} is blank")]
    BlankModel(usize),
}

#[derive(Error, Debug)]
pub enum OllabenchError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OllabenchError>;
