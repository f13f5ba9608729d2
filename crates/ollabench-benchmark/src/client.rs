use async_trait::async_trait;
use ollabench_core::RequestError;

/// Full, non-streamed output of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// Exact output token count when the backend reports one.
    pub eval_count: Option<u64>,
}

/// The single request/response exchange the collector times.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, RequestError>;
}

