use std::time::Instant;

use ollabench_core::{count_tokens, RequestError, Sample, TokenSource};

use crate::client::GenerationClient;

/// Times one generation exchange and turns it into a [`Sample`].
pub struct SampleCollector<C> {
    client: C,
}

impl<C: GenerationClient> SampleCollector<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn collect(&self, model: &str, prompt: &str, trial: u32) -> Result<Sample, RequestError> {
        let start = Instant::now();
        let generation = self.client.generate(model, prompt).await?;
        let duration = start.elapsed();

        let (tokens, token_source) = count_tokens(generation.eval_count, &generation.text);
        if token_source == TokenSource::Estimated {
            tracing::warn!(
                "No token count reported by {}; estimated {} from {} bytes",
                model,
                tokens,
                generation.text.len()
            );
        }

        Ok(Sample {
            model: model.to_string(),
            prompt: prompt.to_string(),
            trial,
            tokens,
            token_source,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Generation;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedClient {
        text: &'static str,
        eval_count: Option<u64>,
        delay: Duration,
    }

    #[async_trait]
    impl GenerationClient for FixedClient {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<Generation, RequestError> {
            tokio::time::sleep(self.delay).await;
            Ok(Generation {
                text: self.text.to_string(),
                eval_count: self.eval_count,
            })
        }
    }

    struct FailingClient;

    #[async_trait]
    impl GenerationClient for FailingClient {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<Generation, RequestError> {
            Err(RequestError::Connect("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_collect_uses_reported_count() {
        let collector = SampleCollector::new(FixedClient {
            text: "four score and seven",
            eval_count: Some(5),
            delay: Duration::from_millis(20),
        });

        let sample = collector.collect("llama3", "Recite", 2).await.unwrap();
        assert_eq!(sample.model, "llama3");
        assert_eq!(sample.prompt, "Recite");
        assert_eq!(sample.trial, 2);
        assert_eq!(sample.tokens, 5);
        assert_eq!(sample.token_source, TokenSource::Reported);
        assert!(sample.duration >= Duration::from_millis(20));
        assert!(sample.tokens_per_sec().is_some());
    }

    #[tokio::test]
    async fn test_collect_estimates_missing_count() {
        let collector = SampleCollector::new(FixedClient {
            text: "0123456789abcdefghi",
            eval_count: None,
            delay: Duration::from_millis(1),
        });

        let sample = collector.collect("m", "p", 1).await.unwrap();
        assert_eq!(sample.tokens, 19 / 4);
        assert_eq!(sample.token_source, TokenSource::Estimated);
    }

    #[tokio::test]
    async fn test_collect_surfaces_request_error() {
        let collector = SampleCollector::new(FailingClient);
        let err = collector.collect("m", "p", 1).await.unwrap_err();
        assert!(matches!(err, RequestError::Connect(_)));
    }
}
