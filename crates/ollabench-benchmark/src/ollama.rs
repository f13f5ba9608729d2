use std::time::Duration;

use async_trait::async_trait;
use ollabench_core::RequestError;
use serde::{Deserialize, Serialize};

use crate::client::{Generation, GenerationClient};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    host: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

impl OllamaClient {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::Connect(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Model names in the order the server lists them.
    pub async fn list_models(&self) -> Result<Vec<String>, RequestError> {
        let url = format!("{}/api/tags", self.host);
        let resp = self.client.get(&url).send().await.map_err(send_error)?;

        let body = read_success_body(resp).await?;
        let tags: TagsResponse = serde_json::from_str(&body)
            .map_err(|e| RequestError::Decode(format!("{} - Body: {}", e, truncate(&body))))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, RequestError> {
        let url = format!("{}/api/generate", self.host);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let body = read_success_body(resp).await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| RequestError::Decode(format!("{} - Body: {}", e, truncate(&body))))?;

        Ok(Generation {
            text: parsed.response,
            eval_count: parsed.eval_count,
        })
    }
}

fn send_error(e: reqwest::Error) -> RequestError {
    match e.is_timeout() {
        true => RequestError::Timeout(e.to_string()),
        false => RequestError::Connect(e.to_string()),
    }
}

async fn read_success_body(resp: reqwest::Response) -> Result<String, RequestError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RequestError::Status {
            code: status.as_u16(),
            body,
        });
    }

    resp.text().await.map_err(|e| match e.is_timeout() {
        true => RequestError::Timeout(e.to_string()),
        false => RequestError::Decode(e.to_string()),
    })
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(500) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollabench_core::RequestPhase;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({"model": "llama3:8b", "prompt": "Hi", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3:8b",
                "response": "Hello there!",
                "done": true,
                "eval_count": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generation = client_for(&server).generate("llama3:8b", "Hi").await.unwrap();
        assert_eq!(generation.text, "Hello there!");
        assert_eq!(generation.eval_count, Some(4));
    }

    #[tokio::test]
    async fn test_generate_without_eval_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": "abc", "done": true})),
            )
            .mount(&server)
            .await;

        let generation = client_for(&server).generate("m", "p").await.unwrap();
        assert_eq!(generation.eval_count, None);
    }

    #[tokio::test]
    async fn test_generate_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("missing", "p").await.unwrap_err();
        assert_eq!(err.phase(), RequestPhase::Status);
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_generate_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("m", "p").await.unwrap_err();
        assert_eq!(err.phase(), RequestPhase::Decode);
    }

    #[tokio::test]
    async fn test_connect_error() {
        // nothing listens on port 9 (discard) in the test environment
        let client = OllamaClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.generate("m", "p").await.unwrap_err();
        assert_eq!(err.phase(), RequestPhase::Connect);
    }

    #[tokio::test]
    async fn test_timeout_is_connect_phase() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::new(&server.uri(), Duration::from_millis(100)).unwrap();
        let err = client.generate("m", "p").await.unwrap_err();
        assert!(matches!(err, RequestError::Timeout(_)));
        assert_eq!(err.phase(), RequestPhase::Connect);
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    {"name": "qwen2:7b", "size": 4400000000u64},
                    {"name": "llama3:8b", "size": 4700000000u64}
                ]
            })))
            .mount(&server)
            .await;

        let models = client_for(&server).list_models().await.unwrap();
        assert_eq!(models, vec!["qwen2:7b".to_string(), "llama3:8b".to_string()]);
    }
}
