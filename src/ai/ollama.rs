use reqwest::Client;
use serde::Serialize;

use super::streaming::{collect_stream, ModelAnswer};
use crate::config::AppConfig;
use crate::service::AnalysisError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

/// Streaming client for Ollama's `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(AnalysisError::Client)?;

        Ok(Self {
            http,
            url: config.generate_url(),
            model: config.ollama_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit one base64 image with `prompt` and read the streamed answer to completion.
    pub async fn generate(
        &self,
        prompt: &str,
        image_base64: String,
    ) -> Result<ModelAnswer, AnalysisError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            images: vec![image_base64],
            stream: true,
        };

        log::info!("Sending request to Ollama at {}", self.url);

        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        log::info!("Got response status: {}", status);
        if !status.is_success() {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        let answer = collect_stream(response.bytes_stream()).await?;
        if !answer.is_finished() {
            log::warn!("Stream closed before the model signalled completion");
        }
        log::info!(
            "Full response length: {} chars over {} chunks (done: {})",
            answer.text().map_or(0, |t| t.chars().count()),
            answer.chunk_count(),
            answer.is_done()
        );

        Ok(answer)
    }
}
