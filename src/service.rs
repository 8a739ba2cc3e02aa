use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::activity::{classify, ActivityState, ActivityStore};
use crate::ai::{OllamaClient, ACTIVITY_PROMPT};
use crate::capture::{self, RawFrame, ANALYSIS_MAX_DIMENSION};
use crate::config::AppConfig;

/// Failures of one analysis. The `Display` text is what the caller sees as the activity.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error: No image data received")]
    MissingImage,
    #[error("Error: {0}")]
    InvalidImage(#[from] base64::DecodeError),
    #[error("Error: Image payload too large")]
    PayloadTooLarge,
    #[error("⏱️ Timeout: Request took too long. Try again.")]
    Timeout,
    #[error("❌ Cannot connect to Ollama server. Check connection.")]
    Connect,
    #[error("Error: API returned status {0}")]
    Status(u16),
    #[error("Ollama Error: {0}")]
    Model(String),
    #[error("Error: {0}")]
    Transport(reqwest::Error),
    #[error("Error: {0}")]
    Client(reqwest::Error),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisError::Timeout
        } else if e.is_connect() {
            AnalysisError::Connect
        } else {
            AnalysisError::Transport(e)
        }
    }
}

/// Response envelope for `/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub activity: String,
    pub timestamp: DateTime<Utc>,
}

pub struct ActivityService {
    client: OllamaClient,
    store: Arc<ActivityStore>,
}

impl ActivityService {
    pub fn new(config: &AppConfig, store: Arc<ActivityStore>) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: OllamaClient::new(config)?,
            store,
        })
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }

    /// Run one classification cycle on a client payload. Never fails: errors become the
    /// reported activity. Analyses that got past input validation update the shared state.
    pub async fn analyze(&self, payload: Option<&str>) -> ActivityReport {
        let frame = match decode_frame(payload) {
            Ok(frame) => frame,
            Err(e) => return self.reject(e),
        };

        let activity = match self.classify_frame(&frame).await {
            Ok(label) => label,
            Err(e) => {
                log::error!("Analysis failed: {:?}", e);
                e.to_string()
            }
        };

        let timestamp = Utc::now();
        self.store.publish(activity.clone(), timestamp);
        ActivityReport {
            activity,
            timestamp,
        }
    }

    /// Report a request that never reached analysis. Shared state is left alone.
    pub fn reject(&self, error: AnalysisError) -> ActivityReport {
        log::warn!("Rejected analysis request: {}", error);
        ActivityReport {
            activity: error.to_string(),
            timestamp: Utc::now(),
        }
    }

    async fn classify_frame(&self, frame: &RawFrame) -> Result<String, AnalysisError> {
        let resized = capture::resize(frame.as_bytes(), ANALYSIS_MAX_DIMENSION);
        log::info!(
            "Image size: {} bytes (received {} bytes)",
            resized.len(),
            frame.len()
        );

        let answer = self
            .client
            .generate(ACTIVITY_PROMPT, STANDARD.encode(&resized))
            .await?;

        if let Some(error) = answer.error() {
            return Err(AnalysisError::Model(error.to_string()));
        }

        log::info!("Full response: {}", answer.text().unwrap_or_default());
        Ok(classify(answer.text()).to_string())
    }

    pub fn current_activity(&self) -> Arc<ActivityState> {
        self.store.snapshot()
    }
}

fn decode_frame(payload: Option<&str>) -> Result<RawFrame, AnalysisError> {
    let payload = payload
        .filter(|p| !p.trim().is_empty())
        .ok_or(AnalysisError::MissingImage)?;

    let frame = RawFrame::from_payload(payload)?;
    if frame.is_empty() {
        return Err(AnalysisError::MissingImage);
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            AnalysisError::MissingImage.to_string(),
            "Error: No image data received"
        );
        assert_eq!(
            AnalysisError::Status(404).to_string(),
            "Error: API returned status 404"
        );
        assert_eq!(
            AnalysisError::Model("out of memory".into()).to_string(),
            "Ollama Error: out of memory"
        );
        assert!(AnalysisError::Timeout.to_string().starts_with("⏱️ Timeout"));
        assert_eq!(
            AnalysisError::PayloadTooLarge.to_string(),
            "Error: Image payload too large"
        );
    }

    #[test]
    fn missing_or_blank_payload_is_rejected() {
        assert!(matches!(decode_frame(None), Err(AnalysisError::MissingImage)));
        assert!(matches!(
            decode_frame(Some("  ")),
            Err(AnalysisError::MissingImage)
        ));
        assert!(matches!(
            decode_frame(Some("data:image/jpeg;base64,")),
            Err(AnalysisError::MissingImage)
        ));
    }

    #[test]
    fn malformed_base64_is_an_input_error() {
        let err = decode_frame(Some("data:image/jpeg;base64,%%%")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage(_)));
        assert!(err.to_string().starts_with("Error:"));
    }
}
