use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ollama_url: String,
    pub ollama_model: String,
    pub request_timeout_secs: u64,
    pub bind_addr: String,
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava:7b".to_string(),
            request_timeout_secs: 180,
            bind_addr: "0.0.0.0:5000".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional JSON file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = match path {
            Some(path) if path.exists() => Self::read_file(path),
            Some(path) => {
                log::info!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn read_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            Self::default()
        })
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("OLLAMA_URL") {
            self.ollama_url = url;
        }
        if let Some(model) = non_empty("OLLAMA_MODEL") {
            self.ollama_model = model;
        }
        if let Some(secs) = non_empty("OLLAMA_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => log::warn!("Ignoring invalid OLLAMA_TIMEOUT_SECS={}", secs),
            }
        }
        if let Some(addr) = non_empty("ACTIVITY_BIND_ADDR") {
            self.bind_addr = addr;
        }
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.ollama_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
