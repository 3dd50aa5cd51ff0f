//! Ollama API client.

use crate::core::parser::LanguageModel;
use crate::models::config::OllamaConfig;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ollama API client.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

/// Options for generation.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    /// Temperature for sampling (0 = deterministic, 1 = creative)
    temperature: f32,
    /// Random seed for reproducibility
    seed: u32,
}

/// Generate request payload.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

/// Generate response.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub done: bool,
}

/// Models list response.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// Model information.
#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

impl OllamaClient {
    /// Create a new Ollama client.
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    /// Model this client generates with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if Ollama service is available.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// List available models.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.base_url);
        let resp: ModelsResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.models)
    }

    /// Generate text from a prompt.
    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            // Deterministic replies
            options: GenerateOptions {
                temperature: 0.0,
                seed: 42,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let resp = self
            .generate(prompt)
            .await
            .map_err(|e| crate::Error::LlmRequest(e.to_string()))?;
        Ok(resp.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_is_deterministic() {
        let request = GenerateRequest {
            model: "qwen2.5:7b".to_string(),
            prompt: "hi".to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                seed: 42,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["seed"], 42);
        assert_eq!(json["options"]["temperature"], 0.0);
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = OllamaConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model(), "qwen2.5:7b");
    }
}
