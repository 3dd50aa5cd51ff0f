//! Ollama preflight check.

use super::CheckResult;
use crate::models::config::OllamaConfig;
use crate::services::ollama::OllamaClient;

/// Check that Ollama is running and serves the configured model.
pub async fn check(config: &OllamaConfig) -> CheckResult {
    let client = match OllamaClient::new(config) {
        Ok(client) => client,
        Err(e) => return CheckResult::fail("Ollama", &e.to_string(), "Check the [ollama] config"),
    };

    match client.health_check().await {
        Ok(true) => match client.list_models().await {
            Ok(models) => {
                let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
                if names.iter().any(|n| *n == client.model()) {
                    CheckResult::ok("Ollama", &format!("running (model: {})", client.model()))
                } else {
                    CheckResult::fail(
                        "Ollama",
                        &format!("model {} not available", client.model()),
                        &format!("Pull the model: ollama pull {}", client.model()),
                    )
                }
            }
            Err(_) => CheckResult::ok("Ollama", "running"),
        },
        Ok(false) | Err(_) => CheckResult::fail(
            "Ollama",
            &format!("not running at {}", config.base_url),
            "Start Ollama: ollama serve",
        ),
    }
}
