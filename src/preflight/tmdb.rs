//! TMDB API preflight check.

use super::CheckResult;
use crate::models::config::TmdbConfig;
use crate::services::tmdb::TmdbClient;

/// Check that the TMDB credentials are accepted.
pub async fn check(config: &TmdbConfig) -> CheckResult {
    match TmdbClient::new(config) {
        Ok(client) => match client.verify_api_key().await {
            Ok(true) => CheckResult::ok("TMDB API", "connected"),
            Ok(false) | Err(_) => CheckResult::fail(
                "TMDB API",
                "invalid API key or unreachable",
                "Check TMDB_API_KEY and your network connection",
            ),
        },
        Err(_) => CheckResult::fail(
            "TMDB API",
            "API key not configured",
            "Set TMDB_API_KEY or tmdb.api_key in the config file",
        ),
    }
}
