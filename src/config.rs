//! Runtime settings from the environment (and an optional `.env` file).

use std::path::PathBuf;

use reqwest::Url;

use crate::domain::DEFAULT_ENDPOINT;
use crate::error::AppError;

pub const ENV_API_URL: &str = "PLANNER_API_URL";
pub const ENV_LOG_DIR: &str = "PLANNER_LOG_DIR";

const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Planning endpoint (`POST`).
    pub endpoint: Url,
    /// Directory for per-launch log files.
    pub log_dir: PathBuf,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// `endpoint_override` (from `--endpoint`) wins over `PLANNER_API_URL`.
    pub fn from_env(endpoint_override: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(endpoint_override, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(endpoint_override: Option<&str>, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = endpoint_override
            .map(str::to_string)
            .or_else(|| lookup(ENV_API_URL))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = parse_endpoint(&raw)?;

        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self { endpoint, log_dir })
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::input(format!("Invalid planning endpoint '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::input(format!(
            "Unsupported endpoint scheme '{other}' in '{raw}' (expected http or https)."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let s = Settings::from_lookup(None, |_| None).unwrap();
        assert_eq!(s.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(s.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn override_beats_environment() {
        let env = |key: &str| match key {
            ENV_API_URL => Some("http://planner.internal:9000/api/plan".to_string()),
            ENV_LOG_DIR => Some("/tmp/planner-logs".to_string()),
            _ => None,
        };
        let s = Settings::from_lookup(None, env).unwrap();
        assert_eq!(s.endpoint.as_str(), "http://planner.internal:9000/api/plan");
        assert_eq!(s.log_dir, PathBuf::from("/tmp/planner-logs"));

        let s = Settings::from_lookup(Some("http://127.0.0.1:1/api/plan"), env).unwrap();
        assert_eq!(s.endpoint.as_str(), "http://127.0.0.1:1/api/plan");
    }

    #[test]
    fn bad_endpoint_is_an_input_error() {
        let err = Settings::from_lookup(Some("not a url"), |_| None).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);

        let err = parse_endpoint("ftp://example.com/plan").unwrap_err();
        assert!(err.message().contains("ftp"));
    }
}
