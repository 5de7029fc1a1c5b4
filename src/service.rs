use crate::error::{ClientError, Result};
use crate::log_item::LogItemResource;
use log::info;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_uri: String,
    pub project: String,
    pub token: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ServiceConfig {
    pub fn new(base_uri: impl Into<String>, project: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            project: project.into(),
            token: token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("rp-log-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Entry point to the reporting API: owns the HTTP client and the
/// normalized base URI shared by all resources.
#[derive(Debug, Clone)]
pub struct Service {
    client: Client,
    base_uri: Url,
    project: String,
}

impl Service {
    pub fn new(
        base_uri: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(ServiceConfig::new(base_uri, project, token))
    }

    pub fn with_config(config: ServiceConfig) -> Result<Self> {
        let base_uri = normalize_base_uri(&config.base_uri)?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| ClientError::Config(format!("Invalid API token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Reporting service at {} (project {})", base_uri, config.project);

        Ok(Self {
            client,
            base_uri,
            project: config.project,
        })
    }

    /// Wraps a caller-provided client. The base URI is normalized the same way.
    pub fn from_parts(
        client: Client,
        base_uri: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base_uri: normalize_base_uri(&base_uri.into())?,
            project: project.into(),
        })
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn log_item(&self) -> LogItemResource {
        LogItemResource::new(self.client.clone(), self.base_uri.clone(), self.project.clone())
    }
}

/// Appends `api/v1` unless the path already names an API version, and
/// guarantees a trailing slash.
pub fn normalize_base_uri(raw: &str) -> Result<Url> {
    let mut uri = Url::parse(raw)?;

    let versioned = uri.path().to_ascii_lowercase().contains("api/v");

    let mut segments = uri
        .path_segments_mut()
        .map_err(|_| ClientError::Config(format!("Base URI cannot be a base: {}", raw)))?;
    segments.pop_if_empty();
    if !versioned {
        segments.extend(["api", "v1"]);
    }
    segments.push("");
    drop(segments);

    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_appends_api_version() {
        let uri = normalize_base_uri("https://rp.example.com").unwrap();
        assert_eq!(uri.as_str(), "https://rp.example.com/api/v1/");
    }

    #[test]
    fn test_normalize_keeps_existing_version() {
        let uri = normalize_base_uri("https://rp.example.com/API/v2").unwrap();
        assert_eq!(uri.as_str(), "https://rp.example.com/API/v2/");

        let uri = normalize_base_uri("https://rp.example.com/api/v1/").unwrap();
        assert_eq!(uri.as_str(), "https://rp.example.com/api/v1/");
    }

    #[test]
    fn test_normalize_under_sub_path() {
        let uri = normalize_base_uri("http://host:8080/reportportal/").unwrap();
        assert_eq!(uri.as_str(), "http://host:8080/reportportal/api/v1/");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(normalize_base_uri("not a uri"), Err(ClientError::InvalidUri(_))));
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let result = Service::new("http://localhost", "p", "bad\ntoken");
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_from_parts_takes_owned_or_borrowed_strings() {
        let project = String::from("demo");
        let service = Service::from_parts(Client::new(), "http://localhost/api/v2", project).unwrap();

        assert_eq!(service.project(), "demo");
        assert_eq!(service.base_uri().as_str(), "http://localhost/api/v2/");
    }

    #[test]
    fn test_log_item_shares_project() {
        let service = Service::new("http://localhost:8080", "demo", "token").unwrap();
        assert_eq!(service.log_item().project(), "demo");
        assert_eq!(service.base_uri().as_str(), "http://localhost:8080/api/v1/");
    }
}
