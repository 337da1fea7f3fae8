use cloner_core::{CloneError, CloneRequest, CloneResult};
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::FetchSettings;

const CLONE_ENDPOINT: &str = "/api/clone";
const HEALTH_ENDPOINT: &str = "/api/health";
const GENERIC_FAILURE: &str = "Failed to clone website";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
}

/// The remote cloning service.
#[async_trait::async_trait]
pub trait CloneService: Send + Sync {
    async fn clone_site(&self, request: &CloneRequest) -> Result<CloneResult, CloneError>;

    async fn health(&self) -> Result<ServiceHealth, CloneError>;
}

#[derive(Serialize)]
struct CloneRequestBody<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CloneResponseBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cloned_url: Option<String>,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    files_count: u64,
    #[serde(default)]
    total_size: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// JSON-over-HTTP client for the cloning service at `origin`.
///
/// No request timeout is applied to the clone call; the service bounds its own work.
#[derive(Debug, Clone)]
pub struct HttpCloneService {
    client: reqwest::Client,
    origin: Url,
}

impl HttpCloneService {
    pub fn new(origin: Url, settings: &FetchSettings) -> Result<Self, CloneError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| CloneError::Transport(err.to_string()))?;
        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn endpoint(&self, path: &str) -> Result<Url, CloneError> {
        self.origin
            .join(path)
            .map_err(|err| CloneError::Transport(format!("invalid service url: {err}")))
    }
}

#[async_trait::async_trait]
impl CloneService for HttpCloneService {
    async fn clone_site(&self, request: &CloneRequest) -> Result<CloneResult, CloneError> {
        let endpoint = self.endpoint(CLONE_ENDPOINT)?;
        engine_info!("POST {} url={}", endpoint, request.target_url());

        let response = self
            .client
            .post(endpoint)
            .json(&CloneRequestBody {
                url: request.target_url(),
            })
            .send()
            .await
            .map_err(|err| CloneError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = failure_detail(&body);
            engine_warn!("Clone service answered {}: {}", status, detail);
            return Err(CloneError::RemoteService(detail));
        }

        let body: CloneResponseBody = response
            .json()
            .await
            .map_err(|err| CloneError::Transport(format!("unreadable clone response: {err}")))?;
        if !body.success {
            return Err(CloneError::RemoteService(
                body.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ));
        }
        let clone_location = body.cloned_url.filter(|url| !url.is_empty()).ok_or_else(|| {
            CloneError::Transport("clone response has no cloned_url".to_string())
        })?;

        engine_info!(
            "Cloned {} to {} ({} files)",
            request.target_url(),
            clone_location,
            body.files_count
        );
        Ok(CloneResult {
            clone_location,
            asset_paths: body.files,
            asset_count: body.files_count,
            total_size_bytes: body.total_size,
        })
    }

    async fn health(&self) -> Result<ServiceHealth, CloneError> {
        let endpoint = self.endpoint(HEALTH_ENDPOINT)?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|err| CloneError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CloneError::RemoteService(format!(
                "health check failed: {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|err| CloneError::Transport(format!("unreadable health response: {err}")))
    }
}

/// The service's `detail` text verbatim, or a generic message when absent.
fn failure_detail(body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail);
    match detail {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        Some(serde_json::Value::Null) | None => GENERIC_FAILURE.to_string(),
        Some(serde_json::Value::String(_)) => GENERIC_FAILURE.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::failure_detail;

    #[test]
    fn detail_string_is_verbatim() {
        assert_eq!(failure_detail(r#"{"detail":"upstream timeout"}"#), "upstream timeout");
    }

    #[test]
    fn missing_or_unreadable_detail_falls_back() {
        assert_eq!(failure_detail("{}"), "Failed to clone website");
        assert_eq!(failure_detail("<html>502</html>"), "Failed to clone website");
        assert_eq!(failure_detail(r#"{"detail":""}"#), "Failed to clone website");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        assert_eq!(
            failure_detail(r#"{"detail":[{"msg":"invalid url"}]}"#),
            r#"[{"msg":"invalid url"}]"#
        );
    }
}
