use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::traits::{
    optional_str, require_str, BackendFactory, BackendSettings, ConfigField, UploadBackend,
    UploadError,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("PushBox/", env!("CARGO_PKG_VERSION"));

/// Remote backend: PUT the artifact body to a configured endpoint.
///
/// The file name is appended to the endpoint path so the destination keeps
/// the original name. A non-2xx response is a reported failure; transport
/// errors surface as raised failures.
pub struct HttpPutBackend {
    client: Client,
    url: String,
    bearer_token: Option<String>,
}

pub struct HttpPutFactory;

impl BackendFactory for HttpPutFactory {
    fn name(&self) -> &'static str {
        "http_put"
    }

    fn display_name(&self) -> &'static str {
        "HTTP PUT"
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        vec![
            ConfigField::new("url", "text", json!("")),
            ConfigField::new("bearer_token", "password", Value::Null),
        ]
    }

    fn build(&self, settings: &BackendSettings) -> Result<Box<dyn UploadBackend>, UploadError> {
        let url = require_str(settings, "url")?;
        if url.is_empty() {
            return Err(UploadError::InvalidConfig {
                field: "url",
                reason: "endpoint url is empty".to_string(),
            });
        }
        let bearer_token = optional_str(settings, "bearer_token")?.map(str::to_string);

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Box::new(HttpPutBackend {
            client,
            url: url.trim_end_matches('/').to_string(),
            bearer_token,
        }))
    }
}

#[async_trait]
impl UploadBackend for HttpPutBackend {
    async fn upload(&self, path: &Path) -> Result<bool, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("artifact");
        let body = tokio::fs::read(path).await?;
        let url = format!("{}/{}", self.url, file_name);

        debug!(url, size = body.len(), "Starting upload");

        let mut request = self.client.put(&url).body(body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Destination rejected upload");
            return Ok(false);
        }

        debug!(url, "Upload completed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_order() {
        let schema = HttpPutFactory.config_schema();
        let names: Vec<_> = schema.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["url", "bearer_token"]);
    }

    #[test]
    fn test_build_rejects_empty_url() {
        let mut settings = BackendSettings::new();
        settings.insert("url".to_string(), json!(""));

        let result = HttpPutFactory.build(&settings);
        assert!(matches!(
            result,
            Err(UploadError::InvalidConfig { field: "url", .. })
        ));
    }

    #[test]
    fn test_build_trims_trailing_slash() {
        let mut settings = BackendSettings::new();
        settings.insert("url".to_string(), json!("https://example.com/uploads/"));

        // Factory-level smoke check only; transfers are exercised against a
        // real listener in the integration suite.
        assert!(HttpPutFactory.build(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_destination_raises() {
        let mut settings = BackendSettings::new();
        // Reserved TEST-NET-1 address, nothing listens there
        settings.insert("url".to_string(), json!("http://192.0.2.1:1/uploads"));

        let backend = HttpPutFactory.build(&settings).unwrap();

        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), b"frames").unwrap();

        // Connect timeout keeps this bounded
        let result = backend.upload(temp.path()).await;
        assert!(matches!(result, Err(UploadError::Http(_))));
    }
}
