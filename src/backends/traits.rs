use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Operator-supplied configuration values for one backend instance
/// (the `client_config` settings table).
pub type BackendSettings = BTreeMap<String, Value>;

/// Backend errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("missing config field '{0}'")]
    MissingConfig(&'static str),
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("transfer failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// One field of a backend's declarative config schema.
///
/// Pass-through only: the core never interprets `input_type`, it is
/// presentation metadata for whatever collects the operator's settings.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigField {
    pub name: &'static str,
    pub input_type: &'static str,
    pub default: Value,
}

impl ConfigField {
    pub fn new(name: &'static str, input_type: &'static str, default: Value) -> Self {
        Self {
            name,
            input_type,
            default,
        }
    }
}

/// Upload backend capability
///
/// Backends implement this trait to receive one produced artifact file.
/// The trait is async to allow network and filesystem I/O.
///
/// Outcome contract: `Ok(true)` only on confirmed success; `Ok(false)` when
/// the backend itself reports failure (missing source, rejected transfer);
/// `Err(_)` when the attempt raised. The dispatcher treats `Ok(false)` and
/// `Err(_)` identically, so variants may use whichever fits.
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Transfer the file at `path` to this backend's destination.
    async fn upload(&self, path: &Path) -> Result<bool, UploadError>;
}

/// Constructor-side identity of a backend variant.
///
/// Instances built through [`BackendFactory::build`] are fresh per upload
/// invocation and hold no state beyond their configuration.
pub trait BackendFactory: Send + Sync {
    /// Unique registry key, used as the `client` settings value.
    fn name(&self) -> &'static str;

    /// Human readable name for presentation.
    fn display_name(&self) -> &'static str;

    /// Ordered config field descriptors for this variant.
    fn config_schema(&self) -> Vec<ConfigField>;

    /// Build a fresh instance from the operator's current config values.
    fn build(&self, settings: &BackendSettings) -> Result<Box<dyn UploadBackend>, UploadError>;
}

/// Fetch a required string field out of backend settings.
pub(crate) fn require_str<'a>(
    settings: &'a BackendSettings,
    field: &'static str,
) -> Result<&'a str, UploadError> {
    settings
        .get(field)
        .ok_or(UploadError::MissingConfig(field))?
        .as_str()
        .ok_or(UploadError::InvalidConfig {
            field,
            reason: "expected a string".to_string(),
        })
}

/// Fetch an optional string field out of backend settings.
pub(crate) fn optional_str<'a>(
    settings: &'a BackendSettings,
    field: &'static str,
) -> Result<Option<&'a str>, UploadError> {
    match settings.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or(UploadError::InvalidConfig {
                field,
                reason: "expected a string".to_string(),
            }),
    }
}
