//! Object storage backend built on the Apache Arrow object_store crate

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{path::Path as StoragePath, ObjectStore};
use serde_json::json;
use tracing::info;

use super::traits::{
    optional_str, require_str, BackendFactory, BackendSettings, ConfigField, UploadBackend,
    UploadError,
};

/// Backend writing artifacts into an object store bucket.
///
/// The `provider` field selects the store flavor: `local` writes under a
/// filesystem root, `memory` is an in-process store for development.
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    key_prefix: String,
}

pub struct ObjectStoreFactory;

impl BackendFactory for ObjectStoreFactory {
    fn name(&self) -> &'static str {
        "object_store"
    }

    fn display_name(&self) -> &'static str {
        "Object Store"
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        vec![
            ConfigField::new("provider", "text", json!("local")),
            ConfigField::new("root", "text", json!("")),
            ConfigField::new("key_prefix", "text", json!("")),
        ]
    }

    fn build(&self, settings: &BackendSettings) -> Result<Box<dyn UploadBackend>, UploadError> {
        let provider = optional_str(settings, "provider")?.unwrap_or("local");
        let key_prefix = optional_str(settings, "key_prefix")?.unwrap_or("").to_string();

        let store: Arc<dyn ObjectStore> = match provider {
            "memory" => Arc::new(object_store::memory::InMemory::new()),
            "local" => {
                let root = require_str(settings, "root")?;
                Arc::new(object_store::local::LocalFileSystem::new_with_prefix(root)?)
            }
            other => {
                return Err(UploadError::InvalidConfig {
                    field: "provider",
                    reason: format!("unsupported provider '{other}'"),
                });
            }
        };

        Ok(Box::new(ObjectStoreBackend { store, key_prefix }))
    }
}

impl ObjectStoreBackend {
    fn storage_key(&self, file_name: &str) -> String {
        if self.key_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.key_prefix.trim_end_matches('/'), file_name)
        }
    }
}

#[async_trait]
impl UploadBackend for ObjectStoreBackend {
    async fn upload(&self, path: &Path) -> Result<bool, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("artifact");
        let data = tokio::fs::read(path).await?;
        let size = data.len();

        let key = self.storage_key(file_name);
        let storage_path = StoragePath::from(key.as_str());

        self.store.put(&storage_path, Bytes::from(data).into()).await?;
        info!(key, size, "Uploaded artifact to object store");

        Ok(true)
    }
}
