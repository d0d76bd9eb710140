use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::traits::{
    require_str, BackendFactory, BackendSettings, ConfigField, UploadBackend, UploadError,
};

/// Reference backend: copy the artifact into a local directory,
/// preserving the original file name.
pub struct FileCopyBackend {
    local_path: PathBuf,
}

pub struct FileCopyFactory;

impl BackendFactory for FileCopyFactory {
    fn name(&self) -> &'static str {
        "file_copy"
    }

    fn display_name(&self) -> &'static str {
        "File Copy"
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        vec![ConfigField::new("local_path", "text", json!(""))]
    }

    fn build(&self, settings: &BackendSettings) -> Result<Box<dyn UploadBackend>, UploadError> {
        let local_path = require_str(settings, "local_path")?;
        Ok(Box::new(FileCopyBackend {
            local_path: PathBuf::from(local_path),
        }))
    }
}

#[async_trait]
impl UploadBackend for FileCopyBackend {
    async fn upload(&self, path: &Path) -> Result<bool, UploadError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => {
                warn!(path = %path.display(), "Source is not a file, cannot copy");
                return Ok(false);
            }
        };
        if !metadata.is_file() {
            warn!(path = %path.display(), "Source is not a file, cannot copy");
            return Ok(false);
        }

        let Some(file_name) = path.file_name() else {
            warn!(path = %path.display(), "Source path has no file name");
            return Ok(false);
        };
        let destination = self.local_path.join(file_name);

        tokio::fs::copy(path, &destination).await?;
        info!(
            source = %path.display(),
            destination = %destination.display(),
            "Copied artifact"
        );

        Ok(true)
    }
}
