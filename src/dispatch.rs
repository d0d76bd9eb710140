//! Upload dispatcher
//!
//! Orchestrates one upload attempt per recognized event: extract the file
//! path from the payload, resolve the active backend from current settings,
//! invoke the upload inside a failure-isolating boundary, and push lifecycle
//! notifications. Failures never escape to the event bus caller.

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::backends::{BackendRegistry, BackendSettings, RegistryError, UploadError};
use crate::config::Config;
use crate::events::{EventMap, KnownEvents};
use crate::notify::{NotificationSink, UploadNotification};
use crate::observability::Metrics;

/// File name reported when the payload carries no usable path.
const UNKNOWN_FILE_NAME: &str = "UNKNOWN";

/// Everything that can sink one upload attempt, normalized to a single
/// failure shape before notifications are emitted.
#[derive(Debug, Error)]
enum DispatchFailure {
    #[error("no upload backend is configured")]
    NoBackendConfigured,
    #[error(transparent)]
    UnknownBackend(#[from] RegistryError),
    #[error("backend reported failure")]
    Reported,
    #[error(transparent)]
    Raised(#[from] UploadError),
    #[error("upload timed out after {0:?}")]
    TimedOut(Duration),
}

/// Settings snapshot derived from one configuration save.
#[derive(Debug, Clone)]
struct UploadSettings {
    client: Option<String>,
    client_config: BackendSettings,
    delete_after_upload: bool,
    upload_timeout: Option<Duration>,
}

impl From<&Config> for UploadSettings {
    fn from(config: &Config) -> Self {
        Self {
            client: config.selected_client().map(str::to_string),
            client_config: config.client_config.clone(),
            delete_after_upload: config.delete_after_upload,
            upload_timeout: config.upload_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// State rebuilt wholesale on every configuration save.
struct DispatchState {
    settings: UploadSettings,
    events: EventMap,
}

pub struct UploadDispatcher {
    registry: Arc<BackendRegistry>,
    sink: Arc<dyn NotificationSink>,
    metrics: Arc<Metrics>,
    // Replaced as one Arc so concurrent dispatches never observe a
    // half-rebuilt event table or mixed settings.
    state: RwLock<Arc<DispatchState>>,
}

impl UploadDispatcher {
    pub fn new(
        registry: Arc<BackendRegistry>,
        config: &Config,
        known_events: &KnownEvents,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            registry,
            sink,
            metrics: Arc::new(Metrics::new()),
            state: RwLock::new(Arc::new(DispatchState {
                settings: UploadSettings::from(config),
                events: EventMap::rebuild(known_events, &config.additional_upload_events),
            })),
        }
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Swap in a fresh settings snapshot and a fully rebuilt event table.
    /// Invoked on every configuration save.
    pub fn apply_config(&self, config: &Config, known_events: &KnownEvents) {
        let next = Arc::new(DispatchState {
            settings: UploadSettings::from(config),
            events: EventMap::rebuild(known_events, &config.additional_upload_events),
        });
        *self.state.write().expect("dispatch state lock poisoned") = next;
    }

    /// Handle one event from the host bus. Never raises to the caller.
    pub async fn on_event(&self, event: &str, payload: &Map<String, Value>) {
        let state = Arc::clone(&self.state.read().expect("dispatch state lock poisoned"));

        // Not an event we track
        let Some(payload_key) = state.events.lookup(event) else {
            return;
        };

        let Some(file_path) = payload.get(payload_key).and_then(Value::as_str) else {
            error!(
                payload_key,
                event, "Unable to find the payload key within the event payload"
            );
            self.metrics.upload_failed();
            self.sink
                .send(UploadNotification::failed(UNKNOWN_FILE_NAME))
                .await;
            return;
        };

        let file_name = file_name_of(file_path);
        self.metrics.upload_started();
        self.sink.send(UploadNotification::start(&file_name)).await;

        match self.run_upload(&state.settings, Path::new(file_path)).await {
            Ok(()) => {
                self.metrics.upload_succeeded();
                self.sink.send(UploadNotification::success(&file_name)).await;
                if state.settings.delete_after_upload {
                    self.delete_source(file_path).await;
                }
            }
            Err(failure) => {
                error!(path = file_path, error = %failure, "Backend failed to upload");
                self.metrics.upload_failed();
                self.sink.send(UploadNotification::failed(&file_name)).await;
            }
        }
    }

    /// One upload attempt against a freshly built backend instance.
    async fn run_upload(
        &self,
        settings: &UploadSettings,
        path: &Path,
    ) -> Result<(), DispatchFailure> {
        let client = settings
            .client
            .as_deref()
            .ok_or(DispatchFailure::NoBackendConfigured)?;
        let factory = self.registry.resolve(client)?;
        let backend = factory.build(&settings.client_config)?;

        let outcome = match settings.upload_timeout {
            Some(limit) => tokio::time::timeout(limit, backend.upload(path))
                .await
                .map_err(|_| DispatchFailure::TimedOut(limit))?,
            None => backend.upload(path).await,
        };

        if outcome? {
            Ok(())
        } else {
            Err(DispatchFailure::Reported)
        }
    }

    /// Deletion failure is logged but never demotes a successful upload.
    async fn delete_source(&self, file_path: &str) {
        if let Err(err) = tokio::fs::remove_file(file_path).await {
            warn!(path = file_path, error = %err, "Failed to delete source after upload");
        }
    }
}

/// Final path segment, or the raw path when there is none.
fn file_name_of(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path)
        .to_string()
}
