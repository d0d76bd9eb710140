//! Upload lifecycle notifications
//!
//! Fire-and-forget push channel toward the host: no acknowledgment, no
//! delivery guarantee. The dispatcher emits one `upload-start` and exactly
//! one terminal notification per attempt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    UploadStart,
    UploadSuccess,
    UploadFailed,
}

/// Wire shape: `{"type": "upload-start", "file_name": "out.mp4"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub file_name: String,
}

impl UploadNotification {
    pub fn start(file_name: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::UploadStart,
            file_name: file_name.into(),
        }
    }

    pub fn success(file_name: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::UploadSuccess,
            file_name: file_name.into(),
        }
    }

    pub fn failed(file_name: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::UploadFailed,
            file_name: file_name.into(),
        }
    }
}

/// Sink for pushing notifications to the host
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Push one notification; implementations must not fail the caller.
    async fn send(&self, notification: UploadNotification);
}

/// Sink that only logs, for headless operation
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, notification: UploadNotification) {
        info!(
            kind = ?notification.kind,
            file_name = %notification.file_name,
            "Upload notification"
        );
    }
}

/// Recording sink for tests
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<UploadNotification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<UploadNotification> {
        self.sent.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn send(&self, notification: UploadNotification) {
        self.sent
            .lock()
            .expect("sink lock poisoned")
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let note = UploadNotification::start("out.mp4");
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value, json!({"type": "upload-start", "file_name": "out.mp4"}));

        let failed = UploadNotification::failed("UNKNOWN");
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value, json!({"type": "upload-failed", "file_name": "UNKNOWN"}));
    }

    #[test]
    fn test_wire_roundtrip() {
        let note: UploadNotification =
            serde_json::from_str(r#"{"type": "upload-success", "file_name": "a.zip"}"#).unwrap();
        assert_eq!(note, UploadNotification::success("a.zip"));
    }

    #[tokio::test]
    async fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.send(UploadNotification::start("out.mp4")).await;
        sink.send(UploadNotification::success("out.mp4")).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, NotificationKind::UploadStart);
        assert_eq!(sent[1].kind, NotificationKind::UploadSuccess);
    }
}
