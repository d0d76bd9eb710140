//! Stdin event bus adapter
//!
//! Stand-in for a host event bus: reads newline-delimited JSON events of the
//! form `{"event": "MOVIE_DONE", "payload": {"movie": "/tmp/out.mp4"}}` from
//! stdin, dispatches each one, and writes notifications as JSON lines on
//! stdout.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use pushbox::backends::BackendRegistry;
use pushbox::config::Config;
use pushbox::dispatch::UploadDispatcher;
use pushbox::events::KnownEvents;
use pushbox::notify::{NotificationSink, UploadNotification};

use crate::cli::RunArgs;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Deserialize)]
struct BusEvent {
    event: String,
    #[serde(default)]
    payload: Map<String, Value>,
}

/// Sink printing each notification as one JSON line on stdout.
struct StdoutSink;

#[async_trait]
impl NotificationSink for StdoutSink {
    async fn send(&self, notification: UploadNotification) {
        match serde_json::to_string(&notification) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(error = %err, "Failed to serialize notification"),
        }
    }
}

pub async fn run(args: RunArgs) -> Result<(), AnyError> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };

    let registry = Arc::new(BackendRegistry::discover()?);
    info!(
        backends = registry.names().collect::<Vec<_>>().join(", "),
        "Discovered upload backends"
    );

    let mut known_events = KnownEvents::stock();
    for event in &args.known_events {
        known_events.insert(event.clone());
    }

    let dispatcher = UploadDispatcher::new(
        registry,
        &config,
        &known_events,
        Arc::new(StdoutSink),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let bus_event: BusEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "Ignoring malformed event line");
                continue;
            }
        };
        dispatcher.on_event(&bus_event.event, &bus_event.payload).await;
    }

    let metrics = dispatcher.metrics().snapshot();
    info!(
        started = metrics.uploads_started,
        succeeded = metrics.uploads_succeeded,
        failed = metrics.uploads_failed,
        "Event stream closed"
    );

    Ok(())
}

/// Print every discovered backend with its config schema.
pub fn list_backends() -> Result<(), AnyError> {
    let registry = BackendRegistry::discover()?;
    for name in registry.names() {
        let factory = registry.resolve(name)?;
        println!("{} ({})", name, factory.display_name());
        for field in factory.config_schema() {
            println!("  {} [{}] default: {}", field.name, field.input_type, field.default);
        }
    }
    Ok(())
}
