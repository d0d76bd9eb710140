use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::events::EventMappingEntry;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Selected backend name; absent (or empty) means uploads are reported
    /// as failed until the operator picks one.
    #[serde(default)]
    pub client: Option<String>,
    /// Backend-specific config values, passed through to the factory.
    #[serde(default)]
    pub client_config: BTreeMap<String, Value>,
    #[serde(default)]
    pub delete_after_upload: bool,
    /// Bound on one upload invocation; absent means unbounded.
    #[serde(default)]
    pub upload_timeout_secs: Option<u64>,
    #[serde(default = "default_additional_upload_events")]
    pub additional_upload_events: Vec<EventMappingEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: None,
            client_config: BTreeMap::new(),
            delete_after_upload: false,
            upload_timeout_secs: None,
            additional_upload_events: default_additional_upload_events(),
        }
    }
}

fn default_additional_upload_events() -> Vec<EventMappingEntry> {
    vec![
        EventMappingEntry {
            event_name: "PLUGIN_OCTOLAPSE_MOVIE_DONE".to_string(),
            payload_path_key: "movie".to_string(),
        },
        EventMappingEntry {
            event_name: "PLUGIN_OCTOLAPSE_SNAPSHOT_ARCHIVE_DONE".to_string(),
            payload_path_key: "archive".to_string(),
        },
    ]
}

impl Config {
    /// Selected backend name with the empty string treated as unset.
    pub fn selected_client(&self) -> Option<&str> {
        self.client.as_deref().filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_stock_additional_events() {
        let config = Config::default();
        assert!(config.client.is_none());
        assert!(!config.delete_after_upload);
        assert_eq!(config.additional_upload_events.len(), 2);
        assert_eq!(
            config.additional_upload_events[0].event_name,
            "PLUGIN_OCTOLAPSE_MOVIE_DONE"
        );
        assert_eq!(config.additional_upload_events[1].payload_path_key, "archive");
    }

    #[test]
    fn test_selected_client_filters_empty() {
        let mut config = Config::default();
        assert_eq!(config.selected_client(), None);

        config.client = Some(String::new());
        assert_eq!(config.selected_client(), None);

        config.client = Some("file_copy".to_string());
        assert_eq!(config.selected_client(), Some("file_copy"));
    }
}
