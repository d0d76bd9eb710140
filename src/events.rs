//! Event mapping table
//!
//! Associates external event identifiers with the payload field carrying the
//! produced file's path. One entry is built in (the stock artifact event);
//! operators add more through settings. The table is rebuilt in full at
//! startup and on every settings save, never patched incrementally.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The stock "artifact produced" event and its payload key.
pub const STOCK_UPLOAD_EVENT: &str = "MOVIE_DONE";
pub const STOCK_PAYLOAD_KEY: &str = "movie";

/// One operator-supplied event mapping entry from settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventMappingEntry {
    pub event_name: String,
    pub payload_path_key: String,
}

/// Enumeration of event identifiers the host can actually deliver, used to
/// validate operator-supplied mappings.
#[derive(Debug, Clone, Default)]
pub struct KnownEvents(BTreeSet<String>);

impl KnownEvents {
    pub fn new(events: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(events.into_iter().map(Into::into).collect())
    }

    /// The host's standard event set.
    pub fn stock() -> Self {
        Self::new([
            STOCK_UPLOAD_EVENT,
            "PLUGIN_OCTOLAPSE_MOVIE_DONE",
            "PLUGIN_OCTOLAPSE_SNAPSHOT_ARCHIVE_DONE",
        ])
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.contains(event)
    }

    pub fn insert(&mut self, event: impl Into<String>) {
        self.0.insert(event.into());
    }
}

/// Mapping from event identifier to payload path key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMap {
    entries: BTreeMap<String, String>,
}

impl EventMap {
    /// Build the table from scratch: the stock entry unconditionally, then
    /// each operator entry in order. Unknown event identifiers and
    /// duplicates are logged and skipped (first registration wins).
    pub fn rebuild(known: &KnownEvents, operator_entries: &[EventMappingEntry]) -> Self {
        let mut map = Self::default();
        map.entries
            .insert(STOCK_UPLOAD_EVENT.to_string(), STOCK_PAYLOAD_KEY.to_string());

        for entry in operator_entries {
            map.add_entry(known, entry);
        }

        map
    }

    fn add_entry(&mut self, known: &KnownEvents, entry: &EventMappingEntry) {
        if !known.contains(&entry.event_name) {
            warn!(
                event = %entry.event_name,
                "Attempted to add an event that does not exist"
            );
            return;
        }
        if self.entries.contains_key(&entry.event_name) {
            warn!(
                event = %entry.event_name,
                "Attempted to add a duplicate upload event"
            );
            return;
        }
        self.entries
            .insert(entry.event_name.clone(), entry.payload_path_key.clone());
    }

    /// Payload key for a tracked event, if any.
    pub fn lookup(&self, event: &str) -> Option<&str> {
        self.entries.get(event).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: &str, key: &str) -> EventMappingEntry {
        EventMappingEntry {
            event_name: event.to_string(),
            payload_path_key: key.to_string(),
        }
    }

    #[test]
    fn test_stock_entry_always_present() {
        let map = EventMap::rebuild(&KnownEvents::stock(), &[]);
        assert_eq!(map.lookup(STOCK_UPLOAD_EVENT), Some(STOCK_PAYLOAD_KEY));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_operator_entries_added() {
        let map = EventMap::rebuild(
            &KnownEvents::stock(),
            &[entry("PLUGIN_OCTOLAPSE_MOVIE_DONE", "movie")],
        );
        assert_eq!(map.lookup("PLUGIN_OCTOLAPSE_MOVIE_DONE"), Some("movie"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_unknown_event_never_inserted() {
        let map = EventMap::rebuild(
            &KnownEvents::stock(),
            &[entry("NO_SUCH_EVENT", "movie")],
        );
        assert_eq!(map.lookup("NO_SUCH_EVENT"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_duplicate_entry_first_wins() {
        let map = EventMap::rebuild(
            &KnownEvents::stock(),
            &[
                entry("PLUGIN_OCTOLAPSE_MOVIE_DONE", "movie"),
                entry("PLUGIN_OCTOLAPSE_MOVIE_DONE", "other_key"),
            ],
        );
        assert_eq!(map.lookup("PLUGIN_OCTOLAPSE_MOVIE_DONE"), Some("movie"));
    }

    #[test]
    fn test_duplicate_of_stock_entry_rejected() {
        let map = EventMap::rebuild(
            &KnownEvents::stock(),
            &[entry(STOCK_UPLOAD_EVENT, "other_key")],
        );
        assert_eq!(map.lookup(STOCK_UPLOAD_EVENT), Some(STOCK_PAYLOAD_KEY));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let known = KnownEvents::stock();
        let entries = vec![
            entry("PLUGIN_OCTOLAPSE_MOVIE_DONE", "movie"),
            entry("PLUGIN_OCTOLAPSE_SNAPSHOT_ARCHIVE_DONE", "archive"),
        ];

        let first = EventMap::rebuild(&known, &entries);
        let second = EventMap::rebuild(&known, &entries);
        assert_eq!(first, second);
        assert_eq!(second.len(), 3);
    }
}
