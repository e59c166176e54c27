use anyhow::Result;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info, warn};
use crate::error::StoreError;
use crate::store::{LastNegativeTimestamp, NegativeQuery, TombstoneStore};

const SNAPSHOT_MODEL: &str = "global";
const SNAPSHOT_VERSION: u64 = 2;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EntryScope {
    pub list: String,
    pub dim: String,
}

/// One negative event as persisted by the tombstone store
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TombstoneEntry {
    #[serde(default)]
    pub keys: Vec<String>,
    pub scope: EntryScope,
    #[serde(default)]
    pub origin: String,
    pub ts_iso: String,
    #[serde(default)]
    pub propagate_until_iso: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub pair_ids: Option<Vec<String>>,
}

impl TombstoneEntry {
    fn matches(&self, query: &NegativeQuery<'_>) -> bool {
        if !self.scope.list.eq_ignore_ascii_case(query.list) || !self.scope.dim.eq_ignore_ascii_case(query.dim) {
            return false;
        }
        if !self.keys.iter().any(|k| k.eq_ignore_ascii_case(query.key)) {
            return false;
        }
        match (query.pair_id, &self.pair_ids) {
            (Some(pair), Some(pairs)) => pairs.iter().any(|p| p == pair),
            _ => true,
        }
    }

    fn timestamp(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(&self.ts_iso).ok().map(|dt| dt.timestamp())
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    version: Value,
    #[serde(default)]
    entries: Vec<Value>,
}

/// Header version as an integer; anything unreadable or negative counts as 0
fn document_version(version: &Value) -> u64 {
    match version {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Read-only view over a tombstone document written by the store.
///
/// Answers the last-negative-timestamp capability from the document's
/// entries and can carry the configuration tree the host loaded. It never
/// writes the document back.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    entries: Vec<TombstoneEntry>,
    config: Option<Value>,
}

impl SnapshotStore {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let doc: SnapshotDocument = serde_json::from_str(content)?;

        let version = document_version(&doc.version);
        if doc.model.as_deref() != Some(SNAPSHOT_MODEL) || version < SNAPSHOT_VERSION {
            warn!(
                "Tombstone document has model {:?} version {}, expected {} v{}; treating as empty",
                doc.model, doc.version, SNAPSHOT_MODEL, SNAPSHOT_VERSION
            );
            return Ok(Self::default());
        }

        let mut entries = Vec::with_capacity(doc.entries.len());
        let mut skipped = 0;
        for raw in doc.entries {
            match serde_json::from_value::<TombstoneEntry>(raw) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    debug!("Skipping unreadable tombstone entry: {}", e);
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {} unreadable tombstone entries", skipped);
        }

        Ok(Self { entries, config: None })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read tombstone snapshot {:?}: {}", path, e))?;
        let store = Self::from_json_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tombstone snapshot {:?}: {}", path, e))?;
        info!("Loaded {} tombstone entries from {:?}", store.len(), path);
        Ok(store)
    }

    /// Attach the configuration tree the policy should resolve TTLs from
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn entries(&self) -> &[TombstoneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TombstoneStore for SnapshotStore {
    fn as_last_negative_timestamp(&self) -> Option<&dyn LastNegativeTimestamp> {
        Some(self)
    }

    fn config(&self) -> Result<Option<Cow<'_, Value>>, StoreError> {
        Ok(self.config.as_ref().map(Cow::Borrowed))
    }
}

impl LastNegativeTimestamp for SnapshotStore {
    fn last_negative_ts(&self, query: &NegativeQuery<'_>) -> Result<Option<i64>, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.matches(query))
            .filter_map(TombstoneEntry::timestamp)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOC: &str = r#"{
        "model": "global",
        "version": 2,
        "ttl_sec": 604800,
        "updated_at": "2023-11-14T22:13:20Z",
        "entries": [
            {
                "keys": ["tmdb:603", "imdb:tt0133093", "movie|title:the matrix|year:1999"],
                "scope": {"list": "ratings", "dim": "unrate"},
                "origin": "PLEX",
                "ts_iso": "2023-11-13T22:13:20Z",
                "propagate_until_iso": "2023-11-20T22:13:20Z",
                "note": null,
                "pair_ids": ["plex-trakt"]
            },
            {
                "keys": ["tmdb:603"],
                "scope": {"list": "ratings", "dim": "unrate"},
                "origin": "TRAKT",
                "ts_iso": "2023-11-10T22:13:20Z",
                "propagate_until_iso": "2023-11-17T22:13:20Z"
            },
            {
                "keys": ["tmdb:603"],
                "scope": {"list": "watchlist", "dim": "remove"},
                "origin": "SIMKL",
                "ts_iso": "2023-11-14T21:13:20Z"
            },
            {"keys": ["broken"], "origin": "PLEX"}
        ],
        "keys": {}
    }"#;

    fn query<'a>(key: &'a str, list: &'a str, dim: &'a str, pair_id: Option<&'a str>) -> NegativeQuery<'a> {
        NegativeQuery { key, list, dim, pair_id }
    }

    #[test]
    fn test_parses_entries_and_skips_broken_ones() {
        let store = SnapshotStore::from_json_str(DOC).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.entries()[0].origin, "PLEX");
        assert_eq!(store.entries()[0].pair_ids, Some(vec!["plex-trakt".to_string()]));
    }

    #[test]
    fn test_last_negative_ts_picks_newest_match() {
        let store = SnapshotStore::from_json_str(DOC).unwrap();
        let ts = store.last_negative_ts(&query("tmdb:603", "ratings", "unrate", None)).unwrap();
        // 2023-11-13T22:13:20Z
        assert_eq!(ts, Some(1_699_913_600));

        let by_imdb = store.last_negative_ts(&query("imdb:tt0133093", "ratings", "unrate", None)).unwrap();
        assert_eq!(by_imdb, Some(1_699_913_600));
    }

    #[test]
    fn test_last_negative_ts_respects_scope() {
        let store = SnapshotStore::from_json_str(DOC).unwrap();
        assert_eq!(store.last_negative_ts(&query("tmdb:603", "history", "unscrobble", None)).unwrap(), None);
        assert_eq!(store.last_negative_ts(&query("tmdb:604", "ratings", "unrate", None)).unwrap(), None);
        assert_eq!(
            store.last_negative_ts(&query("tmdb:603", "watchlist", "remove", None)).unwrap(),
            Some(1_699_996_400)
        );
    }

    #[test]
    fn test_pair_scoped_entries() {
        let store = SnapshotStore::from_json_str(DOC).unwrap();
        // The newest entry belongs to another pair; the unscoped one still applies
        let other_pair = store
            .last_negative_ts(&query("tmdb:603", "ratings", "unrate", Some("simkl-trakt")))
            .unwrap();
        assert_eq!(other_pair, Some(1_699_654_400));

        let same_pair = store
            .last_negative_ts(&query("tmdb:603", "ratings", "unrate", Some("plex-trakt")))
            .unwrap();
        assert_eq!(same_pair, Some(1_699_913_600));
    }

    #[test]
    fn test_legacy_document_reads_as_empty() {
        let store = SnapshotStore::from_json_str(r#"{"keys": {"watchlist|tmdb:603": 1699913600}}"#).unwrap();
        assert!(store.is_empty());

        let old = SnapshotStore::from_json_str(r#"{"model": "global", "version": 1, "entries": []}"#).unwrap();
        assert!(old.is_empty());
    }

    #[test]
    fn test_odd_version_headers() {
        let as_string = DOC.replacen(r#""version": 2"#, r#""version": "2""#, 1);
        assert_eq!(SnapshotStore::from_json_str(&as_string).unwrap().len(), 3);

        for version in [r#""two""#, "-1", "null", "[2]"] {
            let doc = DOC.replacen(r#""version": 2"#, &format!(r#""version": {}"#, version), 1);
            let store = SnapshotStore::from_json_str(&doc).unwrap();
            assert!(store.is_empty(), "version {} should read as legacy", version);
        }
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(SnapshotStore::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_config_is_exposed_to_the_policy() {
        let store = SnapshotStore::default().with_config(serde_json::json!({"sync": {"gmt_enable": true}}));
        let config = store.config().unwrap().unwrap();
        assert_eq!(config["sync"]["gmt_enable"], true);
        assert!(store.supports_last_negative_timestamp());
        assert!(!store.supports_suppress_by_key());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let store = SnapshotStore::load_from_file(file.path()).unwrap();
        assert_eq!(store.len(), 3);

        assert!(SnapshotStore::load_from_file(Path::new("/nonexistent/tombstones.json")).is_err());
    }
}
