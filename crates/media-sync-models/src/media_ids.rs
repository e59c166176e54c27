use serde::{Deserialize, Serialize};

/// External identifiers for a single media item.
///
/// Field names serialize to the provider names used throughout the sync
/// engine (`tmdb`, `imdb`, `tvdb`, ...) so a `MediaIds` round-trips with the
/// `ids` object of untyped provider records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediaIds {
    #[serde(default, rename = "tmdb", skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    #[serde(default, rename = "imdb", skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, rename = "tvdb", skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<u32>,
    #[serde(default, rename = "trakt", skip_serializing_if = "Option::is_none")]
    pub trakt_id: Option<u64>,
    #[serde(default, rename = "plex", skip_serializing_if = "Option::is_none")]
    pub plex_rating_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, rename = "simkl", skip_serializing_if = "Option::is_none")]
    pub simkl_id: Option<u64>,
}

impl MediaIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an identifier by provider name, rendered as a string
    ///
    /// Names are matched case-insensitively; `plex_rating_key` is accepted as
    /// an alias for `plex`. Unknown names return `None`.
    pub fn get(&self, name: &str) -> Option<String> {
        match name.to_lowercase().as_str() {
            "tmdb" => self.tmdb_id.map(|id| id.to_string()),
            "imdb" => self.imdb_id.clone(),
            "tvdb" => self.tvdb_id.map(|id| id.to_string()),
            "trakt" => self.trakt_id.map(|id| id.to_string()),
            "plex" | "plex_rating_key" => self.plex_rating_key.clone(),
            "guid" => self.guid.clone(),
            "slug" => self.slug.clone(),
            "simkl" => self.simkl_id.map(|id| id.to_string()),
            _ => None,
        }
    }

    /// Check if all ID fields are empty
    pub fn is_empty(&self) -> bool {
        self.tmdb_id.is_none()
            && self.imdb_id.is_none()
            && self.tvdb_id.is_none()
            && self.trakt_id.is_none()
            && self.plex_rating_key.is_none()
            && self.guid.is_none()
            && self.slug.is_none()
            && self.simkl_id.is_none()
    }
}
