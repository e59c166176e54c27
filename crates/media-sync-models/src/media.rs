use serde::{Deserialize, Serialize};
use crate::media_ids::MediaIds;

/// A media item as reported by a provider adapter.
///
/// Every field is optional: adapters frequently know only a subset of the
/// identifiers, and some (e.g. a freshly created playlist entry) know nothing
/// but a title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

impl MediaItem {
    pub fn new(ids: MediaIds) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Set descriptive metadata used by the title/year key fallback
    pub fn with_metadata(mut self, title: impl Into<String>, year: Option<u32>, media_type: MediaType) -> Self {
        self.title = Some(title.into());
        self.year = year;
        self.media_type = Some(media_type);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
    Episode,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Episode => "episode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_item_from_provider_record() {
        let item: MediaItem = serde_json::from_value(json!({
            "type": "episode",
            "title": "Pilot",
            "year": 2008,
            "ids": {"tvdb": 349232}
        }))
        .unwrap();
        assert_eq!(item.media_type, Some(MediaType::Episode));
        assert_eq!(item.ids.tvdb_id, Some(349232));
        assert_eq!(item.title.as_deref(), Some("Pilot"));
    }

    #[test]
    fn test_media_type_names() {
        for kind in [MediaType::Movie, MediaType::Show, MediaType::Episode] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }
}
