use std::borrow::Cow;
use serde_json::Value;
use crate::media::MediaItem;

/// Read-only view of a media item for identity resolution
///
/// Providers hand the sync engine anything from fully typed `MediaItem`s to
/// raw JSON records, so identity resolution only relies on "identifier lookup
/// by name" plus a few optional descriptive fields. Every accessor may return
/// `None`; implementations never fail.
pub trait Entity {
    /// Identifier for a provider name such as `tmdb`, `imdb` or `guid`
    fn external_id(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Identifier some providers report beside `ids` rather than inside it.
    /// Only the normalizing resolver consults these.
    fn top_level_id(&self, _name: &str) -> Option<Cow<'_, str>> {
        None
    }

    fn media_type(&self) -> Option<Cow<'_, str>>;

    fn title(&self) -> Option<Cow<'_, str>>;

    /// Release year, rendered as it was reported
    fn year(&self) -> Option<Cow<'_, str>>;
}

impl<T: Entity + ?Sized> Entity for &T {
    fn external_id(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).external_id(name)
    }

    fn top_level_id(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).top_level_id(name)
    }

    fn media_type(&self) -> Option<Cow<'_, str>> {
        (**self).media_type()
    }

    fn title(&self) -> Option<Cow<'_, str>> {
        (**self).title()
    }

    fn year(&self) -> Option<Cow<'_, str>> {
        (**self).year()
    }
}

impl Entity for MediaItem {
    fn external_id(&self, name: &str) -> Option<Cow<'_, str>> {
        self.ids.get(name).map(Cow::Owned)
    }

    fn media_type(&self) -> Option<Cow<'_, str>> {
        self.media_type.as_ref().map(|t| Cow::Borrowed(t.as_str()))
    }

    fn title(&self) -> Option<Cow<'_, str>> {
        self.title.as_deref().map(Cow::Borrowed)
    }

    fn year(&self) -> Option<Cow<'_, str>> {
        self.year.map(|y| Cow::Owned(y.to_string()))
    }
}

/// Untyped provider record: identifiers live under `ids`, descriptive fields
/// (`type`, `title`, `year`) at the top level. Some providers also put IDs or a
/// `guid` at the top level; `top_level_id` exposes those. Anything that is not
/// an object, or a field of the wrong shape, reads as absent.
impl Entity for Value {
    fn external_id(&self, name: &str) -> Option<Cow<'_, str>> {
        let ids = self.get("ids")?;
        let value = ids.get(name).or_else(|| ids.get(name.to_lowercase().as_str()))?;
        scalar_str(value)
    }

    fn top_level_id(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_object()?.get(name).and_then(scalar_str)
    }

    fn media_type(&self) -> Option<Cow<'_, str>> {
        self.get("type").and_then(scalar_str)
    }

    fn title(&self) -> Option<Cow<'_, str>> {
        self.get("title").and_then(scalar_str)
    }

    fn year(&self) -> Option<Cow<'_, str>> {
        self.get("year").and_then(scalar_str)
    }
}

fn scalar_str(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MediaIds, MediaType};
    use serde_json::json;

    #[test]
    fn test_media_item_entity() {
        let item = MediaItem::new(MediaIds {
            tmdb_id: Some(603),
            ..MediaIds::default()
        })
        .with_metadata("The Matrix", Some(1999), MediaType::Movie);

        assert_eq!(item.external_id("tmdb").as_deref(), Some("603"));
        assert_eq!(item.external_id("imdb"), None);
        assert_eq!(item.media_type().as_deref(), Some("movie"));
        assert_eq!(item.title().as_deref(), Some("The Matrix"));
        assert_eq!(item.year().as_deref(), Some("1999"));
    }

    #[test]
    fn test_json_entity_reads_ids_and_metadata() {
        let record = json!({
            "type": "show",
            "title": "Severance",
            "year": 2022,
            "ids": {"tvdb": 371980, "imdb": "tt11280740"}
        });

        assert_eq!(record.external_id("tvdb").as_deref(), Some("371980"));
        assert_eq!(record.external_id("imdb").as_deref(), Some("tt11280740"));
        assert_eq!(record.external_id("tmdb"), None);
        assert_eq!(record.media_type().as_deref(), Some("show"));
        assert_eq!(record.year().as_deref(), Some("2022"));
    }

    #[test]
    fn test_json_entity_top_level_ids_are_separate() {
        let record = json!({"tmdb": 603, "guid": "plex://movie/abc", "ids": {"imdb": "tt0133093"}});
        assert_eq!(record.top_level_id("tmdb").as_deref(), Some("603"));
        assert_eq!(record.top_level_id("guid").as_deref(), Some("plex://movie/abc"));
        assert_eq!(record.top_level_id("imdb"), None);
        assert_eq!(record.external_id("tmdb"), None);

        let item = MediaItem::default();
        assert_eq!(item.top_level_id("tmdb"), None);
    }

    #[test]
    fn test_json_entity_tolerates_wrong_shapes() {
        let record = json!({"ids": ["tmdb", 1], "title": {"en": "x"}, "year": null});
        assert_eq!(record.external_id("tmdb"), None);
        assert_eq!(record.title(), None);
        assert_eq!(record.year(), None);

        let not_an_object = json!("tt0133093");
        assert_eq!(not_an_object.external_id("imdb"), None);
        assert_eq!(not_an_object.top_level_id("imdb"), None);
        assert_eq!(not_an_object.media_type(), None);
    }
}
