//! Canonical identity keys for tombstone lookups.
//!
//! Strong catalog identifiers are authoritative and provider-agnostic, so the
//! first one present wins. Only when an entity carries none of them does the
//! key fall back to `type|title|year`, which is a best-effort match: two
//! untyped items sharing a title and year produce the same key. Downstream
//! consumers rely on that coalescing, so it is kept as-is.

use std::collections::HashMap;
use std::sync::LazyLock;
use media_sync_models::Entity;
use regex::Regex;

/// Identifier names in trust order
pub const ID_PRIORITY: [&str; 7] = ["tmdb", "imdb", "tvdb", "trakt", "plex", "guid", "slug"];

/// Strategy that maps an entity to one stable identity string.
///
/// Hosts with a stronger identity service can plug in their own
/// implementation; `PriorityKeyResolver` is the built-in default.
pub trait KeyResolver: Send + Sync {
    fn canonical_key(&self, entity: &dyn Entity) -> String;
}

/// Default resolver: first non-empty identifier in `ID_PRIORITY`, else the
/// `type|title|year` fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityKeyResolver;

impl KeyResolver for PriorityKeyResolver {
    fn canonical_key(&self, entity: &dyn Entity) -> String {
        for name in ID_PRIORITY {
            if let Some(value) = entity.external_id(name) {
                if !value.is_empty() {
                    return format!("{}:{}", name, value.to_lowercase());
                }
            }
        }

        let kind = entity.media_type().map(|t| t.to_lowercase()).unwrap_or_default();
        let title = entity.title().map(|t| t.trim().to_lowercase()).unwrap_or_default();
        let year = entity.year().map(|y| y.into_owned()).unwrap_or_default();
        format!("{}|title:{}|year:{}", kind, title, year)
    }
}

/// Canonical key using the default resolver
pub fn canonical_key(entity: &dyn Entity) -> String {
    PriorityKeyResolver.canonical_key(entity)
}

const NORMALIZED_PRIORITY: [&str; 8] = ["tmdb", "imdb", "tvdb", "trakt", "plex", "guid", "slug", "simkl"];

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D+").expect("invalid digit pattern"));

static GUID_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)com\.plexapp\.agents\.imdb://(?P<id>tt\d+)", "imdb"),
        (r"(?i)com\.plexapp\.agents\.themoviedb://(?P<id>\d+)", "tmdb"),
        (r"(?i)com\.plexapp\.agents\.thetvdb://(?P<id>\d+)", "tvdb"),
        (r"(?i)plex://", "guid"),
        (r"(?i)imdb://(?P<id>tt\d+)", "imdb"),
        (r"(?i)tmdb://(?P<id>\d+)", "tmdb"),
        (r"(?i)tvdb://(?P<id>\d+)", "tvdb"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("invalid guid pattern"), label))
    .collect()
});

/// Resolver that normalizes identifiers before keying.
///
/// Numeric catalogs are reduced to their digits, IMDb IDs are coerced to
/// `tt<digits>`, and IDs embedded in Plex agent GUIDs are harvested (taking
/// precedence over the plain `ids` values). Items with neither an ID nor a
/// title key as `unknown:`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizingKeyResolver;

impl NormalizingKeyResolver {
    fn normalize_id(name: &str, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        let normalized = match name {
            "tmdb" | "tvdb" | "trakt" | "simkl" | "plex" => NON_DIGITS.replace_all(value, "").into_owned(),
            "imdb" => {
                let lower = value.to_lowercase();
                if lower.starts_with("tt") && lower.chars().any(|c| c.is_ascii_digit()) {
                    lower
                } else {
                    let digits = NON_DIGITS.replace_all(value, "");
                    if digits.is_empty() {
                        return None;
                    }
                    format!("tt{}", digits)
                }
            }
            "slug" => value.to_lowercase(),
            _ => value.to_string(),
        };

        (!normalized.is_empty()).then_some(normalized)
    }

    fn ids_from_guid(guid: &str) -> Vec<(&'static str, String)> {
        let guid = guid.trim();
        if guid.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for (pattern, label) in GUID_PATTERNS.iter() {
            let Some(captures) = pattern.captures(guid) else {
                continue;
            };
            if *label == "guid" {
                found.push(("guid", guid.to_string()));
            } else if let Some(id) = captures.name("id").and_then(|m| Self::normalize_id(label, m.as_str())) {
                found.push((*label, id));
            }
        }
        found
    }

    fn title_year_key(entity: &dyn Entity) -> Option<String> {
        let title = entity.title()?;
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let kind = entity
            .media_type()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "movie".to_string());
        let year = entity.year().map(|y| y.trim().to_string()).unwrap_or_default();
        Some(format!("{}|title:{}|year:{}", kind, title.to_lowercase(), year))
    }
}

impl KeyResolver for NormalizingKeyResolver {
    fn canonical_key(&self, entity: &dyn Entity) -> String {
        // Later sources win: top-level fields, then `ids`, then the GUID
        let mut ids: HashMap<&'static str, String> = HashMap::new();
        for name in NORMALIZED_PRIORITY {
            if let Some(id) = entity.top_level_id(name).and_then(|raw| Self::normalize_id(name, &raw)) {
                ids.insert(name, id);
            }
        }
        for name in NORMALIZED_PRIORITY {
            if let Some(id) = entity.external_id(name).and_then(|raw| Self::normalize_id(name, &raw)) {
                ids.insert(name, id);
            }
        }
        let guid = entity
            .top_level_id("guid")
            .filter(|g| !g.trim().is_empty())
            .or_else(|| entity.external_id("guid"));
        if let Some(guid) = guid {
            for (label, id) in Self::ids_from_guid(&guid) {
                ids.insert(label, id);
            }
        }

        for name in NORMALIZED_PRIORITY {
            if let Some(id) = ids.get(name) {
                return format!("{}:{}", name, id).to_lowercase();
            }
        }

        Self::title_year_key(entity).unwrap_or_else(|| "unknown:".to_string())
    }
}
