use media_sync_config::ConfigView;
use serde_json::Value;
use tracing::debug;

pub const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Static quarantine length per feature, in days
pub fn default_quarantine_days(feature: &str) -> u64 {
    match feature {
        "watchlist" => 7,
        "ratings" => 3,
        "history" => 2,
        "playlists" => 7,
        _ => 7,
    }
}

/// Resolve the quarantine window for a feature, in seconds.
///
/// First strictly positive value wins:
/// 1. `sync.gmt.<feature>_sec`
/// 2. `sync.gmt.<feature>_days`
/// 3. `sync.gmt_quarantine_days`
/// 4. the static per-feature default
///
/// Missing, non-numeric, zero or negative overrides fall through to the next
/// tier. The result is always at least one second.
pub fn quarantine_ttl_seconds(config: Option<&Value>, feature: &str) -> u64 {
    let feature = feature.to_lowercase();
    let view = ConfigView::new(config);

    let sec_key = format!("{}_sec", feature);
    if let Some(secs) = view.positive_int(&["sync", "gmt", sec_key.as_str()]) {
        debug!("Quarantine TTL for {}: {}s from sync.gmt.{}", feature, secs, sec_key);
        return secs;
    }

    let days_key = format!("{}_days", feature);
    if let Some(days) = view.positive_int(&["sync", "gmt", days_key.as_str()]) {
        debug!("Quarantine TTL for {}: {} days from sync.gmt.{}", feature, days, days_key);
        return days.saturating_mul(SECONDS_PER_DAY);
    }

    if let Some(days) = view.positive_int(&["sync", "gmt_quarantine_days"]) {
        debug!("Quarantine TTL for {}: {} days from sync.gmt_quarantine_days", feature, days);
        return days.saturating_mul(SECONDS_PER_DAY);
    }

    default_quarantine_days(&feature) * SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_without_config() {
        assert_eq!(quarantine_ttl_seconds(None, "watchlist"), 7 * 24 * 3600);
        assert_eq!(quarantine_ttl_seconds(None, "ratings"), 3 * 24 * 3600);
        assert_eq!(quarantine_ttl_seconds(None, "history"), 2 * 24 * 3600);
        assert_eq!(quarantine_ttl_seconds(None, "playlists"), 7 * 24 * 3600);
        assert_eq!(quarantine_ttl_seconds(None, "reviews"), 7 * 24 * 3600);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = json!({});
        assert_eq!(quarantine_ttl_seconds(Some(&config), "history"), 2 * 24 * 3600);
    }

    #[test]
    fn test_precedence_seconds_days_global() {
        let config = json!({
            "sync": {
                "gmt_quarantine_days": 5,
                "gmt": {"ratings_days": 2, "ratings_sec": 10}
            }
        });
        assert_eq!(quarantine_ttl_seconds(Some(&config), "ratings"), 10);
        assert_eq!(quarantine_ttl_seconds(Some(&config), "RATINGS"), 10);
        assert_eq!(quarantine_ttl_seconds(Some(&config), "history"), 5 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_days_beat_global() {
        let config = json!({"sync": {"gmt_quarantine_days": 5, "gmt": {"watchlist_days": 1}}});
        assert_eq!(quarantine_ttl_seconds(Some(&config), "watchlist"), SECONDS_PER_DAY);
    }

    #[test]
    fn test_non_positive_overrides_fall_through() {
        let config = json!({
            "sync": {
                "gmt_quarantine_days": 0,
                "gmt": {"ratings_sec": -5, "ratings_days": "2", "history_sec": 0, "history_days": 1}
            }
        });
        assert_eq!(quarantine_ttl_seconds(Some(&config), "ratings"), 3 * SECONDS_PER_DAY);
        assert_eq!(quarantine_ttl_seconds(Some(&config), "history"), SECONDS_PER_DAY);
    }

    #[test]
    fn test_wrong_shaped_sections_are_ignored() {
        let config = json!({"sync": {"gmt": [1, 2, 3], "gmt_quarantine_days": 4}});
        assert_eq!(quarantine_ttl_seconds(Some(&config), "ratings"), 4 * SECONDS_PER_DAY);

        let config = json!({"sync": "off"});
        assert_eq!(quarantine_ttl_seconds(Some(&config), "ratings"), 3 * SECONDS_PER_DAY);
    }
}
