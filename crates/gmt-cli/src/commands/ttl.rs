use crate::commands::{default_paths, load_config};
use crate::output::Output;
use color_eyre::Result;
use media_sync_gmt::{quarantine_ttl_seconds, ScopeList, SECONDS_PER_DAY};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

pub fn run_ttl(config_path: Option<PathBuf>, features: Vec<String>, output: &Output) -> Result<()> {
    let paths = default_paths();
    let config = load_config(config_path.as_deref(), &paths)?;

    let features = if features.is_empty() {
        ScopeList::ALL.iter().map(|l| l.as_str().to_string()).collect()
    } else {
        features
    };

    let windows: Vec<(String, u64)> = features
        .into_iter()
        .map(|f| {
            let f = f.to_lowercase();
            let ttl = quarantine_ttl_seconds(Some(config.tree()), &f);
            (f, ttl)
        })
        .collect();

    if output.is_human() {
        if !config.gmt_enabled() {
            output.warn("Tombstone policy is disabled (sync.gmt_enable = false)");
        }
        for (feature, ttl) in &windows {
            output.println(format!("{:<12} {:>8}s  ({})", feature, ttl, human_duration(*ttl)));
        }
    } else {
        let mut ttls = Map::new();
        for (feature, ttl) in windows {
            ttls.insert(feature, Value::from(ttl));
        }
        output.json(&json!({
            "gmt_enable": config.gmt_enabled(),
            "ttl_sec": ttls,
        }));
    }
    Ok(())
}

pub(crate) fn human_duration(secs: u64) -> String {
    if secs % SECONDS_PER_DAY == 0 {
        let days = secs / SECONDS_PER_DAY;
        format!("{} day{}", days, if days == 1 { "" } else { "s" })
    } else if secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!(human_duration(SECONDS_PER_DAY), "1 day");
        assert_eq!(human_duration(7 * SECONDS_PER_DAY), "7 days");
        assert_eq!(human_duration(7200), "2h");
        assert_eq!(human_duration(90), "90s");
    }
}
