use serde_json::{json, Value};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use crate::view::ConfigView;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config root must be a table")]
    NotATable,
}

/// Built-in defaults that user configuration is merged over.
///
/// `sync.gmt_quarantine_days` is intentionally absent: a global value here
/// would shadow the per-feature quarantine defaults.
pub fn default_config() -> Value {
    json!({
        "sync": {
            "gmt_enable": false,
        }
    })
}

/// Merge `overlay` into `base`. Tables merge key by key; any other overlay
/// value replaces what was there.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Layered configuration: defaults with the user's file merged on top.
///
/// The merged tree is kept untyped so that a badly typed value only affects
/// the setting that reads it, never the whole load.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    tree: Value,
}

impl Config {
    pub fn from_value(user: Value) -> Result<Self, ConfigError> {
        if !user.is_object() {
            return Err(ConfigError::NotATable);
        }
        let mut tree = default_config();
        deep_merge(&mut tree, user);
        Ok(Self { tree })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let user: Value = toml::from_str(content)?;
        Self::from_value(user)
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Like `load_from_file`, but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("Config file {:?} does not exist, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn view(&self) -> ConfigView<'_> {
        ConfigView::new(Some(&self.tree))
    }

    /// Whether hosts should consult the tombstone policy at all
    pub fn gmt_enabled(&self) -> bool {
        self.view().bool(&["sync", "gmt_enable"]).unwrap_or(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { tree: default_config() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_deep_merge_tables_and_scalars() {
        let mut base = json!({"sync": {"gmt_enable": false, "dry_run": false}, "runtime": {"debug": false}});
        deep_merge(&mut base, json!({"sync": {"gmt_enable": true, "gmt": {"ratings_days": 1}}, "runtime": 3}));

        assert_eq!(
            base,
            json!({
                "sync": {"gmt_enable": true, "dry_run": false, "gmt": {"ratings_days": 1}},
                "runtime": 3
            })
        );
    }

    #[test]
    fn test_defaults_do_not_set_global_quarantine() {
        let config = Config::default();
        assert!(!config.gmt_enabled());
        assert_eq!(config.view().get(&["sync", "gmt_quarantine_days"]), None);
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
            [sync]
            gmt_enable = true
            gmt_quarantine_days = 5

            [sync.gmt]
            ratings_days = 2
            ratings_sec = 10
            "#,
        )
        .unwrap();

        assert!(config.gmt_enabled());
        assert_eq!(config.view().positive_int(&["sync", "gmt_quarantine_days"]), Some(5));
        assert_eq!(config.view().positive_int(&["sync", "gmt", "ratings_sec"]), Some(10));
    }

    #[test]
    fn test_badly_typed_values_still_load() {
        let config = Config::from_toml_str(
            r#"
            [sync]
            gmt_enable = "yes"
            gmt_quarantine_days = "seven"
            "#,
        )
        .unwrap();

        assert!(!config.gmt_enabled());
        assert_eq!(config.view().positive_int(&["sync", "gmt_quarantine_days"]), None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(Config::from_toml_str("[sync"), Err(ConfigError::Toml(_))));
        assert!(matches!(Config::from_value(json!([1, 2])), Err(ConfigError::NotATable)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sync.gmt]\nhistory_days = 1").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.view().positive_int(&["sync", "gmt", "history_days"]), Some(1));
        assert_eq!(config.view().bool(&["sync", "gmt_enable"]), Some(false));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
