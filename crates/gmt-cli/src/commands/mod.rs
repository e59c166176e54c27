pub mod check;
pub mod key;
pub mod ttl;

use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use media_sync_config::{Config, PathManager};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Read an entity record from a file, or from stdin when `source` is "-"
pub fn read_entity(source: &str) -> Result<Value> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("Failed to read entity from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).wrap_err_with(|| format!("Failed to read entity file {}", source))?
    };

    let entity: Value = serde_json::from_str(&content).wrap_err("Entity is not valid JSON")?;
    if !entity.is_object() {
        return Err(eyre!("Entity must be a JSON object"));
    }
    Ok(entity)
}

/// Explicit config path must exist; the default location may be absent
pub fn load_config(explicit: Option<&Path>, paths: &PathManager) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_file(path).map_err(|e| eyre!("{:#}", e)),
        None => Config::load_or_default(&paths.config_file()).map_err(|e| eyre!("{:#}", e)),
    }
}

pub fn default_paths() -> PathManager {
    PathManager::default()
}
