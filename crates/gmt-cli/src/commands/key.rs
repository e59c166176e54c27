use crate::commands::read_entity;
use crate::output::Output;
use color_eyre::Result;
use media_sync_gmt::{KeyResolver, NormalizingKeyResolver, PriorityKeyResolver};
use serde_json::json;

pub fn run_key(source: &str, normalize: bool, output: &Output) -> Result<()> {
    let entity = read_entity(source)?;

    let (resolver, key) = if normalize {
        ("normalizing", NormalizingKeyResolver.canonical_key(&entity))
    } else {
        ("priority", PriorityKeyResolver.canonical_key(&entity))
    };

    if output.is_human() {
        output.println(&key);
    } else {
        output.json(&json!({ "key": key, "resolver": resolver }));
    }
    Ok(())
}
