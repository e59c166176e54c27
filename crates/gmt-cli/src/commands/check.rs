use crate::commands::{default_paths, load_config, read_entity};
use crate::commands::ttl::human_duration;
use crate::output::Output;
use clap::{ArgAction, Args};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use media_sync_config::Config;
use media_sync_gmt::{opposite, quarantine_ttl_seconds, GmtPolicy, NormalizingKeyResolver, SnapshotStore};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Tombstone document (defaults to tombstones.json in the config directory)
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Entity JSON file, or '-' for stdin
    #[arg(long, value_name = "FILE")]
    pub entity: String,

    /// Feature the write targets (watchlist, ratings, history, playlists)
    #[arg(long)]
    pub list: String,

    /// Write verb (add, rate, scrobble, ...)
    #[arg(long)]
    pub dim: String,

    /// Restrict to tombstones recorded for this sync pair
    #[arg(long, value_name = "ID")]
    pub pair: Option<String>,

    /// Quarantine override in seconds; ignored unless positive
    #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
    pub ttl_sec: Option<i64>,

    /// Config file (defaults to the standard config location)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Normalize identifiers and parse provider GUIDs before keying
    #[arg(long, action = ArgAction::SetTrue)]
    pub normalize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub key: String,
    pub list: String,
    pub write_dim: String,
    pub blocking_dim: String,
    pub ttl_sec: u64,
    pub pair: Option<String>,
    pub gmt_enable: bool,
    pub suppress: bool,
}

pub fn run_check(args: CheckArgs, output: &Output) -> Result<()> {
    let paths = default_paths();
    let config = load_config(args.config.as_deref(), &paths)?;

    let snapshot_path = args.snapshot.clone().unwrap_or_else(|| paths.tombstones_file());
    let store = if snapshot_path.exists() {
        SnapshotStore::load_from_file(&snapshot_path).map_err(|e| eyre!("{:#}", e))?
    } else if args.snapshot.is_some() {
        return Err(eyre!("Tombstone document {} does not exist", snapshot_path.display()));
    } else {
        output.warn(format!("No tombstone document at {}; nothing can suppress", snapshot_path.display()));
        SnapshotStore::default()
    };

    let entity = read_entity(&args.entity)?;
    let report = evaluate(&args, &config, store, &entity, GmtPolicy::new())?;
    info!(
        "GMT check {}/{} for {}: suppress={}",
        report.list, report.write_dim, report.key, report.suppress
    );

    render(&report, output);
    Ok(())
}

pub(crate) fn evaluate(
    args: &CheckArgs,
    config: &Config,
    store: SnapshotStore,
    entity: &Value,
    policy: GmtPolicy,
) -> Result<CheckReport> {
    let policy = if args.normalize {
        policy.with_resolver(NormalizingKeyResolver)
    } else {
        policy
    };
    let store = store.with_config(config.tree().clone());

    let list = args.list.to_lowercase();
    let write_dim = args.dim.to_lowercase();
    let scope = json!({"list": list, "dim": write_dim});

    let suppress = policy
        .should_suppress_write(&store, entity, &scope, args.pair.as_deref(), args.ttl_sec)
        .wrap_err("Invalid scope")?;

    let ttl_sec = match args.ttl_sec {
        Some(secs) if secs > 0 => secs as u64,
        _ => quarantine_ttl_seconds(Some(config.tree()), &list),
    };

    Ok(CheckReport {
        key: policy.canonical_key(entity),
        blocking_dim: opposite(&write_dim),
        list,
        write_dim,
        ttl_sec,
        pair: args.pair.clone(),
        gmt_enable: config.gmt_enabled(),
        suppress,
    })
}

fn render(report: &CheckReport, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "key": report.key,
            "list": report.list,
            "dim": report.write_dim,
            "blocking_dim": report.blocking_dim,
            "ttl_sec": report.ttl_sec,
            "pair": report.pair,
            "gmt_enable": report.gmt_enable,
            "suppress": report.suppress,
        }));
        return;
    }

    if !report.gmt_enable {
        output.warn("Tombstone policy is disabled (sync.gmt_enable = false); showing the decision anyway");
    }
    output.println(format!("key: {}", report.key));
    if report.suppress {
        output.warn(format!(
            "{} {} suppressed: recent {} within {}",
            report.list,
            report.write_dim,
            report.blocking_dim,
            human_duration(report.ttl_sec)
        ));
    } else {
        output.success(format!(
            "{} {} allowed: no {} within {}",
            report.list,
            report.write_dim,
            report.blocking_dim,
            human_duration(report.ttl_sec)
        ));
    }
}
