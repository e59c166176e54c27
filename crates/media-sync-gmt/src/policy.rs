//! Suppression predicate.
//!
//! `GmtPolicy::should_suppress_write` is the entry point the sync pipeline
//! calls before every positive write. Its one hard guarantee is fail-open:
//! once the scope argument has been validated, any store error, malformed
//! record or panic inside the evaluation yields "do not suppress". A store
//! outage therefore costs some flap protection and never a user's write.

use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use media_sync_models::{opposite, Entity, Scope};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use crate::clock::{Clock, SystemClock};
use crate::error::GmtError;
use crate::key::{KeyResolver, PriorityKeyResolver};
use crate::store::{record_timestamp, NegativeQuery, TombstoneStore};
use crate::ttl::quarantine_ttl_seconds;

/// Accepted shapes for the scope argument: a typed `Scope`, or an untyped
/// mapping with `list` and `dim` entries (missing entries read as empty).
pub trait ScopeArg {
    /// `(feature, write_dim)`, both lower-cased
    fn scope_parts(&self) -> Result<(String, String), GmtError>;
}

impl ScopeArg for Scope {
    fn scope_parts(&self) -> Result<(String, String), GmtError> {
        Ok((self.list.as_str().to_string(), self.dim.as_str().to_string()))
    }
}

impl ScopeArg for Map<String, Value> {
    fn scope_parts(&self) -> Result<(String, String), GmtError> {
        let part = |name: &str| match self.get(name) {
            Some(Value::String(s)) => s.to_lowercase(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string().to_lowercase(),
        };
        Ok((part("list"), part("dim")))
    }
}

impl ScopeArg for Value {
    fn scope_parts(&self) -> Result<(String, String), GmtError> {
        match self {
            Value::Object(map) => map.scope_parts(),
            other => Err(GmtError::InvalidScope(json_kind(other).to_string())),
        }
    }
}

impl<S: BuildHasher> ScopeArg for HashMap<String, String, S> {
    fn scope_parts(&self) -> Result<(String, String), GmtError> {
        let part = |name: &str| self.get(name).map(|s| s.to_lowercase()).unwrap_or_default();
        Ok((part("list"), part("dim")))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Tombstone policy with an injectable identity resolver and clock.
///
/// Holds no per-call state; one instance can be shared across sync workers.
#[derive(Clone)]
pub struct GmtPolicy {
    resolver: Arc<dyn KeyResolver>,
    clock: Arc<dyn Clock>,
}

impl Default for GmtPolicy {
    fn default() -> Self {
        Self {
            resolver: Arc::new(PriorityKeyResolver),
            clock: Arc::new(SystemClock),
        }
    }
}

impl GmtPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in priority-list identity resolver
    pub fn with_resolver(mut self, resolver: impl KeyResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn canonical_key(&self, entity: &dyn Entity) -> String {
        self.resolver.canonical_key(entity)
    }

    /// Decide whether a positive write should be held back.
    ///
    /// Returns `Err` only when `scope` has an unusable shape, which is a bug
    /// in the caller. Every other failure resolves to `Ok(false)`.
    ///
    /// `ttl_override_secs` replaces the configured quarantine when it is
    /// positive; zero or negative values are ignored.
    pub fn should_suppress_write(
        &self,
        store: &dyn TombstoneStore,
        entity: &dyn Entity,
        scope: &dyn ScopeArg,
        pair_id: Option<&str>,
        ttl_override_secs: Option<i64>,
    ) -> Result<bool, GmtError> {
        let (feature, write_dim) = scope.scope_parts()?;

        // Fail-open boundary: nothing below this point may block a write.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.evaluate(store, entity, &feature, &write_dim, pair_id, ttl_override_secs)
        }));

        match outcome {
            Ok(Ok(suppress)) => Ok(suppress),
            Ok(Err(e)) => {
                warn!("GMT check for {}/{} failed, allowing write: {}", feature, write_dim, e);
                Ok(false)
            }
            Err(_) => {
                warn!("GMT check for {}/{} panicked, allowing write", feature, write_dim);
                Ok(false)
            }
        }
    }

    /// Convenience check from a feature name and write verb
    pub fn suppress_check(
        &self,
        store: &dyn TombstoneStore,
        entity: &dyn Entity,
        feature: &str,
        write_op: &str,
        pair_id: Option<&str>,
    ) -> bool {
        let scope = json!({"list": feature, "dim": write_op});
        self.should_suppress_write(store, entity, &scope, pair_id, None)
            .unwrap_or(false)
    }

    fn evaluate(
        &self,
        store: &dyn TombstoneStore,
        entity: &dyn Entity,
        feature: &str,
        write_dim: &str,
        pair_id: Option<&str>,
        ttl_override_secs: Option<i64>,
    ) -> Result<bool, GmtError> {
        let key = self.resolver.canonical_key(entity);

        let ttl = match ttl_override_secs {
            Some(secs) if secs > 0 => secs as u64,
            _ => {
                let config = config_from(store);
                quarantine_ttl_seconds(config.as_deref(), feature)
            }
        };

        let want_dim = opposite(write_dim);
        let query = NegativeQuery {
            key: &key,
            list: feature,
            dim: &want_dim,
            pair_id,
        };
        debug!(
            "GMT check: key={} list={} write={} blocking_dim={} ttl={}s pair={:?}",
            key, feature, write_dim, want_dim, ttl, pair_id
        );

        if let Some(predicate) = store.as_suppress_by_key() {
            let suppress = predicate.should_suppress_by_key(&query, ttl).map_err(GmtError::store)?;
            log_decision(&query, suppress, "store predicate");
            return Ok(suppress);
        }

        if let Some(lookup) = store.as_last_negative_timestamp() {
            let ts = lookup.last_negative_ts(&query).map_err(GmtError::store)?;
            let suppress = ts.is_some_and(|ts| self.within_ttl(ts, ttl));
            log_decision(&query, suppress, "last negative timestamp");
            return Ok(suppress);
        }

        if let Some(lookup) = store.as_record_lookup() {
            let ts = match lookup.get(&query).map_err(GmtError::store)? {
                Some(record) => record_timestamp(&record)?,
                None => None,
            };
            let suppress = ts.is_some_and(|ts| self.within_ttl(ts, ttl));
            log_decision(&query, suppress, "record lookup");
            return Ok(suppress);
        }

        debug!("Tombstone store exposes no query capability, allowing write");
        Ok(false)
    }

    /// `now - ts < ttl`, strictly
    fn within_ttl(&self, ts: i64, ttl: u64) -> bool {
        let age = i128::from(self.clock.now_epoch_secs()) - i128::from(ts);
        age < i128::from(ttl)
    }
}

fn config_from(store: &dyn TombstoneStore) -> Option<Cow<'_, Value>> {
    match store.config() {
        Ok(config) => config,
        Err(e) => {
            debug!("Tombstone store config unavailable, using defaults: {}", e);
            None
        }
    }
}

fn log_decision(query: &NegativeQuery<'_>, suppress: bool, via: &str) {
    if suppress {
        debug!(
            "Suppressing write for {} in {}: recent {} ({})",
            query.key, query.list, query.dim, via
        );
    }
}

/// Suppression decision using the default resolver and the system clock
pub fn should_suppress_write(
    store: &dyn TombstoneStore,
    entity: &dyn Entity,
    scope: &dyn ScopeArg,
    pair_id: Option<&str>,
    ttl_override_secs: Option<i64>,
) -> Result<bool, GmtError> {
    GmtPolicy::default().should_suppress_write(store, entity, scope, pair_id, ttl_override_secs)
}

/// Feature/verb check using the default resolver and the system clock
pub fn suppress_check(
    store: &dyn TombstoneStore,
    entity: &dyn Entity,
    feature: &str,
    write_op: &str,
    pair_id: Option<&str>,
) -> bool {
    GmtPolicy::default().suppress_check(store, entity, feature, write_op, pair_id)
}
