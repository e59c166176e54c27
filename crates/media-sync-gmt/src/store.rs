//! Capability contract for tombstone stores
//!
//! The store is supplied by the host and may implement any subset of three
//! query capabilities. The policy asks for them strongest-first and uses the
//! first one present, so a store only needs to expose what it can answer.

use std::borrow::Cow;
use serde_json::Value;
use crate::error::{GmtError, StoreError};

/// Arguments shared by every store query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeQuery<'a> {
    /// Canonical key of the entity
    pub key: &'a str,
    /// Feature / list name, lower-cased
    pub list: &'a str,
    /// Negative dimension whose recent presence blocks the write
    pub dim: &'a str,
    pub pair_id: Option<&'a str>,
}

/// Registry pattern for reaching store capabilities without downcasting
///
/// Every accessor defaults to "not supported".
pub trait TombstoneStore: Send + Sync {
    /// Get the SuppressByKey capability if the store applies TTLs itself
    fn as_suppress_by_key(&self) -> Option<&dyn SuppressByKey> {
        None
    }

    /// Get the LastNegativeTimestamp capability if supported
    fn as_last_negative_timestamp(&self) -> Option<&dyn LastNegativeTimestamp> {
        None
    }

    /// Get the RecordLookup capability if supported
    fn as_record_lookup(&self) -> Option<&dyn RecordLookup> {
        None
    }

    /// Configuration tree the store was opened with, if it carries one
    fn config(&self) -> Result<Option<Cow<'_, Value>>, StoreError> {
        Ok(None)
    }

    /// Check if this store answers suppression directly
    fn supports_suppress_by_key(&self) -> bool {
        self.as_suppress_by_key().is_some()
    }

    /// Check if this store reports last negative timestamps
    fn supports_last_negative_timestamp(&self) -> bool {
        self.as_last_negative_timestamp().is_some()
    }

    /// Check if this store supports generic record lookup
    fn supports_record_lookup(&self) -> bool {
        self.as_record_lookup().is_some()
    }
}

/// Strongest capability: the store applies the TTL comparison itself
pub trait SuppressByKey: Send + Sync {
    fn should_suppress_by_key(&self, query: &NegativeQuery<'_>, ttl_secs: u64) -> Result<bool, StoreError>;
}

/// Epoch seconds of the most recent matching negative event
pub trait LastNegativeTimestamp: Send + Sync {
    fn last_negative_ts(&self, query: &NegativeQuery<'_>) -> Result<Option<i64>, StoreError>;
}

/// Generic record lookup; the record is expected to carry a `ts` field
pub trait RecordLookup: Send + Sync {
    fn get(&self, query: &NegativeQuery<'_>) -> Result<Option<Value>, StoreError>;
}

/// Extract the `ts` field from a generic store record.
///
/// Records that are not objects, or have no `ts`, carry no timestamp. A `ts`
/// must be a number or an integer string; anything else is malformed.
pub fn record_timestamp(record: &Value) -> Result<Option<i64>, GmtError> {
    let Some(ts) = record.as_object().and_then(|map| map.get("ts")) else {
        return Ok(None);
    };

    let parsed = match ts {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| GmtError::MalformedRecord(format!("unusable ts value {}", ts)))
}
