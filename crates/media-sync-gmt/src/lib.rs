//! Global tombstone (GMT) policy.
//!
//! Decides whether a positive write (add, rate, scrobble) should be held back
//! because the opposing negative event was recorded for the same item within
//! the quarantine window. The policy only reads tombstones; recording them is
//! the store's business.

pub mod clock;
pub mod error;
pub mod events;
pub mod key;
pub mod policy;
pub mod snapshot;
pub mod store;
pub mod ttl;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{GmtError, StoreError};
pub use events::negative_dimension_for;
pub use key::{canonical_key, KeyResolver, NormalizingKeyResolver, PriorityKeyResolver, ID_PRIORITY};
pub use policy::{should_suppress_write, suppress_check, GmtPolicy, ScopeArg};
pub use snapshot::{SnapshotStore, TombstoneEntry};
pub use store::{record_timestamp, LastNegativeTimestamp, NegativeQuery, RecordLookup, SuppressByKey, TombstoneStore};
pub use ttl::{default_quarantine_days, quarantine_ttl_seconds, SECONDS_PER_DAY};

pub use media_sync_models::{is_negative, opposite, Entity, Scope, ScopeDim, ScopeList};
