//! Scopes the tombstone policy reasons about.
//!
//! A scope is a `(list, dim)` pair: which synchronized list an operation
//! touches and which operation it is. Every dimension has exactly one
//! opposite, and the negative half of each pair (`remove`, `unrate`,
//! `unscrobble`) is what tombstones record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseScopeError {
    #[error("unknown scope list: {0}")]
    UnknownList(String),
    #[error("unknown scope dimension: {0}")]
    UnknownDim(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeList {
    Watchlist,
    Ratings,
    History,
    Playlists,
}

impl ScopeList {
    pub const ALL: [ScopeList; 4] = [
        ScopeList::Watchlist,
        ScopeList::Ratings,
        ScopeList::History,
        ScopeList::Playlists,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeList::Watchlist => "watchlist",
            ScopeList::Ratings => "ratings",
            ScopeList::History => "history",
            ScopeList::Playlists => "playlists",
        }
    }
}

impl FromStr for ScopeList {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "watchlist" => Ok(ScopeList::Watchlist),
            "ratings" => Ok(ScopeList::Ratings),
            "history" => Ok(ScopeList::History),
            "playlists" => Ok(ScopeList::Playlists),
            _ => Err(ParseScopeError::UnknownList(s.to_string())),
        }
    }
}

impl fmt::Display for ScopeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeDim {
    Add,
    Remove,
    Rate,
    Unrate,
    Scrobble,
    Unscrobble,
}

impl ScopeDim {
    pub const ALL: [ScopeDim; 6] = [
        ScopeDim::Add,
        ScopeDim::Remove,
        ScopeDim::Rate,
        ScopeDim::Unrate,
        ScopeDim::Scrobble,
        ScopeDim::Unscrobble,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeDim::Add => "add",
            ScopeDim::Remove => "remove",
            ScopeDim::Rate => "rate",
            ScopeDim::Unrate => "unrate",
            ScopeDim::Scrobble => "scrobble",
            ScopeDim::Unscrobble => "unscrobble",
        }
    }

    /// The dimension that negates this one
    pub fn opposite(self) -> ScopeDim {
        match self {
            ScopeDim::Add => ScopeDim::Remove,
            ScopeDim::Remove => ScopeDim::Add,
            ScopeDim::Rate => ScopeDim::Unrate,
            ScopeDim::Unrate => ScopeDim::Rate,
            ScopeDim::Scrobble => ScopeDim::Unscrobble,
            ScopeDim::Unscrobble => ScopeDim::Scrobble,
        }
    }

    pub fn is_negative(self) -> bool {
        matches!(self, ScopeDim::Remove | ScopeDim::Unrate | ScopeDim::Unscrobble)
    }
}

impl FromStr for ScopeDim {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(ScopeDim::Add),
            "remove" => Ok(ScopeDim::Remove),
            "rate" => Ok(ScopeDim::Rate),
            "unrate" => Ok(ScopeDim::Unrate),
            "scrobble" => Ok(ScopeDim::Scrobble),
            "unscrobble" => Ok(ScopeDim::Unscrobble),
            _ => Err(ParseScopeError::UnknownDim(s.to_string())),
        }
    }
}

impl fmt::Display for ScopeDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub list: ScopeList,
    pub dim: ScopeDim,
}

impl Scope {
    pub fn new(list: ScopeList, dim: ScopeDim) -> Self {
        Self { list, dim }
    }
}

/// Opposite of an arbitrary operation verb.
///
/// Input is lower-cased first. Verbs outside the six known dimensions come
/// back unchanged (apart from case) instead of failing, so callers holding a
/// provider-specific verb can still pass it through.
pub fn opposite(dim: &str) -> String {
    match dim.parse::<ScopeDim>() {
        Ok(known) => known.opposite().as_str().to_string(),
        Err(_) => dim.to_lowercase(),
    }
}

/// True only for `remove`, `unrate` and `unscrobble` (any case)
pub fn is_negative(dim: &str) -> bool {
    dim.parse::<ScopeDim>().map(ScopeDim::is_negative).unwrap_or(false)
}
