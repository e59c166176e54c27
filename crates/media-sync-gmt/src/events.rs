use media_sync_models::ScopeDim;

/// Stable negative dimension recorded for a feature.
///
/// Ratings collapse to `unrate` and history to `unscrobble`. Everything else
/// (watchlist, playlists, unknown features) uses `remove`, since playlists
/// have no sharper negative of their own. The operation verb is accepted for
/// symmetry with the recording side and does not affect the result.
pub fn negative_dimension_for(feature: &str, _op: &str) -> ScopeDim {
    match feature.to_lowercase().as_str() {
        "ratings" => ScopeDim::Unrate,
        "history" => ScopeDim::Unscrobble,
        _ => ScopeDim::Remove,
    }
}
