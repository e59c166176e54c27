pub mod entity;
pub mod media;
pub mod media_ids;
pub mod scope;

pub use entity::Entity;
pub use media::{MediaItem, MediaType};
pub use media_ids::MediaIds;
pub use scope::{is_negative, opposite, ParseScopeError, Scope, ScopeDim, ScopeList};
