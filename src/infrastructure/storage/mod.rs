//! File storage for listing media

mod media;

pub use media::{MediaKind, MediaStorage, StoredMedia};
