//! Hymnal Services Layer
//!
//! Business logic behind the HTTP handlers: the paginated listing and search
//! engine, detail resolution, media URL resolution and the administrative
//! write paths. Services take their collaborators (object storage, catalog)
//! as injected trait objects so tests can substitute fakes.

pub mod detail;
pub mod listing;
pub mod media;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use detail::{DetailSettings, HymnDetailService, FAST_MODE_VIDEO_NOTE};
pub use listing::{ImageListingService, ListRequest, ListingSettings, SearchRequest};
pub use media::{DramaVideo, MediaResolver, MediaSettings};
pub use upload::{UploadService, UploadedObject};
