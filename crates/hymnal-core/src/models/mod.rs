//! Data models for the application
//!
//! Catalog records as stored on disk, listing pages as returned to clients,
//! and the response envelopes of the detail and health endpoints.

mod catalog;
mod detail;
mod health;
mod image;

pub use catalog::*;
pub use detail::*;
pub use health::*;
pub use image::*;
