//! Image-to-record pipeline components.
//!
//! - **fetch**: Download the source image over HTTP
//! - **decode**: Validate the container and detect its format
//! - **metadata**: Read raw EXIF tags
//! - **sanitize**: Coerce raw values into document-safe values
//! - **processor**: Orchestrates the stages above

pub mod decode;
pub mod fetch;
pub mod metadata;
pub mod processor;
pub mod sanitize;

// Re-exports for convenient access
pub use decode::DecodedImage;
pub use fetch::ImageFetcher;
pub use metadata::{ExifMap, MetadataExtractor, GPS_INFO_KEY};
pub use processor::{build_record, ExifProcessor};
pub use sanitize::sanitize;
