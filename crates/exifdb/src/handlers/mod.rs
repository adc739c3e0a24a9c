//! HTTP request handlers.

pub mod exif;
pub mod info;

pub use self::exif::*;
pub use self::info::*;
