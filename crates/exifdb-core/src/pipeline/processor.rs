//! Pipeline orchestration: fetch, extract, sanitize.

use std::time::Instant;

use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::types::MetadataRecord;

use super::fetch::ImageFetcher;
use super::metadata::{ExifMap, MetadataExtractor};
use super::sanitize::sanitize;

/// Turns an image URL into an unpersisted [`MetadataRecord`].
pub struct ExifProcessor {
    fetcher: ImageFetcher,
    extractor: MetadataExtractor,
}

impl ExifProcessor {
    pub fn new(config: &Config) -> std::result::Result<Self, FetchError> {
        Ok(Self {
            fetcher: ImageFetcher::new(config.fetch.clone())?,
            extractor: MetadataExtractor::new(config.limits.clone()),
        })
    }

    /// Fetch the image at `url` and build its sanitized record.
    pub async fn process(&self, url: &str) -> Result<MetadataRecord> {
        let start = Instant::now();

        let bytes = self.fetcher.fetch(url).await?;
        let fetch_time = start.elapsed();
        tracing::trace!("  Fetch: {:?}", fetch_time);

        let extract_start = Instant::now();
        let raw = self.extractor.extract_owned(bytes).await?;
        tracing::trace!("  Extract: {:?}", extract_start.elapsed());

        let record = build_record(raw);
        tracing::debug!(
            url = %url,
            tags = record.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Processed image"
        );
        Ok(record)
    }
}

/// Sanitize every extracted value into a record.
pub fn build_record(raw: ExifMap) -> MetadataRecord {
    MetadataRecord::new(
        raw.into_iter()
            .map(|(tag, value)| (tag, sanitize(value)))
            .collect(),
    )
}
