//! One tall image holding every page.

use crate::codec::encode_png;
use crate::raster::snapshot_image;
use image::{RgbaImage, imageops};
use pagepad_core::{CombinedImageConfig, ExportArtifact, ExportError, ExportSource, Exporter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Stacks all pages vertically into a single PNG.
///
/// Every page gets a slot of the surface's size, blank pages included; a
/// blank page's slot stays transparent. Stored pages of a different size
/// are scaled to fit their slot.
#[derive(Debug, Clone)]
pub struct CombinedImageExporter {
    file_prefix: String,
    /// Fixed timestamp for the file name; `None` uses the current time.
    timestamp_millis: Option<u64>,
}

impl Default for CombinedImageExporter {
    fn default() -> Self {
        Self::from_config(&CombinedImageConfig::default())
    }
}

impl CombinedImageExporter {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            timestamp_millis: None,
        }
    }

    pub fn from_config(config: &CombinedImageConfig) -> Self {
        Self::new(config.file_prefix.clone())
    }

    /// Pin the timestamp used in the file name.
    pub fn with_timestamp(mut self, millis: u64) -> Self {
        self.timestamp_millis = Some(millis);
        self
    }

    fn file_name(&self) -> String {
        let millis = self.timestamp_millis.unwrap_or_else(now_millis);
        format!("{}-{}.png", self.file_prefix, millis)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Exporter for CombinedImageExporter {
    fn export(&self, source: &ExportSource<'_>) -> Result<ExportArtifact, ExportError> {
        let (width, height) = (source.width, source.height);
        let page_count = u32::try_from(source.pages.len())
            .map_err(|_| ExportError::Image("too many pages".to_string()))?;
        let total_height = height
            .checked_mul(page_count)
            .ok_or_else(|| ExportError::Image("combined image is too tall".to_string()))?;
        if width == 0 || total_height == 0 {
            return Err(ExportError::Image(format!(
                "cannot combine {} pages of {}x{}",
                page_count, width, height
            )));
        }

        let mut combined = RgbaImage::new(width, total_height);
        for (index, page) in source.populated_pages() {
            let Some(image) = page.image() else { continue };
            let snapshot = match source.codec.decode(image) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::warn!("Skipping page {} in combined image: {}", index + 1, e);
                    continue;
                }
            };
            let Some(mut page_image) = snapshot_image(&snapshot) else {
                log::warn!("Skipping page {}: malformed bitmap", index + 1);
                continue;
            };
            if page_image.dimensions() != (width, height) {
                page_image =
                    imageops::resize(&page_image, width, height, imageops::FilterType::Triangle);
            }
            let top = i64::from(height) * index as i64;
            imageops::overlay(&mut combined, &page_image, 0, top);
        }

        let bytes = encode_png(width, total_height, combined.as_raw())
            .map_err(|e| ExportError::Image(e.to_string()))?;

        Ok(ExportArtifact {
            file_name: self.file_name(),
            mime_type: "image/png",
            bytes,
        })
    }
}
